use super::error::Error;
use super::valence;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Upper bound on search steps before a matching is declared impossible.
const SEARCH_BUDGET: usize = 200_000;

/// Replaces aromatic bonds by an alternating single/double pattern.
///
/// Every aromatic atom that still has a free valence unit must receive
/// exactly one double bond. When no such assignment exists the structure is
/// rejected. Aromatic flags are cleared afterwards; aromaticity is perceived
/// again from the Kekulé form.
pub fn kekulize(mol: &mut Molecule) -> Result<(), Error> {
    let adj = mol.adjacency();
    let n = mol.atom_count();

    let needs_pi: Vec<bool> = (0..n)
        .map(|idx| mol.atoms[idx].aromatic && valence::needs_pi_bond(mol, &adj, idx))
        .collect();

    // Candidate partners over aromatic bonds.
    let candidates: Vec<Vec<(usize, usize)>> = (0..n)
        .map(|idx| {
            if !needs_pi[idx] {
                return Vec::new();
            }
            adj[idx]
                .iter()
                .filter(|&&(nb, bond)| needs_pi[nb] && mol.bonds[bond].order == BondOrder::Aromatic)
                .copied()
                .collect()
        })
        .collect();

    let mut matching = Matching {
        candidates: &candidates,
        partner: vec![None; n],
        steps: 0,
    };
    if let Some(atom) = (0..n).find(|&idx| needs_pi[idx] && candidates[idx].is_empty()) {
        return Err(Error::Kekulization { atom });
    }
    if !matching.solve() {
        let atom = (0..n)
            .find(|&idx| needs_pi[idx] && matching.partner[idx].is_none())
            .unwrap_or(0);
        return Err(Error::Kekulization { atom });
    }

    for bond in &mut mol.bonds {
        if bond.order == BondOrder::Aromatic {
            bond.order = BondOrder::Single;
        }
    }
    for idx in 0..n {
        if let Some((nb, bond)) = matching.partner[idx] {
            if idx < nb {
                mol.bonds[bond].order = BondOrder::Double;
            }
        }
    }
    for atom in &mut mol.atoms {
        atom.aromatic = false;
    }
    Ok(())
}

struct Matching<'a> {
    candidates: &'a [Vec<(usize, usize)>],
    partner: Vec<Option<(usize, usize)>>,
    steps: usize,
}

impl Matching<'_> {
    /// Depth-first search for a perfect matching on the atoms that have
    /// candidates. The most constrained unmatched atom is tried first.
    fn solve(&mut self) -> bool {
        self.steps += 1;
        if self.steps > SEARCH_BUDGET {
            return false;
        }

        let mut best: Option<(usize, usize)> = None;
        for (atom, options) in self.candidates.iter().enumerate() {
            if options.is_empty() || self.partner[atom].is_some() {
                continue;
            }
            let free = options
                .iter()
                .filter(|&&(nb, _)| self.partner[nb].is_none())
                .count();
            if free == 0 {
                return false;
            }
            if best.is_none_or(|(_, count)| free < count) {
                best = Some((atom, free));
            }
        }
        let Some((atom, _)) = best else {
            return true;
        };

        for &(nb, bond) in &self.candidates[atom] {
            if self.partner[nb].is_some() {
                continue;
            }
            self.partner[atom] = Some((nb, bond));
            self.partner[nb] = Some((atom, bond));
            if self.solve() {
                return true;
            }
            self.partner[atom] = None;
            self.partner[nb] = None;
        }
        false
    }
}

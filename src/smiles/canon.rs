//! Canonical atom ranking.
//!
//! Ranks start from local atom invariants and are refined by neighbor ranks
//! until the partition is stable. That partition gives the symmetry classes.
//! Stereo descriptors expressed against those classes are then mixed in, and
//! remaining ties are broken one atom at a time until every rank is unique.

use super::stereo::permutation_is_odd;
use crate::model::atom::{Chirality, StereoRef};
use crate::model::molecule::{Adjacency, Configuration, Molecule};
use crate::model::types::BondOrder;

fn bond_code(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Quadruple => 4,
        BondOrder::Aromatic => 5,
    }
}

/// Dense ranks (0, 1, 2, ...) of `keys`, equal keys sharing a rank.
fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut ranks = vec![0; keys.len()];
    let mut current = 0;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && keys[order[pos - 1]] != keys[idx] {
            current += 1;
        }
        ranks[idx] = current;
    }
    ranks
}

fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |&max| max + 1)
}

fn initial_invariants(mol: &Molecule, adj: &Adjacency) -> Vec<usize> {
    let keys: Vec<_> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(idx, atom)| {
            (
                adj[idx].len(),
                atom.element.atomic_number(),
                atom.isotope.unwrap_or(0),
                atom.charge,
                atom.hydrogens,
                atom.aromatic,
                atom.class.unwrap_or(0),
            )
        })
        .collect();
    dense_ranks(&keys)
}

/// Refines `ranks` by neighbor environments until no class splits further.
fn refine(mol: &Molecule, adj: &Adjacency, mut ranks: Vec<usize>) -> Vec<usize> {
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = (0..mol.atom_count())
            .map(|idx| {
                let mut env: Vec<(usize, u8)> = adj[idx]
                    .iter()
                    .map(|&(nb, bond)| (ranks[nb], bond_code(mol.bonds[bond].order)))
                    .collect();
                env.sort_unstable();
                (ranks[idx], env)
            })
            .collect();
        let refined = dense_ranks(&keys);
        if class_count(&refined) == class_count(&ranks) {
            return refined;
        }
        ranks = refined;
    }
}

/// Graph-symmetry classes: atoms in the same class are interchangeable when
/// stereo is ignored.
pub fn symmetry_classes(mol: &Molecule, adj: &Adjacency) -> Vec<usize> {
    refine(mol, adj, initial_invariants(mol, adj))
}

/// Stereo descriptor per atom, independent of input order: tetrahedral
/// parity relative to ascending neighbor rank, and cis/trans relative to the
/// highest-ranked substituent on each double-bond end.
///
/// A center whose neighbors still share a rank has no defined parity yet and
/// gets code 0.
fn stereo_codes(mol: &Molecule, adj: &Adjacency, ranks: &[usize]) -> Vec<u8> {
    let mut codes = vec![0u8; mol.atom_count()];

    for (idx, atom) in mol.atoms.iter().enumerate() {
        let Some(stereo) = &atom.stereo else {
            continue;
        };
        let key = |r: &StereoRef| match r {
            StereoRef::Implicit => None,
            StereoRef::Atom(nb) => Some(ranks[*nb]),
        };
        let mut sorted = stereo.refs.clone();
        sorted.sort_by_key(key);
        if sorted.windows(2).any(|w| key(&w[0]) == key(&w[1])) {
            continue;
        }
        let odd = permutation_is_odd(&stereo.refs, &sorted);
        let chirality = if odd {
            stereo.chirality.inverted()
        } else {
            stereo.chirality
        };
        codes[idx] = match chirality {
            Chirality::Anticlockwise => 1,
            Chirality::Clockwise => 2,
        };
    }

    for (bond_idx, bond) in mol.bonds.iter().enumerate() {
        let Some(stereo) = bond.stereo else {
            continue;
        };
        let top = |end: usize, reference: usize| {
            adj[end]
                .iter()
                .filter(|&&(_, b)| b != bond_idx)
                .map(|&(nb, _)| nb)
                .max_by_key(|&nb| ranks[nb])
                .is_none_or(|nb| nb == reference)
        };
        let mut configuration = stereo.configuration;
        if !top(bond.i, stereo.ref_i) {
            configuration = configuration.flipped();
        }
        if !top(bond.j, stereo.ref_j) {
            configuration = configuration.flipped();
        }
        let code = match configuration {
            Configuration::Cis => 3,
            Configuration::Trans => 4,
        };
        codes[bond.i] = codes[bond.i].max(code);
        codes[bond.j] = codes[bond.j].max(code);
    }
    codes
}

/// Mixes stereo codes into `ranks` and refines until neither the graph nor
/// newly defined parities split a class.
fn refine_with_stereo(mol: &Molecule, adj: &Adjacency, ranks: Vec<usize>) -> Vec<usize> {
    let mut ranks = refine(mol, adj, ranks);
    loop {
        let codes = stereo_codes(mol, adj, &ranks);
        let keys: Vec<(usize, u8)> = ranks.iter().copied().zip(codes).collect();
        let refined = refine(mol, adj, dense_ranks(&keys));
        if class_count(&refined) == class_count(&ranks) {
            return refined;
        }
        ranks = refined;
    }
}

/// Stereo codes listed in rank order, used to compare tie-break choices.
fn stereo_signature(mol: &Molecule, adj: &Adjacency, ranks: &[usize]) -> Vec<(usize, u8)> {
    let mut signature: Vec<(usize, u8)> = ranks
        .iter()
        .copied()
        .zip(stereo_codes(mol, adj, ranks))
        .collect();
    signature.sort_unstable();
    signature
}

/// Unique canonical ranks `0..n` for a molecule whose stereo has already been
/// pruned against `classes`.
///
/// Ties are broken one atom at a time in the lowest tied class. Every member
/// of that class is tried and the split with the smallest stereo signature
/// wins, so centers whose parity depends on the choice (cis/trans across a
/// ring, pseudo-asymmetric centers) end up expressed the same way for every
/// input order.
pub fn canonical_ranks(mol: &Molecule, adj: &Adjacency, classes: &[usize]) -> Vec<usize> {
    let mut ranks = refine_with_stereo(mol, adj, classes.to_vec());

    while class_count(&ranks) < ranks.len() {
        let tied = lowest_tied_rank(&ranks);
        let candidates: Vec<usize> = (0..ranks.len()).filter(|&idx| ranks[idx] == tied).collect();
        let tries = if has_undefined_parity(mol, adj, &ranks) {
            candidates.len()
        } else {
            1
        };
        let mut best: Option<(Vec<(usize, u8)>, Vec<usize>)> = None;
        for &chosen in candidates.iter().take(tries) {
            let split: Vec<usize> = ranks
                .iter()
                .enumerate()
                .map(|(idx, &r)| if idx == chosen { 2 * r } else { 2 * r + 1 })
                .collect();
            let candidate = refine_with_stereo(mol, adj, dense_ranks(&split));
            let signature = stereo_signature(mol, adj, &candidate);
            if best.as_ref().is_none_or(|(current, _)| signature < *current) {
                best = Some((signature, candidate));
            }
        }
        match best {
            Some((_, candidate)) => ranks = candidate,
            None => break,
        }
    }
    ranks
}

fn has_undefined_parity(mol: &Molecule, adj: &Adjacency, ranks: &[usize]) -> bool {
    let codes = stereo_codes(mol, adj, ranks);
    mol.atoms
        .iter()
        .zip(codes)
        .any(|(atom, code)| atom.stereo.is_some() && code == 0)
}

fn lowest_tied_rank(ranks: &[usize]) -> usize {
    let mut counts = vec![0usize; ranks.len()];
    for &r in ranks {
        counts[r] += 1;
    }
    counts.iter().position(|&c| c > 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parser::parse;

    #[test]
    fn dense_ranks_share_equal_keys() {
        assert_eq!(dense_ranks(&[5, 1, 5, 3]), vec![2, 0, 2, 1]);
    }

    #[test]
    fn symmetric_atoms_share_a_class() {
        let mol = parse("CC(C)O").unwrap();
        let classes = symmetry_classes(&mol, &mol.adjacency());
        assert_eq!(classes[0], classes[2]);
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[0], classes[3]);
    }

    #[test]
    fn refinement_separates_by_environment() {
        let mol = parse("CCCO").unwrap();
        let classes = symmetry_classes(&mol, &mol.adjacency());
        let mut sorted = classes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
    }

    #[test]
    fn canonical_ranks_are_a_permutation() {
        let mol = parse("c1ccccc1").unwrap();
        let adj = mol.adjacency();
        let classes = symmetry_classes(&mol, &adj);
        assert!(classes.iter().all(|&c| c == 0));

        let mut ranks = canonical_ranks(&mol, &adj, &classes);
        ranks.sort_unstable();
        assert_eq!(ranks, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn stereo_code_ignores_neighbor_order() {
        let a = parse("N[C@@H](C)O").unwrap();
        let b = parse("O[C@H](C)N").unwrap();
        let code = |mol: &Molecule| {
            let adj = mol.adjacency();
            let classes = symmetry_classes(mol, &adj);
            let center = mol.atoms.iter().position(|a| a.stereo.is_some()).unwrap();
            stereo_codes(mol, &adj, &classes)[center]
        };
        assert_eq!(code(&a), code(&b));
    }
}

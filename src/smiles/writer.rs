use super::error::Error;
use super::stereo::{self, BondDirection, Side};
use super::{canon, valence};
use crate::model::atom::{Chirality, StereoRef};
use crate::model::molecule::{Adjacency, Configuration, Molecule};
use crate::model::types::{BondOrder, Element};

/// Writes the canonical SMILES of `mol`.
///
/// Stereo that does not describe a real stereo element is dropped first, so
/// that equivalent inputs agree.
///
/// # Errors
///
/// Returns [`Error::RingClosures`] when more ring bonds are open at one point
/// of the traversal than SMILES has digits for.
pub fn canonical_smiles(mol: &Molecule) -> Result<String, Error> {
    if mol.is_empty() {
        return Ok(String::new());
    }
    let adj = mol.adjacency();
    let classes = canon::symmetry_classes(mol, &adj);
    let mut pruned = mol.clone();
    stereo::prune(&mut pruned, &adj, &classes);
    let ranks = canon::canonical_ranks(&pruned, &adj, &classes);
    write(&pruned, &adj, &ranks)
}

/// Writes `mol` as SMILES, traversing atoms by ascending `ranks`.
pub fn write(mol: &Molecule, adj: &Adjacency, ranks: &[usize]) -> Result<String, Error> {
    let traversal = Traversal::build(mol, adj, ranks);
    let directions = assign_directions(mol, adj, &traversal);
    let mut writer = Writer {
        mol,
        adj,
        traversal: &traversal,
        directions,
        digits: vec![None; mol.bond_count()],
        in_use: [false; RING_DIGITS],
        out: String::with_capacity(mol.atom_count() * 2),
    };
    for (k, &root) in traversal.roots.iter().enumerate() {
        if k > 0 {
            writer.out.push('.');
        }
        writer.write_atom(root)?;
    }
    Ok(writer.out)
}

/// Ring-bond digits `1..=99`; index 0 is unused.
const RING_DIGITS: usize = 100;

/// Depth-first spanning forest plus the ring bonds it leaves out.
struct Traversal {
    roots: Vec<usize>,
    position: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<(usize, usize)>>,
    /// Ring bonds closed at an atom, as `(opener, bond)`.
    closings: Vec<Vec<(usize, usize)>>,
    /// Ring bonds opened at an atom, as `(closer, bond)`.
    openings: Vec<Vec<(usize, usize)>>,
}

impl Traversal {
    fn build(mol: &Molecule, adj: &Adjacency, ranks: &[usize]) -> Self {
        let n = mol.atom_count();
        let mut traversal = Traversal {
            roots: Vec::new(),
            position: vec![usize::MAX; n],
            parent: vec![None; n],
            children: vec![Vec::new(); n],
            closings: vec![Vec::new(); n],
            openings: vec![Vec::new(); n],
        };
        let mut bond_seen = vec![false; mol.bond_count()];
        let mut counter = 0;

        let mut by_rank: Vec<usize> = (0..n).collect();
        by_rank.sort_by_key(|&idx| ranks[idx]);
        for start in by_rank {
            if traversal.position[start] == usize::MAX {
                traversal.roots.push(start);
                traversal.visit(adj, ranks, start, &mut bond_seen, &mut counter);
            }
        }
        traversal
    }

    fn visit(
        &mut self,
        adj: &Adjacency,
        ranks: &[usize],
        atom: usize,
        bond_seen: &mut [bool],
        counter: &mut usize,
    ) {
        self.position[atom] = *counter;
        *counter += 1;

        let mut neighbors = adj[atom].clone();
        neighbors.sort_by_key(|&(nb, _)| ranks[nb]);
        for (nb, bond) in neighbors {
            if bond_seen[bond] {
                continue;
            }
            bond_seen[bond] = true;
            if self.position[nb] != usize::MAX {
                self.closings[atom].push((nb, bond));
                self.openings[nb].push((atom, bond));
            } else {
                self.parent[nb] = Some(atom);
                self.children[atom].push((nb, bond));
                self.visit(adj, ranks, nb, bond_seen, counter);
            }
        }
    }

    /// Neighbors in the order they appear around `atom` in the output.
    fn written_neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.parent[atom]
            .into_iter()
            .chain(self.closings[atom].iter().map(|&(nb, _)| nb))
            .chain(self.openings[atom].iter().map(|&(nb, _)| nb))
            .chain(self.children[atom].iter().map(|&(nb, _)| nb))
    }
}

/// Picks `/` and `\` marks for the single bonds around every stereo double
/// bond. Each mark is stored for the bond as written, earlier atom first.
fn assign_directions(
    mol: &Molecule,
    adj: &Adjacency,
    traversal: &Traversal,
) -> Vec<Option<BondDirection>> {
    let position = &traversal.position;
    let mut directions: Vec<Option<BondDirection>> = vec![None; mol.bond_count()];

    let mut stereo_bonds: Vec<usize> = (0..mol.bond_count())
        .filter(|&idx| mol.bonds[idx].stereo.is_some())
        .collect();
    stereo_bonds.sort_by_key(|&idx| position[mol.bonds[idx].i].min(position[mol.bonds[idx].j]));

    for idx in stereo_bonds {
        let bond = &mol.bonds[idx];
        let Some(s) = bond.stereo else {
            continue;
        };
        let (first, second, ref_first, ref_second) = if position[bond.i] < position[bond.j] {
            (bond.i, bond.j, s.ref_i, s.ref_j)
        } else {
            (bond.j, bond.i, s.ref_j, s.ref_i)
        };

        let substituents = |end: usize| -> Option<Vec<(usize, usize)>> {
            let mut subs: Vec<(usize, usize)> = adj[end]
                .iter()
                .filter(|&&(_, b)| b != idx)
                .copied()
                .collect();
            if subs.is_empty() || subs.iter().any(|&(_, b)| mol.bonds[b].order != BondOrder::Single) {
                return None;
            }
            subs.sort_by_key(|&(nb, _)| position[nb]);
            Some(subs)
        };
        let (Some(subs_first), Some(subs_second)) = (substituents(first), substituents(second))
        else {
            continue;
        };

        let side_first = match marked_side(position, &directions, first, &subs_first, ref_first) {
            Some(side) => side,
            None => {
                let (nb, b) = subs_first[0];
                directions[b] = Some(BondDirection::Up);
                let side = stereo::side_of(BondDirection::Up, position[first] < position[nb]);
                if nb == ref_first { side } else { side.opposite() }
            }
        };
        let side_second = match s.configuration {
            Configuration::Cis => side_first,
            Configuration::Trans => side_first.opposite(),
        };
        if marked_side(position, &directions, second, &subs_second, ref_second).is_none() {
            let (nb, b) = subs_second[0];
            let desired = if nb == ref_second {
                side_second
            } else {
                side_second.opposite()
            };
            directions[b] = Some(stereo::direction_for(desired, position[second] < position[nb]));
        }
    }
    directions
}

/// Side of `reference` implied by a mark already placed on one of `subs`.
fn marked_side(
    position: &[usize],
    directions: &[Option<BondDirection>],
    end: usize,
    subs: &[(usize, usize)],
    reference: usize,
) -> Option<Side> {
    subs.iter().find_map(|&(nb, bond)| {
        let side = stereo::side_of(directions[bond]?, position[end] < position[nb]);
        Some(if nb == reference { side } else { side.opposite() })
    })
}

struct Writer<'a> {
    mol: &'a Molecule,
    adj: &'a Adjacency,
    traversal: &'a Traversal,
    directions: Vec<Option<BondDirection>>,
    digits: Vec<Option<u8>>,
    in_use: [bool; RING_DIGITS],
    out: String,
}

impl Writer<'_> {
    fn write_atom(&mut self, atom: usize) -> Result<(), Error> {
        let text = self.atom_text(atom);
        self.out.push_str(&text);

        let traversal = self.traversal;
        for &(_, bond) in &traversal.closings[atom] {
            if let Some(digit) = self.digits[bond].take() {
                self.in_use[usize::from(digit)] = false;
                self.push_digit(digit);
            }
        }
        for &(_, bond) in &traversal.openings[atom] {
            let digit = self.allocate_digit()?;
            self.digits[bond] = Some(digit);
            self.push_bond_symbol(bond);
            self.push_digit(digit);
        }

        let children = &traversal.children[atom];
        for (k, &(child, bond)) in children.iter().enumerate() {
            let branch = k + 1 < children.len();
            if branch {
                self.out.push('(');
            }
            self.push_bond_symbol(bond);
            self.write_atom(child)?;
            if branch {
                self.out.push(')');
            }
        }
        Ok(())
    }

    fn allocate_digit(&mut self) -> Result<u8, Error> {
        let digit = (1..RING_DIGITS as u8)
            .find(|&d| !self.in_use[usize::from(d)])
            .ok_or(Error::RingClosures {
                limit: RING_DIGITS - 1,
            })?;
        self.in_use[usize::from(digit)] = true;
        Ok(digit)
    }

    fn push_digit(&mut self, digit: u8) {
        if digit < 10 {
            self.out.push(char::from(b'0' + digit));
        } else {
            self.out.push('%');
            self.out.push_str(&digit.to_string());
        }
    }

    fn push_bond_symbol(&mut self, bond: usize) {
        let b = &self.mol.bonds[bond];
        let both_aromatic = self.mol.atoms[b.i].aromatic && self.mol.atoms[b.j].aromatic;
        let symbol = match b.order {
            BondOrder::Single => match self.directions[bond] {
                Some(direction) => Some(direction.as_char()),
                None if both_aromatic => Some('-'),
                None => None,
            },
            BondOrder::Aromatic if both_aromatic => None,
            order => Some(order.smiles_symbol()),
        };
        if let Some(symbol) = symbol {
            self.out.push(symbol);
        }
    }

    fn output_chirality(&self, atom: usize) -> Option<Chirality> {
        let stereo = self.mol.atoms[atom].stereo.as_ref()?;
        let mut written = Vec::with_capacity(4);
        let mut neighbors = self.traversal.written_neighbors(atom);
        if self.traversal.parent[atom].is_some() {
            written.extend(neighbors.next().map(StereoRef::Atom));
        }
        if stereo.refs.contains(&StereoRef::Implicit) {
            written.push(StereoRef::Implicit);
        }
        written.extend(neighbors.map(StereoRef::Atom));

        if written.len() != stereo.refs.len() {
            return None;
        }
        Some(if stereo::permutation_is_odd(&stereo.refs, &written) {
            stereo.chirality.inverted()
        } else {
            stereo.chirality
        })
    }

    fn atom_text(&self, idx: usize) -> String {
        let atom = &self.mol.atoms[idx];
        let chirality = self.output_chirality(idx);
        let symbol = if atom.aromatic {
            atom.element.symbol().to_ascii_lowercase()
        } else {
            atom.element.symbol().to_string()
        };

        let bond_sum = valence::bond_sum(self.mol, self.adj, idx);
        let aromatic_form_allowed = !atom.aromatic
            || matches!(
                atom.element,
                Element::B | Element::C | Element::N | Element::O | Element::P | Element::S
            );
        let plain = atom.element.is_organic_subset()
            && aromatic_form_allowed
            && atom.charge == 0
            && atom.isotope.is_none()
            && atom.class.is_none()
            && chirality.is_none()
            && atom.hydrogens
                == valence::implicit_hydrogens(atom.element, atom.aromatic, bond_sum);
        if plain {
            return symbol;
        }

        let mut text = String::from("[");
        if let Some(isotope) = atom.isotope {
            text.push_str(&isotope.to_string());
        }
        text.push_str(&symbol);
        if let Some(chirality) = chirality {
            text.push_str(chirality.smiles_symbol());
        }
        match atom.hydrogens {
            0 => {}
            1 => text.push('H'),
            n => text.push_str(&format!("H{n}")),
        }
        match atom.charge {
            0 => {}
            1 => text.push('+'),
            -1 => text.push('-'),
            c if c > 0 => text.push_str(&format!("+{c}")),
            c => text.push_str(&format!("-{}", -i16::from(c))),
        }
        if let Some(class) = atom.class {
            text.push_str(&format!(":{class}"));
        }
        text.push(']');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::molecule::Bond;
    use crate::smiles::parser::parse;

    fn rewrite(smiles: &str) -> String {
        canonical_smiles(&parse(smiles).unwrap()).unwrap()
    }

    #[test]
    fn chain_starts_at_terminal_carbon() {
        assert_eq!(rewrite("OCC"), "CCO");
        assert_eq!(rewrite("OC(=O)C"), "CC(=O)O");
    }

    #[test]
    fn ring_digits_and_aromatic_atoms() {
        assert_eq!(rewrite("c1ccccc1"), "c1ccccc1");
        assert_eq!(rewrite("C1CC1"), "C1CC1");
    }

    #[test]
    fn bracket_atoms_are_kept_when_needed() {
        assert_eq!(rewrite("[NH4+]"), "[NH4+]");
        assert_eq!(rewrite("[13CH4]"), "[13CH4]");
        assert_eq!(rewrite("[Na+]"), "[Na+]");
        assert_eq!(rewrite("[O-2]"), "[O-2]");
        assert_eq!(rewrite("[CH3]"), "[CH3]");
    }

    #[test]
    fn stereo_survives_rewriting() {
        let trans = rewrite("F/C=C/F");
        let cis = rewrite(r"F/C=C\F");
        assert_ne!(trans, cis);
        assert_eq!(rewrite(&trans), trans);
        assert_eq!(rewrite(&cis), cis);
        assert_eq!(rewrite(r"F\C=C\F"), trans);
    }

    #[test]
    fn chirality_is_reexpressed_for_output_order() {
        let a = rewrite("N[C@@H](C)C(=O)O");
        let b = rewrite("OC(=O)[C@@H](N)C");
        let c = rewrite("C[C@H](N)C(=O)O");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, rewrite("N[C@H](C)C(=O)O"));
        assert_eq!(rewrite(&a), a);
    }

    /// A chain of `chain` carbons, each also bonded to one extra hub atom, so
    /// `chain - 1` ring bonds are open when the hub is reached.
    fn hub_and_chain(chain: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..=chain {
            mol.atoms.push(Atom::new(Element::C));
        }
        for i in 0..chain {
            if i + 1 < chain {
                mol.bonds.push(Bond::new(i, i + 1, BondOrder::Single));
            }
            mol.bonds.push(Bond::new(i, chain, BondOrder::Single));
        }
        mol
    }

    #[test]
    fn ring_digits_run_out_with_an_error() {
        let ranks = |mol: &Molecule| (0..mol.atom_count()).collect::<Vec<_>>();

        let widest = hub_and_chain(100);
        let out = write(&widest, &widest.adjacency(), &ranks(&widest)).unwrap();
        assert!(out.contains("%99"));

        let too_wide = hub_and_chain(101);
        assert_eq!(
            write(&too_wide, &too_wide.adjacency(), &ranks(&too_wide)),
            Err(Error::RingClosures { limit: 99 })
        );
    }

    #[test]
    fn multiple_fragments_are_joined_with_dots() {
        let out = rewrite("[Na+].[Cl-]");
        assert_eq!(out.split('.').count(), 2);
    }
}

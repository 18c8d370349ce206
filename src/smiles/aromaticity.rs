//! Hückel aromaticity perception on a kekulized molecule.
//!
//! Every simple cycle of up to [`MAX_RING_SIZE`] atoms is scored by summing
//! the pi electrons each member contributes; a cycle with 4n+2 electrons is
//! aromatic. Bonds are only marked aromatic when they lie on an aromatic
//! cycle, so exocyclic double bonds (e.g. the C=O of a pyridone) stay as
//! written.

use crate::model::molecule::{Adjacency, Molecule};
use crate::model::types::{BondOrder, Element};

pub const MAX_RING_SIZE: usize = 10;

pub fn perceive(mol: &mut Molecule) {
    let adj = mol.adjacency();
    let candidate: Vec<bool> = (0..mol.atom_count())
        .map(|idx| may_be_aromatic(mol, &adj, idx))
        .collect();

    let cycles = simple_cycles(&adj, &candidate, MAX_RING_SIZE);
    if cycles.is_empty() {
        return;
    }
    let in_ring = ring_membership(&adj);

    let mut aromatic_bonds = Vec::new();
    for cycle in &cycles {
        let electrons: Option<u32> = cycle
            .iter()
            .map(|&atom| pi_electrons(mol, &adj, atom, cycle, &in_ring).map(u32::from))
            .sum();
        if let Some(total) = electrons {
            if total >= 2 && (total - 2) % 4 == 0 {
                for k in 0..cycle.len() {
                    let (a, b) = (cycle[k], cycle[(k + 1) % cycle.len()]);
                    if let Some(bond) = bond_index(&adj, a, b) {
                        aromatic_bonds.push(bond);
                    }
                }
            }
        }
    }

    for bond in aromatic_bonds {
        let (i, j) = (mol.bonds[bond].i, mol.bonds[bond].j);
        mol.bonds[bond].order = BondOrder::Aromatic;
        mol.bonds[bond].stereo = None;
        mol.atoms[i].aromatic = true;
        mol.atoms[j].aromatic = true;
    }
}

fn bond_index(adj: &Adjacency, a: usize, b: usize) -> Option<usize> {
    adj[a].iter().find(|&&(nb, _)| nb == b).map(|&(_, bond)| bond)
}

fn may_be_aromatic(mol: &Molecule, adj: &Adjacency, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    if !atom.element.can_be_aromatic() || adj[idx].len() < 2 {
        return false;
    }
    let has_double = adj[idx]
        .iter()
        .any(|&(_, bond)| mol.bonds[bond].order == BondOrder::Double);
    let has_lone_pair = matches!(
        atom.element,
        Element::N | Element::P | Element::As | Element::O | Element::S | Element::Se
    );
    let carbanion_or_cation = atom.element == Element::C && atom.charge != 0;
    has_double || has_lone_pair || carbanion_or_cation || atom.element == Element::B
}

/// Cycles over candidate atoms, each reported once as an atom sequence that
/// starts at its lowest index.
fn simple_cycles(adj: &Adjacency, candidate: &[bool], max_len: usize) -> Vec<Vec<usize>> {
    let mut cycles = Vec::new();
    let mut path = Vec::with_capacity(max_len);
    let mut on_path = vec![false; adj.len()];

    for start in 0..adj.len() {
        if !candidate[start] {
            continue;
        }
        path.push(start);
        on_path[start] = true;
        extend(adj, candidate, start, max_len, &mut path, &mut on_path, &mut cycles);
        on_path[start] = false;
        path.pop();
    }
    cycles
}

fn extend(
    adj: &Adjacency,
    candidate: &[bool],
    start: usize,
    max_len: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    cycles: &mut Vec<Vec<usize>>,
) {
    let Some(&last) = path.last() else {
        return;
    };
    for &(next, _) in &adj[last] {
        if next == start && path.len() >= 3 {
            // Each ring is found in both directions; keep one.
            if path[1] < path[path.len() - 1] {
                cycles.push(path.clone());
            }
            continue;
        }
        if next <= start || on_path[next] || !candidate[next] || path.len() == max_len {
            continue;
        }
        path.push(next);
        on_path[next] = true;
        extend(adj, candidate, start, max_len, path, on_path, cycles);
        on_path[next] = false;
        path.pop();
    }
}

/// Atoms that lie on any cycle, i.e. are incident to a non-bridge bond.
fn ring_membership(adj: &Adjacency) -> Vec<bool> {
    let n = adj.len();
    let mut in_ring = vec![false; n];
    let mut order = vec![usize::MAX; n];
    let mut low = vec![0usize; n];
    let mut counter = 0usize;

    for root in 0..n {
        if order[root] != usize::MAX {
            continue;
        }
        // Iterative Tarjan bridge search: (atom, parent bond, next neighbor slot).
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];
        order[root] = counter;
        low[root] = counter;
        counter += 1;

        while let Some(frame) = stack.last_mut() {
            let (atom, parent_bond, slot) = *frame;
            if slot < adj[atom].len() {
                frame.2 += 1;
                let (next, bond) = adj[atom][slot];
                if Some(bond) == parent_bond {
                    continue;
                }
                if order[next] == usize::MAX {
                    order[next] = counter;
                    low[next] = counter;
                    counter += 1;
                    stack.push((next, Some(bond), 0));
                } else {
                    low[atom] = low[atom].min(order[next]);
                }
            } else {
                stack.pop();
                if let Some(&(parent, _, _)) = stack.last() {
                    low[parent] = low[parent].min(low[atom]);
                    if low[atom] <= order[parent] {
                        // Bond parent-atom is not a bridge.
                        in_ring[parent] = true;
                        in_ring[atom] = true;
                    }
                }
            }
        }
    }
    in_ring
}

/// Pi electrons `idx` donates to `cycle`, or `None` if it breaks conjugation.
fn pi_electrons(
    mol: &Molecule,
    adj: &Adjacency,
    idx: usize,
    cycle: &[usize],
    in_ring: &[bool],
) -> Option<u8> {
    let atom = &mol.atoms[idx];
    let mut double_partner = None;
    for &(nb, bond) in &adj[idx] {
        match mol.bonds[bond].order {
            BondOrder::Double => {
                if double_partner.is_some() {
                    return None;
                }
                double_partner = Some(nb);
            }
            BondOrder::Triple | BondOrder::Quadruple => return None,
            BondOrder::Single | BondOrder::Aromatic => {}
        }
    }
    let connections = adj[idx].len() + usize::from(atom.hydrogens);

    if let Some(partner) = double_partner {
        if cycle.contains(&partner) {
            return Some(1);
        }
        let partner_element = mol.atoms[partner].element;
        return if in_ring[partner] && matches!(partner_element, Element::C | Element::N) {
            // Double bond into a fused ring.
            Some(1)
        } else if atom.element == Element::C
            && matches!(partner_element, Element::O | Element::S | Element::N)
        {
            Some(0)
        } else {
            None
        };
    }

    match (atom.element, atom.charge) {
        (Element::C, -1) => Some(2),
        (Element::C, 1) => Some(0),
        (Element::N | Element::P | Element::As, 0) if connections == 3 => Some(2),
        (Element::O | Element::S | Element::Se, 0) if connections == 2 => Some(2),
        (Element::B, 0) if connections == 3 => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::kekulize::kekulize;
    use crate::smiles::parser::parse;

    fn perceived(smiles: &str) -> Molecule {
        let mut mol = parse(smiles).unwrap();
        kekulize(&mut mol).unwrap();
        perceive(&mut mol);
        mol
    }

    fn aromatic_atoms(mol: &Molecule) -> usize {
        mol.atoms.iter().filter(|a| a.aromatic).count()
    }

    #[test]
    fn kekule_benzene_is_aromatic() {
        let mol = perceived("C1=CC=CC=C1");
        assert_eq!(aromatic_atoms(&mol), 6);
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn heteroaromatic_five_membered_rings() {
        assert_eq!(aromatic_atoms(&perceived("C1=CNC=C1")), 5);
        assert_eq!(aromatic_atoms(&perceived("C1=COC=C1")), 5);
        assert_eq!(aromatic_atoms(&perceived("C1=CSC=C1")), 5);
        assert_eq!(aromatic_atoms(&perceived("C1=CN=CN1")), 5);
    }

    #[test]
    fn non_aromatic_rings() {
        assert_eq!(aromatic_atoms(&perceived("C1=CCC=C1")), 0);
        assert_eq!(aromatic_atoms(&perceived("C1=CC=C1")), 0);
        assert_eq!(aromatic_atoms(&perceived("C1CCCCC1")), 0);
        assert_eq!(aromatic_atoms(&perceived("O=C1C=CC(=O)C=C1")), 0);
    }

    #[test]
    fn pyridone_keeps_exocyclic_carbonyl() {
        let mol = perceived("O=C1C=CC=CN1");
        assert_eq!(aromatic_atoms(&mol), 6);
        assert_eq!(
            mol.bonds
                .iter()
                .filter(|b| b.order == BondOrder::Double)
                .count(),
            1
        );
    }

    #[test]
    fn fused_rings_share_aromaticity() {
        assert_eq!(aromatic_atoms(&perceived("C1=CC=C2C=CC=CC2=C1")), 10);
        assert_eq!(aromatic_atoms(&perceived("C1=CC=C2C(=C1)C=CN2")), 9);
    }

    #[test]
    fn ring_membership_ignores_chains() {
        let mol = parse("CC1CC1C").unwrap();
        let in_ring = ring_membership(&mol.adjacency());
        assert_eq!(in_ring, vec![false, true, true, true, false]);
    }
}

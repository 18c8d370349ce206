use super::error::Error;
use crate::model::molecule::{Adjacency, Molecule};
use crate::model::types::Element;

/// Hydrogens an unbracketed atom carries for a given sum of bond orders.
///
/// Aromatic atoms reserve one valence unit for the pi system.
pub fn implicit_hydrogens(element: Element, aromatic: bool, bond_sum: u8) -> u8 {
    let valences = element.default_valences();
    if aromatic {
        match valences.first() {
            Some(&v0) if bond_sum < v0 => v0 - bond_sum - 1,
            _ => 0,
        }
    } else {
        valences
            .iter()
            .find(|&&v| v >= bond_sum)
            .map(|&v| v - bond_sum)
            .unwrap_or(0)
    }
}

/// Sum of bond orders at `atom`, counting aromatic bonds as single.
pub fn bond_sum(mol: &Molecule, adj: &Adjacency, atom: usize) -> u8 {
    adj[atom]
        .iter()
        .map(|&(_, bond)| mol.bonds[bond].order.sigma_valence())
        .fold(0u8, u8::saturating_add)
}

/// Whether an aromatic atom still has a free valence unit for a pi bond.
pub fn needs_pi_bond(mol: &Molecule, adj: &Adjacency, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    let Some(&v0) = a.element.charged_valences(a.charge).first() else {
        return false;
    };
    let used = i16::from(bond_sum(mol, adj, atom)) + i16::from(a.hydrogens);
    i16::from(v0) - used >= 1
}

fn max_valence(element: Element, charge: i8) -> Option<u8> {
    match element {
        Element::Cl | Element::Br | Element::I if charge == 0 => Some(7),
        _ => element.charged_valences(charge).last().copied(),
    }
}

/// Rejects atoms bonded beyond their highest allowed valence. Elements
/// without a conventional valence (metals, noble gases) are not checked.
pub fn check_valences(mol: &Molecule) -> Result<(), Error> {
    let adj = mol.adjacency();
    for (idx, atom) in mol.atoms.iter().enumerate() {
        let Some(max) = max_valence(atom.element, atom.charge) else {
            continue;
        };
        let valence = bond_sum(mol, &adj, idx).saturating_add(atom.hydrogens);
        if valence > max {
            return Err(Error::Valence {
                atom: idx,
                element: atom.element,
                valence,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::molecule::Bond;
    use crate::model::types::BondOrder;

    #[test]
    fn implicit_hydrogens_follow_lowest_fitting_valence() {
        assert_eq!(implicit_hydrogens(Element::C, false, 0), 4);
        assert_eq!(implicit_hydrogens(Element::C, false, 2), 2);
        assert_eq!(implicit_hydrogens(Element::N, false, 4), 1);
        assert_eq!(implicit_hydrogens(Element::S, false, 3), 1);
        assert_eq!(implicit_hydrogens(Element::Cl, false, 1), 0);
        assert_eq!(implicit_hydrogens(Element::C, false, 5), 0);
    }

    #[test]
    fn implicit_hydrogens_for_aromatic_atoms() {
        assert_eq!(implicit_hydrogens(Element::C, true, 2), 1);
        assert_eq!(implicit_hydrogens(Element::C, true, 3), 0);
        assert_eq!(implicit_hydrogens(Element::N, true, 2), 0);
        assert_eq!(implicit_hydrogens(Element::O, true, 2), 0);
    }

    #[test]
    fn pentavalent_carbon_is_rejected() {
        let mut mol = Molecule::new();
        mol.atoms.push(Atom::new(Element::C));
        for i in 1..=5 {
            mol.atoms.push(Atom::new(Element::F));
            mol.bonds.push(Bond::new(0, i, BondOrder::Single));
        }
        assert!(matches!(
            check_valences(&mol),
            Err(Error::Valence {
                atom: 0,
                valence: 5,
                ..
            })
        ));
    }

    #[test]
    fn metals_are_not_checked() {
        let mut mol = Molecule::new();
        mol.atoms.push(Atom::new(Element::Fe));
        for i in 1..=6 {
            mol.atoms.push(Atom::new(Element::Cl));
            mol.bonds.push(Bond::new(0, i, BondOrder::Single));
        }
        assert!(check_valences(&mol).is_ok());
    }
}

use crate::model::atom::StereoRef;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Removes explicit hydrogen atoms that carry no information of their own and
/// adds them to their neighbor's hydrogen count.
///
/// A hydrogen is folded when it is neutral, isotope- and class-free, and
/// singly bonded to exactly one non-hydrogen atom. Stereo references to it are
/// rewritten: tetrahedral references become implicit, double-bond references
/// move to the remaining substituent with the geometry flipped.
pub fn fold_explicit_hydrogens(mol: &mut Molecule) {
    let adj = mol.adjacency();
    let foldable: Vec<bool> = (0..mol.atom_count())
        .map(|idx| {
            let atom = &mol.atoms[idx];
            atom.is_hydrogen()
                && atom.charge == 0
                && atom.isotope.is_none()
                && atom.class.is_none()
                && atom.hydrogens == 0
                && match adj[idx].as_slice() {
                    [(neighbor, bond)] => {
                        mol.bonds[*bond].order == BondOrder::Single
                            && !mol.atoms[*neighbor].is_hydrogen()
                    }
                    _ => false,
                }
        })
        .collect();

    if !foldable.contains(&true) {
        return;
    }

    for h in (0..mol.atom_count()).filter(|&idx| foldable[idx]) {
        let (heavy, _) = adj[h][0];
        let atom = &mut mol.atoms[heavy];
        atom.hydrogens = atom.hydrogens.saturating_add(1);

        if let Some(stereo) = &mut atom.stereo {
            if stereo.refs.contains(&StereoRef::Implicit) {
                atom.stereo = None;
            } else {
                for r in &mut stereo.refs {
                    if *r == StereoRef::Atom(h) {
                        *r = StereoRef::Implicit;
                    }
                }
            }
        }
    }

    for bond_idx in 0..mol.bonds.len() {
        let Some(mut stereo) = mol.bonds[bond_idx].stereo else {
            continue;
        };
        let (i, j) = (mol.bonds[bond_idx].i, mol.bonds[bond_idx].j);
        let mut keep = true;
        for (end, partner, reference) in [(i, j, &mut stereo.ref_i), (j, i, &mut stereo.ref_j)] {
            if !foldable[*reference] {
                continue;
            }
            let replacement = adj[end]
                .iter()
                .map(|&(nb, _)| nb)
                .find(|&nb| nb != partner && nb != *reference && !foldable[nb]);
            match replacement {
                Some(nb) => {
                    *reference = nb;
                    stereo.configuration = stereo.configuration.flipped();
                }
                None => keep = false,
            }
        }
        mol.bonds[bond_idx].stereo = keep.then_some(stereo);
    }

    let kept: Vec<usize> = (0..mol.atom_count()).filter(|&idx| !foldable[idx]).collect();
    *mol = mol.extract(&kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::molecule::Configuration;
    use crate::smiles::parser::parse;

    #[test]
    fn folds_hydrogens_into_heavy_atoms() {
        let mut mol = parse("[H]C([H])([H])O[H]").unwrap();
        fold_explicit_hydrogens(&mut mol);
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.atoms[0].hydrogens, 3);
        assert_eq!(mol.atoms[1].hydrogens, 1);
    }

    #[test]
    fn keeps_isotopic_charged_and_molecular_hydrogen() {
        let mut deuterated = parse("[2H]C").unwrap();
        fold_explicit_hydrogens(&mut deuterated);
        assert_eq!(deuterated.atom_count(), 2);

        let mut hydrogen = parse("[H][H]").unwrap();
        fold_explicit_hydrogens(&mut hydrogen);
        assert_eq!(hydrogen.atom_count(), 2);

        let mut proton = parse("[H+]").unwrap();
        fold_explicit_hydrogens(&mut proton);
        assert_eq!(proton.atom_count(), 1);
    }

    #[test]
    fn explicit_hydrogen_becomes_implicit_stereo_reference() {
        let mut mol = parse("N[C@@]([H])(C)O").unwrap();
        fold_explicit_hydrogens(&mut mol);
        let stereo = mol.atoms[1].stereo.as_ref().unwrap();
        assert_eq!(
            stereo.refs,
            vec![
                StereoRef::Atom(0),
                StereoRef::Implicit,
                StereoRef::Atom(2),
                StereoRef::Atom(3)
            ]
        );
    }

    #[test]
    fn double_bond_reference_moves_off_hydrogen() {
        // [H] trans to F on the far carbon means Cl and F are cis.
        let mut mol = parse("[H]/C(Cl)=C/F").unwrap();
        fold_explicit_hydrogens(&mut mol);
        let stereo = mol.bonds.iter().find_map(|b| b.stereo).unwrap();
        assert_eq!(stereo.configuration, Configuration::Cis);
        assert_eq!(mol.atoms[stereo.ref_i].element.symbol(), "Cl");
    }
}

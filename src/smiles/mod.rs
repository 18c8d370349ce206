//! SMILES parsing, normalization and canonical writing.
//!
//! [`standardize`] is the entry point used by the curation pipeline. It runs
//! the full normalization chain on one string:
//!
//! 1. [`parse`] the OpenSMILES subset into a [`Molecule`];
//! 2. fold uninformative explicit hydrogens into their neighbors;
//! 3. kekulize aromatic input and check valences;
//! 4. pick the parent fragment (or keep all of them);
//! 5. perceive aromaticity from the Kekulé form;
//! 6. rank atoms canonically and write the result.
//!
//! Every step is deterministic, so the output is a pure function of the
//! input string, and writing a canonical string back through the chain
//! returns it unchanged.

mod aromaticity;
mod canon;
mod error;
mod hydrogens;
mod kekulize;
mod parser;
mod stereo;
mod valence;
mod writer;

pub use error::Error;
pub use parser::parse;
pub use writer::canonical_smiles;

use std::cmp::Ordering;

use crate::model::molecule::Molecule;

/// Controls how multi-fragment inputs are reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardizeOptions {
    /// Keep every fragment instead of only the parent one.
    pub keep_all_fragments: bool,
}

/// Parses `smiles` and returns its canonical form.
pub fn standardize(smiles: &str, options: &StandardizeOptions) -> Result<String, Error> {
    let molecule = normalize(parse(smiles)?)?;

    let mut fragments: Vec<(Molecule, String)> = molecule
        .fragments()
        .into_iter()
        .map(|mut fragment| {
            aromaticity::perceive(&mut fragment);
            let smiles = canonical_smiles(&fragment)?;
            Ok((fragment, smiles))
        })
        .collect::<Result<_, Error>>()?;

    if options.keep_all_fragments {
        let mut parts: Vec<String> = fragments.into_iter().map(|(_, s)| s).collect();
        parts.sort();
        return Ok(parts.join("."));
    }

    fragments.sort_by(|(a, a_smiles), (b, b_smiles)| compare_fragments(a, a_smiles, b, b_smiles));
    fragments
        .into_iter()
        .next()
        .map(|(_, smiles)| smiles)
        .ok_or(Error::Empty)
}

/// Brings a freshly parsed molecule to a Kekulé form with folded hydrogens
/// and verified valences.
pub fn normalize(mut molecule: Molecule) -> Result<Molecule, Error> {
    hydrogens::fold_explicit_hydrogens(&mut molecule);
    kekulize::kekulize(&mut molecule)?;
    valence::check_valences(&molecule)?;
    Ok(molecule)
}

/// Parent fragment first: most heavy atoms, then highest molecular weight,
/// then the lexicographically smaller canonical SMILES.
fn compare_fragments(a: &Molecule, a_smiles: &str, b: &Molecule, b_smiles: &str) -> Ordering {
    b.heavy_atom_count()
        .cmp(&a.heavy_atom_count())
        .then_with(|| b.molecular_weight().total_cmp(&a.molecular_weight()))
        .then_with(|| a_smiles.cmp(b_smiles))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(smiles: &str) -> String {
        standardize(smiles, &StandardizeOptions::default()).unwrap()
    }

    fn assert_fixed_point(smiles: &str) {
        let once = canon(smiles);
        assert_eq!(canon(&once), once, "{smiles} -> {once} is not a fixed point");
    }

    #[test]
    fn atom_order_does_not_matter() {
        assert_eq!(canon("OCC"), canon("CCO"));
        assert_eq!(canon("C(C)(C)O"), canon("CC(O)C"));
        assert_eq!(canon("c1ccc(cc1)O"), canon("Oc1ccccc1"));
    }

    #[test]
    fn kekule_and_aromatic_benzene_agree() {
        assert_eq!(canon("C1=CC=CC=C1"), canon("c1ccccc1"));
        assert_eq!(canon("c1ccccc1"), "c1ccccc1");
        assert_eq!(canon("C1=CC=CN=C1"), canon("c1ccncc1"));
    }

    #[test]
    fn salts_and_solvents_are_stripped() {
        assert_eq!(canon("CC(=O)O.[Na+]"), canon("CC(=O)O"));
        assert_eq!(canon("[Cl-].C[NH3+]"), "C[NH3+]");
        assert_eq!(canon("O.O.c1ccccc1C(=O)O"), canon("OC(=O)c1ccccc1"));
    }

    #[test]
    fn keeping_all_fragments_sorts_them() {
        let options = StandardizeOptions {
            keep_all_fragments: true,
        };
        let a = standardize("[Na+].CC(=O)[O-]", &options).unwrap();
        let b = standardize("CC(=O)[O-].[Na+]", &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split('.').count(), 2);
    }

    #[test]
    fn stereo_is_preserved() {
        assert_ne!(canon("F/C=C/F"), canon(r"F/C=C\F"));
        assert_eq!(canon("F/C=C/F"), canon(r"F\C=C\F"));
        assert_ne!(canon("N[C@@H](C)C(=O)O"), canon("N[C@H](C)C(=O)O"));
        assert_eq!(canon("N[C@@H](C)C(=O)O"), canon("C[C@H](N)C(=O)O"));
        assert!(canon("N[C@@H](C)C(=O)O").contains('@'));
    }

    #[test]
    fn ring_cis_trans_isomers_stay_distinct() {
        let cis = canon("C[C@H]1CC[C@@H](C)CC1");
        let trans = canon("C[C@H]1CC[C@H](C)CC1");
        assert_ne!(cis, trans);
        assert_eq!(cis.matches('@').count() - cis.matches("@@").count(), 2);

        // Both isomers are achiral: inverting every center changes nothing.
        assert_eq!(canon("C[C@@H]1CC[C@H](C)CC1"), cis);
        assert_eq!(canon("C[C@@H]1CC[C@@H](C)CC1"), trans);
        assert_eq!(canon("C1C[C@@H](C)CC[C@H]1C"), canon("C1C[C@H](C)CC[C@@H]1C"));

        assert_ne!(
            canon("C[C@H]1CC[C@@H](O)CC1"),
            canon("C[C@H]1CC[C@H](O)CC1")
        );
    }

    #[test]
    fn meaningless_stereo_is_dropped() {
        assert_eq!(canon("C[C@H](C)O"), canon("CC(C)O"));
        assert_eq!(canon("C/C=C(/C)C"), canon("CC=C(C)C"));
        assert_eq!(canon("C[C@H]1CCCCC1"), canon("CC1CCCCC1"));
        assert_eq!(canon("C1=C/CCCC/1"), canon("C1=CCCCC1"));
    }

    #[test]
    fn explicit_hydrogens_are_folded() {
        assert_eq!(canon("[H]OC([H])([H])C"), canon("CCO"));
        // Moving the hydrogen from first to second position inverts the symbol.
        assert_eq!(canon("[H][C@](N)(C)C(=O)O"), canon("N[C@@H](C)C(=O)O"));
    }

    #[test]
    fn canonical_output_is_a_fixed_point() {
        for smiles in [
            "CCO",
            "CC(=O)Nc1ccc(O)cc1",
            "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",
            "O=C1C=CC=CN1",
            "c1ccc2[nH]ccc2c1",
            "C/C=C/C=C/C(=O)O",
            "N[C@@H](Cc1ccccc1)C(=O)O",
            "C[C@H]1CC[C@@H](O)CC1",
            "[13CH3]C(=O)[O-]",
            "OC1=CC=C(C=C1)S(=O)(=O)N",
            "C1CC2CCC1CC2",
            "c1ccc2ccccc2c1",
            "C[N+](C)(C)C",
            "c1cc[n+](C)cc1",
        ] {
            assert_fixed_point(smiles);
        }
    }

    #[test]
    fn invalid_structures_are_rejected() {
        let options = StandardizeOptions::default();
        assert!(standardize("not_a_molecule", &options).is_err());
        assert!(standardize("", &options).is_err());
        assert!(standardize("C(F)(F)(F)(F)F", &options).is_err());
        assert!(standardize("c1cccc1", &options).is_err());
        assert!(standardize("C1CC", &options).is_err());
    }

    #[test]
    fn standardization_is_deterministic() {
        let first = canon("CC(C)Cc1ccc(cc1)[C@@H](C)C(=O)O");
        for _ in 0..5 {
            assert_eq!(canon("CC(C)Cc1ccc(cc1)[C@@H](C)C(=O)O"), first);
        }
    }
}

//! End-to-end curation of files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use qsar_curate::curate::{ColumnRole, UnitSource};
use qsar_curate::{CurateConfig, CurateError, PotencyUnit, UnknownUnitPolicy, curate_file};
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Parses the curated output back into (id, smiles, pIC50) rows.
fn read_output(path: &Path) -> (Vec<String>, Vec<(String, String, f64)>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (
                r[0].to_string(),
                r[1].to_string(),
                r[2].parse::<f64>().unwrap(),
            )
        })
        .collect();
    (headers, rows)
}

const ASSAY: &str = "\
Compound_ID,Canonical_SMILES,IC50 (nM),Assay
CHEMBL1,CCO,>1000,A
CHEMBL2,OCC,5,A
CHEMBL3,not_a_molecule,10,A
CHEMBL4,c1ccccc1O,100,B
CHEMBL5,Oc1ccccc1,1,B
CHEMBL6,CC(=O)O.[Na+],n/a,C
CHEMBL7,CC(=O)[O-].[Na+],<10,C
CHEMBL8,,50,C
CHEMBL9,C[C@@H](N)C(=O)O,1000,D
CHEMBL10,C[C@H](N)C(=O)O,10000,D
";

#[test]
fn curates_a_nanomolar_assay() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "assay.csv", ASSAY);

    let (output, curation) = curate_file(&input, None, &CurateConfig::default()).unwrap();
    assert_eq!(output, dir.path().join("assay_UNIVERSAL_CLEAN.csv"));
    assert_eq!(curation.unit.unit, PotencyUnit::Nanomolar);
    assert_eq!(curation.unit.source, UnitSource::Header);

    let (headers, rows) = read_output(&output);
    assert_eq!(headers, vec!["Compound_ID", "SMILES_Standard", "pIC50"]);

    let ids: Vec<&str> = rows.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["CHEMBL1", "CHEMBL4", "CHEMBL7", "CHEMBL9", "CHEMBL10"]
    );
    assert!((rows[0].2 - 6.0).abs() < 1e-9);
    assert!((rows[1].2 - 7.0).abs() < 1e-9);
    assert!((rows[2].2 - 8.0).abs() < 1e-9);

    // Enantiomers stay distinct.
    assert_ne!(rows[3].1, rows[4].1);

    let summary = curation.summary;
    assert_eq!(summary.total, 10);
    assert_eq!(summary.kept, 5);
    assert_eq!(summary.invalid_structure, 2);
    assert_eq!(summary.invalid_potency, 1);
    assert_eq!(summary.duplicates, 2);
}

#[test]
fn pic50_reference_values() {
    let dir = TempDir::new().unwrap();

    let um = write_input(&dir, "um.csv", "ID,SMILES,IC50 (uM)\na,CCN,50\n");
    let (output, _) = curate_file(&um, None, &CurateConfig::default()).unwrap();
    let (_, rows) = read_output(&output);
    assert!((rows[0].2 - 4.301).abs() < 1e-3);

    let nm = write_input(&dir, "nm.csv", "ID,SMILES,IC50 (nM)\na,CCN,>1000\n");
    let (output, _) = curate_file(&nm, None, &CurateConfig::default()).unwrap();
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "ID,SMILES_Standard,pIC50\na,CCN,6.0\n"
    );

    let bare = write_input(&dir, "bare.csv", "ID,SMILES,IC50\na,CCN,10\n");
    let (output, curation) = curate_file(&bare, None, &CurateConfig::default()).unwrap();
    assert_eq!(curation.unit.source, UnitSource::Assumed);
    let (_, rows) = read_output(&output);
    assert!((rows[0].2 - 8.0).abs() < 1e-3);
}

#[test]
fn missing_columns_leave_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "plain.csv", "Name,Value\nx,1\n");

    let err = curate_file(&input, None, &CurateConfig::default()).unwrap_err();
    match err {
        CurateError::MissingColumns { missing, available } => {
            let roles: Vec<ColumnRole> = missing.iter().map(|m| m.role).collect();
            assert_eq!(roles, ColumnRole::ALL.to_vec());
            assert_eq!(available, vec!["Name", "Value"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert!(!dir.path().join("plain_UNIVERSAL_CLEAN.csv").exists());
}

#[test]
fn strict_unit_policy_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bare.csv", "ID,SMILES,IC50\na,CCN,10\n");
    let config = CurateConfig {
        unknown_unit: UnknownUnitPolicy::Fail,
        ..CurateConfig::default()
    };

    let err = curate_file(&input, None, &config).unwrap_err();
    assert!(matches!(err, CurateError::UnitUndetermined { .. }));
    assert!(!dir.path().join("bare_UNIVERSAL_CLEAN.csv").exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = curate_file(
        &dir.path().join("absent.csv"),
        None,
        &CurateConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CurateError::Io(qsar_curate::io::Error::InputNotFound(_))
    ));
}

#[test]
fn runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "assay.csv", ASSAY);

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    curate_file(&input, Some(&first), &CurateConfig::default()).unwrap();
    curate_file(&input, Some(&second), &CurateConfig::default()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn output_structures_are_distinct_and_ordered() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("id,smiles,ic50 uM\n");
    let structures = [
        "C1=CC=CC=C1",
        "c1ccccc1",
        "CC(C)O",
        "OC(C)C",
        "F/C=C/F",
        "F/C=C\\F",
        "F\\C=C\\F",
        "[13CH4]",
        "C",
    ];
    for (i, smiles) in structures.iter().enumerate() {
        contents.push_str(&format!("m{i},{smiles},{}\n", i + 1));
    }
    let input = write_input(&dir, "set.csv", &contents);

    let (output, curation) = curate_file(&input, None, &CurateConfig::default()).unwrap();
    let (_, rows) = read_output(&output);

    let mut seen: Vec<&str> = rows.iter().map(|(_, s, _)| s.as_str()).collect();
    let count = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), count);

    let rows_in: Vec<usize> = curation.records.iter().map(|r| r.row).collect();
    assert_eq!(rows_in, vec![0, 2, 4, 5, 7, 8]);
}

#[test]
fn tab_separated_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "assay.tsv", "ID\tSMILES\tIC50 (uM)\nx\tOCC\t1\n");

    let (output, _) = curate_file(&input, None, &CurateConfig::default()).unwrap();
    assert_eq!(output, dir.path().join("assay_UNIVERSAL_CLEAN.tsv"));
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "ID\tSMILES_Standard\tpIC50\nx\tCCO\t6.0\n"
    );
}

#[test]
fn configuration_from_toml() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "ki.csv",
        "Name,Structure,Ki,IC50\nn1,CCO.O,100,ignored\n",
    );
    let config = CurateConfig::from_toml_str(
        r#"
        unit = "nm"
        keep_all_fragments = true
        output_suffix = "_ki"

        [columns]
        structure = "structure"
        identifier = "name"
        potency = "ki"
        "#,
    )
    .unwrap();

    let (output, curation) = curate_file(&input, None, &config).unwrap();
    assert_eq!(output, dir.path().join("ki_ki.csv"));
    assert_eq!(curation.unit.source, UnitSource::Override);
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "Name,SMILES_Standard,pIC50\nn1,CCO.O,7.0\n"
    );
}

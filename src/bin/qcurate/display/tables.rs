use std::io::{self, Write};
use std::path::Path;

use qsar_curate::curate::{ResolvedUnit, UnitSource};
use qsar_curate::{ColumnMap, CuratedRecord, RemovalSummary};

use crate::util::text::{count_noun, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_column_map(columns: &ColumnMap, unit: &ResolvedUnit) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let unit_text = match unit.source {
        UnitSource::Header => format!("{} (from header)", unit.unit),
        UnitSource::Override => format!("{} (configured)", unit.unit),
        UnitSource::Assumed => format!("{} (assumed!)", unit.unit),
    };
    let rows = vec![
        ("Structure", columns.structure.name.clone()),
        ("Identifier", columns.identifier.name.clone()),
        ("Potency", columns.potency.name.clone()),
        ("Potency Unit", unit_text),
    ];
    print_kv_table(&mut out, "Column Mapping", &rows);
}

pub fn print_curation_summary(summary: &RemovalSummary, records: &[CuratedRecord]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Input Rows", summary.total.to_string()),
        ("Curated Rows", summary.kept.to_string()),
        ("Removed", summary.removed().to_string()),
    ];
    if let Some((min, max)) = pic50_range(records) {
        rows.push(("pIC50 Range", format!("{min:.2} – {max:.2}")));
    }
    print_kv_table(&mut out, "Curation Summary", &rows);

    if summary.total > 0 {
        let outcomes = [
            ("Kept".to_string(), summary.kept),
            ("Duplicate".to_string(), summary.duplicates),
            ("Bad SMILES".to_string(), summary.invalid_structure),
            ("Bad IC50".to_string(), summary.invalid_potency),
        ];
        print_distribution_table(&mut out, "Row Outcomes", &outcomes, summary.total);
    }
}

/// Plain status lines for non-interactive runs.
pub fn print_plain_summary(summary: &RemovalSummary, output: &Path, detailed: bool) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(
        stderr,
        "Removed {} duplicate/invalid entries.",
        summary.removed()
    );
    if detailed {
        let _ = writeln!(
            stderr,
            "  {} with invalid SMILES, {} with invalid IC50, {} duplicate",
            summary.invalid_structure,
            summary.invalid_potency,
            count_noun(summary.duplicates, "structure", "structures")
        );
    }
    let _ = writeln!(
        stderr,
        "Saved {} to {}",
        count_noun(summary.kept, "curated row", "curated rows"),
        output.display()
    );
}

fn pic50_range(records: &[CuratedRecord]) -> Option<(f64, f64)> {
    records.iter().map(|r| r.pic50).fold(None, |range, v| match range {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Outcome", "Rows", "Share",
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, count) in data {
        let pct = (*count as f64 / total as f64) * 100.0;
        let bar = make_bar(pct, max_bar_width);
        let dist_cell = format!("{bar}  {pct:>5.1}%");
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell,
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

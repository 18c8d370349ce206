use anyhow::{Context, Result};

use qsar_curate::curate::{Curation, UnitSource, output_path_for, write_curation};
use qsar_curate::io::{Format, read_table};
use qsar_curate::{CurateConfig, curate};

use crate::cli::CurateArgs;
use crate::config::build_curate_config;
use crate::display::{
    Context as DisplayContext, Progress, print_column_map, print_curation_summary,
    print_plain_summary,
};
use crate::util::path::file_label;
use crate::util::text::count_noun;

const TOTAL_STEPS: u8 = 3;

pub fn run_curate(args: CurateArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_curate_config(&args)?;
    let output = output_path_for(&args.input, args.output.as_deref(), &config);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading table");
    let table = read_table(&args.input)
        .with_context(|| format!("Failed to load input table {}", args.input.display()))?;
    progress.complete_step(
        "Reading table",
        &[format!(
            "{} × {} from {}",
            count_noun(table.row_count(), "row", "rows"),
            count_noun(table.column_count(), "column", "columns"),
            file_label(&args.input)
        )],
    );

    progress.step("Curating records");
    let curation = curate(&table, &config).context("Curation failed")?;
    progress.complete_step("Curating records", &curation_details(&curation, &config));

    if ctx.interactive {
        print_column_map(&curation.columns, &curation.unit);
    }

    progress.step("Writing output");
    write_curation(&output, &curation)
        .with_context(|| format!("Failed to write curated table {}", output.display()))?;
    progress.complete_step(
        "Writing output",
        &[format!(
            "Write {} → {}",
            Format::from_path(&output),
            file_label(&output)
        )],
    );

    if ctx.interactive {
        print_curation_summary(&curation.summary, &curation.records);
        progress.finish("Curation complete");
    } else if ctx.status {
        print_plain_summary(&curation.summary, &output, ctx.verbose);
    }

    Ok(())
}

fn curation_details(curation: &Curation, config: &CurateConfig) -> Vec<String> {
    let summary = &curation.summary;
    let unit = &curation.unit;

    let mut details = vec![format!(
        "Columns: {} / {} / {}",
        curation.columns.structure.name,
        curation.columns.identifier.name,
        curation.columns.potency.name
    )];
    details.push(match unit.source {
        UnitSource::Assumed => format!("Potency unit not in header, assuming {}", unit.unit),
        _ => format!("Potency unit: {} ({})", unit.unit, unit.source),
    });
    details.push(if config.keep_all_fragments {
        "Canonicalize structures (all fragments)".to_string()
    } else {
        "Canonicalize structures (largest fragment)".to_string()
    });
    details.push(format!(
        "Removed {} duplicate/invalid entries",
        summary.removed()
    ));
    details
}

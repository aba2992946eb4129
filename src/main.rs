use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use proper_oxides::data::{loader, writer};
use proper_oxides::{FilterOptions, FilterPipeline, FormulaTable, LogReporter};

/// Proper oxides - drop non-oxide rows from a table of chemical formulas
///
/// Examples:
///   # Remove nitrates, sulfates, phosphates and carbonates (default)
///   proper-oxides materials.csv -o clean.csv
///
///   # Keep metal oxides only, and show what was removed
///   proper-oxides materials.parquet --metal-oxides-only -v -o clean.json
///
///   # Also drop hydroxides and one specific formula
///   proper-oxides materials.json -p OH -x H2O2 -o clean.json
#[derive(Parser, Debug)]
#[command(name = "proper-oxides")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Stage order:\n  \
    1. --metal-oxides-only: O plus metals, As or P only\n  \
    2. complex anions (NO3, NO2, PO2-PO5, SO2-SO4, CO3) unless --keep-complex\n  \
    3. --pattern substrings\n  \
    4. --exclude exact formulas\n\n\
Progress goes to the log; set RUST_LOG=warn to silence it.")]
struct Cli {
    /// Input table (.csv, .json or .parquet)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the surviving rows here (.csv or .json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Name of the column holding formulas
    #[arg(long, default_value = "formula", value_name = "NAME")]
    formula_column: String,

    /// JSON file with filter options; flags below are applied on top
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Allow no non-metals other than O, As and P
    #[arg(short, long)]
    metal_oxides_only: bool,

    /// Do not remove common complex anions
    #[arg(long)]
    keep_complex: bool,

    /// Extra substring to filter out (repeatable)
    #[arg(short, long = "pattern", value_name = "TEXT")]
    patterns: Vec<String>,

    /// Exact formula to filter out (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "FORMULA")]
    formulas: Vec<String>,

    /// Log the removed formulas of every stage
    #[arg(short, long)]
    verbose: bool,

    /// Write the removal report as JSON
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = build_options(cli)?;

    let loaded = loader::load_file(&cli.input, &cli.formula_column)?;
    info!("Loaded {} rows from {}", loaded.len(), cli.input.display());

    let outcome = FilterPipeline::default().run(loaded.table, &options, &mut LogReporter)?;
    let filtered = FormulaTable {
        table: outcome.table,
        column_names: loaded.column_names,
    };

    println!(
        "Kept {} rows, removed {}",
        filtered.len(),
        outcome.report.total_removed()
    );

    if let Some(path) = &cli.output {
        writer::save_file(&filtered, path, &cli.formula_column)?;
        println!("Wrote {}", path.display());
    }

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&outcome.report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn build_options(cli: &Cli) -> Result<FilterOptions> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => FilterOptions::default(),
    };

    options.metal_oxides_only |= cli.metal_oxides_only;
    options.verbose |= cli.verbose;
    if cli.keep_complex {
        options.filter_complex = false;
    }
    options.additional_patterns.extend(cli.patterns.iter().cloned());
    options.specific_formulas.extend(cli.formulas.iter().cloned());

    options.validate()?;
    Ok(options)
}

fn load_options(path: &Path) -> Result<FilterOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_build_options() {
        let cli = Cli::try_parse_from([
            "proper-oxides",
            "in.csv",
            "--metal-oxides-only",
            "--keep-complex",
            "-p",
            "OH",
            "-x",
            "MgO",
            "-x",
            "ZnO",
        ])
        .unwrap();
        let options = build_options(&cli).unwrap();
        assert!(options.metal_oxides_only);
        assert!(!options.filter_complex);
        assert!(!options.verbose);
        assert_eq!(options.additional_patterns, vec!["OH"]);
        assert_eq!(options.specific_formulas, vec!["MgO", "ZnO"]);
    }

    #[test]
    fn test_flags_merge_onto_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("filter.json");
        std::fs::write(&config, r#"{ "additional_patterns": ["OH"], "verbose": true }"#).unwrap();

        let cli = Cli::try_parse_from([
            "proper-oxides",
            "in.csv",
            "--config",
            config.to_str().unwrap(),
            "-p",
            "H2",
        ])
        .unwrap();
        let options = build_options(&cli).unwrap();
        assert!(options.verbose);
        assert!(options.filter_complex);
        assert_eq!(options.additional_patterns, vec!["OH", "H2"]);
    }

    #[test]
    fn test_blank_pattern_flag_rejected() {
        let cli = Cli::try_parse_from(["proper-oxides", "in.csv", "-p", ""]).unwrap();
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn test_run_writes_output_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        let report = dir.path().join("report.json");
        std::fs::write(
            &input,
            "formula,id\nFe2O3,1\nNaNO3,2\nCaCO3,3\nMgO,4\nSiO2,5\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "proper-oxides",
            input.to_str().unwrap(),
            "-m",
            "-o",
            output.to_str().unwrap(),
            "-r",
            report.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "formula,id\nFe2O3,1\nMgO,4\n");

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(report["stages"][0]["stage"], "metal_oxides");
        assert_eq!(report["stages"][0]["rows_after"], 2);
        assert_eq!(report["stages"][1]["stage"], "complex_anions");
    }
}

//! Statmelt CLI - Reshape residency statistics into tidy CSV
//!
//! # Main Commands
//!
//! ```bash
//! statmelt reshape                  # Reshape the e-Stat extract (default paths)
//! statmelt cohort                   # Derive cohort progress from the JSON export
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! statmelt inspect input.csv        # Show grid layout, labels and regions
//! statmelt validate input.json      # Validate cohort records against the schema
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use statmelt::cohort::{self, derive_cohort};
use statmelt::reshape::{self, bureau_prefix, reshape_csv, EstatLayout, WideTable};
use statmelt::table::read_table;
use statmelt::validation::validate_cohort_record;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "statmelt")]
#[command(about = "Reshape e-Stat residency extracts and cohort reports into tidy CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape an e-Stat extract into long format
    Reshape {
        /// Input e-Stat CSV extract
        #[arg(default_value = reshape::DEFAULT_INPUT)]
        input: PathBuf,

        /// Output tidy CSV file
        #[arg(short, long, default_value = reshape::DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Derive cohort progress from a JSON export
    Cohort {
        /// Input JSON file (array of cohort records)
        #[arg(default_value = cohort::DEFAULT_INPUT)]
        input: PathBuf,

        /// Output cohort progress CSV file
        #[arg(short, long, default_value = cohort::DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Show the grid layout of an e-Stat extract
    Inspect {
        /// Input e-Stat CSV extract
        input: PathBuf,

        /// Number of region series to list (default: 10)
        #[arg(long, default_value = "10")]
        regions: usize,
    },

    /// Validate cohort records against the embedded schema
    Validate {
        /// Input JSON file (array of records)
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reshape { input, output } => cmd_reshape(&input, &output),

        Commands::Cohort { input, output } => cmd_cohort(&input, &output),

        Commands::Inspect { input, regions } => cmd_inspect(&input, regions),

        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_reshape(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reshaping: {}", input.display());

    let summary = reshape_csv(input, output)?;

    eprintln!("\n📊 Summary:");
    eprintln!("   Encoding: {}", summary.encoding);
    eprintln!("   Data rows: {}", summary.data_rows);
    eprintln!("   Regions: {}", summary.regions);
    eprintln!("   Records: {}", summary.records);
    if summary.cells.coerced > 0 {
        eprintln!("   ⚠️  Coerced cells: {}", summary.cells.coerced);
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_cohort(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Deriving cohort progress: {}", input.display());

    let summary = derive_cohort(input, output)?;

    eprintln!("\n📊 First rows:");
    eprintln!(
        "   {:<10} {:>14} {:>15} {:>14}",
        "Month", "Total_Applied", "Total_Approved", "Activity_Rate"
    );
    for row in summary.rows.iter().take(5) {
        eprintln!(
            "   {:<10} {:>14} {:>15} {:>14.4}",
            row.month, row.total_applied, row.total_approved, row.activity_rate
        );
    }

    if summary.skipped > 0 {
        eprintln!("\n⚠️  {} records skipped", summary.skipped);
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_inspect(input: &Path, regions: usize) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Inspecting: {}", input.display());

    let table = read_table(input)?;
    eprintln!("   Encoding: {}", table.encoding);
    eprintln!("   Rows: {}", table.rows.len());

    let layout = EstatLayout::default();
    let wide = WideTable::from_table(&table, &layout)?;

    println!("\n📋 Attribute columns:");
    for (i, label) in wide.attr_labels.iter().enumerate() {
        println!("   [{:>2}] {}", i, label);
    }

    println!("\n📋 Region series ({}):", wide.regions());
    for name in wide.region_names.iter().take(regions) {
        let bureau = bureau_prefix(name);
        if bureau.is_empty() {
            println!("   {}", name);
        } else {
            println!("   {} (局: {})", name, bureau);
        }
    }
    if wide.regions() > regions {
        println!("   ... +{} more", wide.regions() - regions);
    }

    println!("\n   Data rows: {}", wide.data_rows());
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Vec<Value> = serde_json::from_str(&content)?;

    let mut valid = 0;
    let mut invalid = 0;

    for (i, record) in records.iter().enumerate() {
        match validate_cohort_record(record) {
            Ok(()) => valid += 1,
            Err(errors) => {
                invalid += 1;
                if invalid <= 5 {
                    eprintln!("\n❌ Record {} invalid:", i);
                    for err in errors.iter().take(3) {
                        eprintln!("   - {}", err);
                    }
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

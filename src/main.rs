use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use prospect_cleaner::app::extract_use_case::ExtractContactsUseCase;
use prospect_cleaner::config::{detect_date_column, ExclusionConfig, PipelineConfig, RulesFile};
use prospect_cleaner::infra::csv_sink::CsvExporter;
use prospect_cleaner::infra::csv_source;
use prospect_cleaner::logging;
use prospect_cleaner::pipeline::PipelineStats;

#[derive(Parser)]
#[command(name = "prospect_cleaner")]
#[command(about = "Outlook export to clean prospect contacts pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction pipeline over an exported CSV
    Run {
        /// Input CSV exported from Outlook
        input: PathBuf,
        /// Directory for the three output tables
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Lookback window in months for the "Cliente reciente" label
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// Date column name; auto-detected from common Outlook headers when omitted
        #[arg(long)]
        date_column: Option<String>,
        /// Disable the built-in role-account exclusion list
        #[arg(long)]
        no_role_exclusions: bool,
        /// Custom exclusion pattern for local-parts (repeatable)
        #[arg(long = "exclude")]
        exclude_patterns: Vec<String>,
        /// Treat custom exclusion patterns as regexes
        #[arg(long)]
        regex: bool,
        /// TOML file with additional exclusion rules
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Omit the Pais column from the output tables
        #[arg(long)]
        no_country: bool,
    },
    /// Show the columns of an exported CSV and the detected date column
    Inspect {
        /// Input CSV exported from Outlook
        input: PathBuf,
    },
}

fn print_summary(stats: &PipelineStats, output_dir: &PathBuf) {
    println!("\n📊 Extraction results:");
    println!("   Rows processed: {}", stats.rows_processed);
    println!("   Addresses harvested: {}", stats.addresses_harvested);
    println!("   Unique contacts: {}", stats.unique_contacts);
    println!("   Recent: {}", stats.recent);
    println!("   Follow-up: {}", stats.follow_up);
    println!("   Companies: {}", stats.companies);
    println!("   Excluded: {}", stats.excluded);
    println!("   Output directory: {}", output_dir.display());
}

#[allow(clippy::too_many_arguments)]
async fn run_extraction(
    input: PathBuf,
    output_dir: PathBuf,
    months: u32,
    date_column: Option<String>,
    no_role_exclusions: bool,
    mut exclude_patterns: Vec<String>,
    mut regex: bool,
    rules: Option<PathBuf>,
    no_country: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (headers, rows) = csv_source::read_rows(&input)?;

    let mut use_role_list = !no_role_exclusions;
    if let Some(rules_path) = rules {
        let rules = RulesFile::load(&rules_path)?;
        exclude_patterns.extend(rules.patterns);
        regex = regex || rules.use_regex;
        use_role_list = use_role_list && !rules.disable_role_list;
    }

    let date_column = match date_column {
        Some(column) => {
            if !headers.contains(&column) {
                println!("⚠️  Column '{}' not found in input, contacts will all be follow-up", column);
            }
            Some(column)
        }
        None => {
            let detected = detect_date_column(&headers);
            match &detected {
                Some(column) => info!(column = %column, "Auto-detected date column"),
                None => println!("⚠️  No date column detected, contacts will all be follow-up"),
            }
            detected
        }
    };

    let config = PipelineConfig {
        lookback_months: months,
        date_column,
        emit_country: !no_country,
        exclusion: ExclusionConfig {
            use_role_list,
            custom_patterns: exclude_patterns,
            use_regex: regex,
        },
    };

    let exporter = Arc::new(CsvExporter::new(output_dir.clone(), config.emit_country)?);
    let use_case = ExtractContactsUseCase::new(config, exporter);
    let stats = use_case.run(&rows, Local::now().naive_local()).await?;

    print_summary(&stats, &output_dir);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output_dir,
            months,
            date_column,
            no_role_exclusions,
            exclude_patterns,
            regex,
            rules,
            no_country,
        } => {
            println!("🔄 Running contact extraction...");
            if let Err(e) = run_extraction(
                input,
                output_dir,
                months,
                date_column,
                no_role_exclusions,
                exclude_patterns,
                regex,
                rules,
                no_country,
            )
            .await
            {
                error!("Extraction failed: {}", e);
                println!("❌ Extraction failed: {}", e);
                std::process::exit(1);
            }
            println!("✅ Extraction completed successfully");
        }
        Commands::Inspect { input } => {
            let (headers, rows) = csv_source::read_rows(&input)?;
            println!("📋 {} columns, {} rows", headers.len(), rows.len());
            for header in &headers {
                println!("   - {}", header);
            }
            match detect_date_column(&headers) {
                Some(column) => println!("🕒 Detected date column: {}", column),
                None => println!("🕒 No date column detected"),
            }
        }
    }
    Ok(())
}

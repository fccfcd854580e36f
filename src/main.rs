//! tabstore - Save and load tabular data as CSV

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabstore::output::{render_to_stdout, Dataset, OutputFormat};
use tabstore::{record, row, BackendKind, Record, Rows, StoreConfig, TabularStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBackend {
    Csv,
    Frame,
    Arrow,
}

impl From<CliBackend> for BackendKind {
    fn from(b: CliBackend) -> Self {
        match b {
            CliBackend::Csv => BackendKind::Csv,
            CliBackend::Frame => BackendKind::Frame,
            CliBackend::Arrow => BackendKind::Arrow,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Save and load tabular data as CSV
#[derive(Parser, Debug)]
#[command(name = "tabstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Library adapter used for reads and writes
    #[arg(short, long, value_enum, default_value = "csv", global = true)]
    backend: CliBackend,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the contents of a CSV file
    Show {
        file: PathBuf,

        /// Treat the first line as a header and print records
        #[arg(long)]
        dicts: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: CliOutputFormat,
    },

    /// Append one row to a CSV file, creating it if absent
    Append {
        file: PathBuf,

        /// Field values of the new row
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// List the CSV files in a directory
    List { dir: PathBuf },

    /// Write sample score data as rows and as records, then read both back
    Demo { dir: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tabstore=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabstore=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let backend = BackendKind::from(cli.backend);

    match cli.command {
        Command::Show { file, dicts, format } => {
            let store = TabularStore::from_config(&StoreConfig::default().with_backend(backend))?;
            let data = if dicts {
                Dataset::Records(
                    store
                        .load_dicts(&file)
                        .with_context(|| format!("Failed to load records: {}", file.display()))?,
                )
            } else {
                Dataset::Rows(
                    store
                        .load_rows(&file)
                        .with_context(|| format!("Failed to load rows: {}", file.display()))?,
                )
            };
            render_to_stdout(&data, format.into())
        }
        Command::Append { file, fields } => {
            let store = TabularStore::from_config(&StoreConfig::default().with_backend(backend))?;
            store
                .append_rows(&[fields], &file)
                .with_context(|| format!("Failed to append to {}", file.display()))?;
            Ok(())
        }
        Command::List { dir } => {
            let store = TabularStore::from_config(&StoreConfig::new(&dir).with_backend(backend))?;
            for name in store.list_files()? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Demo { dir } => run_demo(&StoreConfig::new(&dir).with_backend(backend)),
    }
}

fn sample_data() -> (Rows, Vec<Record>) {
    let people = [
        ("Taro Tanaka", 25, 1500),
        ("Hanako Sato", 30, 2400),
        ("Ichiro Suzuki", 22, 3200),
        ("Misaki Takahashi", 27, 2800),
        ("Kenta Ito", 35, 4100),
    ];

    let mut rows = vec![row(["name", "age", "score"])];
    rows.extend(
        people
            .iter()
            .map(|(name, age, score)| row([name.to_string(), age.to_string(), score.to_string()])),
    );

    let records = people
        .iter()
        .map(|(name, age, score)| {
            record([
                ("name", name.to_string()),
                ("age", age.to_string()),
                ("score", score.to_string()),
            ])
        })
        .collect();

    (rows, records)
}

fn run_demo(config: &StoreConfig) -> Result<()> {
    let store = TabularStore::from_config(config)?;
    let (rows, records) = sample_data();
    info!(backend = %store.backend_kind(), "running demo");

    store.save_rows(&rows, "list_data")?;
    store.save_dicts(&records, "dict_data")?;

    println!("list_data.csv:");
    render_to_stdout(&Dataset::Rows(store.load_rows("list_data")?), OutputFormat::Table)?;
    println!("dict_data.csv:");
    render_to_stdout(&Dataset::Records(store.load_dicts("dict_data")?), OutputFormat::Table)?;

    Ok(())
}

mod db;
mod error;
mod models;
mod operations;

use clap::Parser;
use db::repository::LedgerStore;
use models::display_row::DisplayRow;
use operations::ledger_view::LedgerViewModel;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Personal income and expense ledger.
#[derive(Debug, Parser)]
#[command(name = "fintrack", version)]
struct Args {
    /// SQLite file holding the ledger. Created when missing.
    #[arg(long, default_value = "finance.db")]
    db: PathBuf,

    /// Where log output goes. The terminal itself is used by the UI.
    #[arg(long, default_value = "fintrack.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Print the transaction table to stdout and exit.
    #[arg(long)]
    print: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(&args.log_file, args.log_level) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let store = match LedgerStore::open(&args.db) {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match store.count() {
        Ok(records) => info!(db = %args.db.display(), records, "ledger opened"),
        Err(e) => warn!("{}", e),
    }
    let mut view_model = LedgerViewModel::new(store);

    let result = if args.print {
        print_rows(&mut view_model)
    } else {
        operations::tracker::run_tracker(&mut view_model, &args.db)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_rows(view_model: &mut LedgerViewModel) -> Result<(), String> {
    let rows = view_model.refresh().map_err(|e| e.to_string())?;
    for line in render_lines(rows) {
        println!("{}", line);
    }
    Ok(())
}

fn render_lines(rows: &[DisplayRow]) -> Vec<String> {
    let mut lines = vec![format_line(["ID", "Date", "Type", "Category", "Amount", "Description"])];
    lines.extend(rows.iter().map(|row| {
        format_line([
            row.id.as_str(),
            row.date.as_str(),
            row.kind.as_str(),
            row.category.as_str(),
            row.amount.as_str(),
            row.description.as_str(),
        ])
    }));
    lines
}

fn format_line(cells: [&str; 6]) -> String {
    let [id, date, kind, category, amount, description] = cells;
    format!(
        "{:>6}  {:<10}  {:<8}  {:<14}  {:>20}  {}",
        id, date, kind, category, amount, description
    )
    .trim_end()
    .to_string()
}

fn init_logger(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

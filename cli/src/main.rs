mod report;

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use sales_report_core::model::sample::{additional_sample_entries, sample_entries};
use sales_report_core::config::DEFAULT_SEED_SALESPERSONS;
use sales_report_core::input::parse_salesperson;
use sales_report_core::time::now_minute;
use sales_report_core::{
    details_from_args, entry_draft_from_args, parse_report_date, resolve_identity, AppConfig,
    DirectoryService, ExportError, FileReportRepository, FileSalespersonRepository, ReportError,
    ReportKey, ReportResult, ReportSession, SummaryView, ValidationError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sales-report")]
#[command(about = "Daily sales report: log deals, track the target, export to Excel", long_about = None)]
struct Cli {
    /// Config file (default: ~/.sales-report/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report date: today, yesterday, -3d, monday, 2025-03-14
    #[arg(long, global = true, default_value = "today", allow_hyphen_values = true, value_parser = parse_report_date)]
    date: NaiveDate,

    /// Salesperson the report belongs to
    #[arg(long, global = true)]
    sales: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the report and its performance summary
    Show,
    /// Add an entry (usage: add customer:"PT ABC" product:Consulting qty:2 price:1500000 status:closing)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete the entry with this number
    Delete { number: u32 },
    /// Set report details (usage: set target:15000000 area:Jakarta team:Alpha contact:0812..)
    Set {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove every entry from the report
    Clear,
    /// Append demo entries
    Sample {
        /// Also add the extended demo set
        #[arg(long)]
        all: bool,
    },
    /// Write the report as an .xlsx file
    Export {
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the stored reports of the current user
    Reports,
    /// Manage the shared salesperson directory
    #[command(subcommand)]
    Salespersons(SalespersonCommands),
}

#[derive(clap::Subcommand)]
enum SalespersonCommands {
    /// List known salespersons
    List,
    /// Register a salesperson for everyone
    Register { name: String },
    /// Print names as other users register them
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

impl Commands {
    fn writes_report(&self) -> bool {
        matches!(self, Commands::Add { .. } | Commands::Set { .. } | Commands::Sample { .. })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct App {
    config: AppConfig,
    reports: FileReportRepository,
    salespersons: FileSalespersonRepository,
}

fn bootstrap(cli: &Cli) -> ReportResult<App> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let data_dir = config.data_dir()?;
    let identity = resolve_identity(&config, &data_dir);
    debug!(data_dir = %data_dir.display(), user = %identity.user_id, anonymous = identity.anonymous, "bootstrapped");

    let reports = FileReportRepository::new(&data_dir, &identity.user_id)?;
    let salespersons = FileSalespersonRepository::new(&data_dir)?;
    Ok(App { config, reports, salespersons })
}

/// `--sales`, then the configured default, then the first seeded name.
fn pick_salesperson(cli: &Cli, config: &AppConfig) -> Result<String, ValidationError> {
    let raw = cli
        .sales
        .as_deref()
        .or(config.report.salesperson.as_deref())
        .or(config.report.seed_salespersons.first().map(String::as_str))
        .unwrap_or(DEFAULT_SEED_SALESPERSONS[0]);
    parse_salesperson(raw)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = match bootstrap(&cli) {
        Ok(app) => app,
        Err(e) => {
            let prefix = if e.is_fatal() { "Fatal" } else { "Error" };
            eprintln!("{}: {}", prefix, e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ReportError>() {
                Some(re) if !re.is_fatal() => eprintln!("⚠️  {}", re),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(mut cli: Cli, app: &App) -> Result<()> {
    let command = cli.command.take().unwrap_or(Commands::Show);

    let mut directory = DirectoryService::new(&app.salespersons, &app.config.report.seed_salespersons);
    directory.connect().map_err(ReportError::from)?;

    if let Commands::Salespersons(sub) = &command {
        return run_salespersons(sub, &mut directory);
    }

    let salesperson = pick_salesperson(&cli, &app.config).map_err(ReportError::from)?;
    if command.writes_report() && !directory.directory().contains(&salesperson) {
        info!(salesperson = %salesperson, "registering new salesperson");
        directory.register(&salesperson).map_err(ReportError::from)?;
    }

    let key = ReportKey::new(cli.date, salesperson);
    let mut session = ReportSession::open(&app.reports, key).map_err(ReportError::from)?;
    let currency = &app.config.export.currency;

    match &command {
        Commands::Show => {
            report::print_header(session.state(), currency);
            report::print_entries(session.state(), currency);
            report::print_summary(&SummaryView::from_summary(&session.summary(), currency));
        }
        Commands::Add { args } => {
            let entry = entry_draft_from_args(args)
                .and_then(|draft| draft.validate(now_minute()))
                .map_err(ReportError::from)?;
            let added = session.add_entry(entry)?;
            println!(
                "Entry #{} added: {} / {} ({}) {}",
                added.sequence_number,
                added.customer_name,
                added.product_name,
                currency.format(added.total()),
                added.status.icon()
            );
        }
        Commands::Delete { number } => {
            let removed = session.delete_entry_number(*number)?;
            println!("Deleted #{}: {}", number, removed.customer_name);
        }
        Commands::Set { args } => {
            let details = details_from_args(args, session.state().details()).map_err(ReportError::from)?;
            session.set_details(details)?;
            report::print_header(session.state(), currency);
        }
        Commands::Clear => {
            let count = session.clear_entries()?;
            println!("Removed {} entries.", count);
        }
        Commands::Sample { all } => {
            let mut entries = sample_entries();
            if *all {
                entries.extend(additional_sample_entries());
            }
            let count = session.add_entries(entries)?;
            println!("Added {} sample entries.", count);
        }
        Commands::Export { out } => {
            let exported = match session.export(&app.config.export) {
                Ok(exported) => exported,
                Err(ExportError::EmptyReport) => {
                    eprintln!("⚠️  No entries to export. Add at least one entry first.");
                    return Ok(());
                }
                Err(e) => return Err(ReportError::from(e).into()),
            };

            let dir = out.clone().unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(&exported.file_name);
            fs::write(&path, &exported.bytes).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = exported.bytes.len(), "report exported");

            let summary = SummaryView::from_summary(&session.summary(), currency);
            println!("{}", report::export_message(&path.display().to_string(), &summary));
        }
        Commands::Reports => {
            let keys = app.reports.list_keys().map_err(ReportError::from)?;
            if keys.is_empty() {
                println!("No reports found.");
            }
            for key in keys {
                println!("{}  {}", key.date.format("%Y-%m-%d"), key.salesperson);
            }
        }
        Commands::Salespersons(_) => {}
    }
    Ok(())
}

fn run_salespersons(
    command: &SalespersonCommands,
    directory: &mut DirectoryService<&FileSalespersonRepository>,
) -> Result<()> {
    match command {
        SalespersonCommands::List => {
            for name in directory.directory().names() {
                println!("{}", name);
            }
        }
        SalespersonCommands::Register { name } => {
            directory.register(name).map_err(ReportError::from)?;
            println!("Registered '{}'. {} salespersons known.", name.trim(), directory.directory().len());
        }
        SalespersonCommands::Watch { interval } => {
            let mut seen: BTreeSet<String> = directory.directory().names().map(str::to_string).collect();
            println!("Watching the salesperson directory ({} known). Ctrl-C to stop.", seen.len());
            loop {
                thread::sleep(Duration::from_secs((*interval).max(1)));
                if let Err(e) = directory.repository().refresh() {
                    warn!(error = %e, "directory refresh failed");
                    continue;
                }
                if directory.sync() == 0 {
                    continue;
                }
                for name in directory.directory().names() {
                    if seen.insert(name.to_string()) {
                        println!("+ {}", name);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_name_is_trimmed() {
        let cli = Cli::parse_from(["sales-report", "--sales", " Budi ", "show"]);
        assert_eq!(pick_salesperson(&cli, &AppConfig::default()).unwrap(), "Budi");
    }

    #[test]
    fn test_blank_sales_name_is_rejected() {
        let cli = Cli::parse_from(["sales-report", "--sales", "  ", "show"]);
        assert_eq!(
            pick_salesperson(&cli, &AppConfig::default()),
            Err(ValidationError::MissingSalesperson)
        );
    }

    #[test]
    fn test_falls_back_to_first_seed() {
        let cli = Cli::parse_from(["sales-report", "show"]);
        assert_eq!(pick_salesperson(&cli, &AppConfig::default()).unwrap(), "Sales Representative");
    }
}

//! spendlog main entry point

use anyhow::bail;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use spendlog_config::{Config, ConfigError, TimeRange};
use spendlog_core::{
    category_breakdown, monthly_summaries, parse_amount, parse_date, payment_mode_breakdown,
    render, Breakdown, CoreError, FileStorage, FilterSpec, NewExpense, RecordStore,
    RecordValidator, TimeContext,
};
use spendlog_utils::format_currency;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "spendlog")]
#[command(version = "0.1.0")]
#[command(about = "Log personal expenses and see where the money went", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense
    Add {
        /// Amount spent, e.g. 120.50
        #[arg(short, long)]
        amount: String,
        /// Payment mode, e.g. cash
        #[arg(short, long)]
        payment_mode: String,
        /// Category, e.g. food
        #[arg(short = 'k', long)]
        category: String,
        /// Date of the expense (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Optional note
        #[arg(short, long, default_value = "")]
        remarks: String,
    },
    /// List expenses, newest first, with totals
    List(FilterArgs),
    /// Spending by category, payment mode and month
    Summary(FilterArgs),
    /// Erase every stored expense
    Clear {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Only this payment mode
    #[arg(short, long)]
    payment_mode: Option<String>,
    /// Only this category
    #[arg(short = 'k', long)]
    category: Option<String>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "range")]
    from: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "range")]
    to: Option<String>,
    /// Named range: month, quarter, year, all
    #[arg(long)]
    range: Option<TimeRange>,
}

fn main() {
    let args = Args::parse();
    let loaded = Config::load(&args.config);

    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args, loaded) {
        eprintln!("{}", describe_failure(&e));
        std::process::exit(1);
    }
}

/// Severity-tagged message for a failed command
fn describe_failure(e: &anyhow::Error) -> String {
    if let Some(core) = e.downcast_ref::<CoreError>() {
        format!("{}: {}", core.severity(), core.to_details())
    } else if let Some(config) = e.downcast_ref::<ConfigError>() {
        format!("{}: {}", config.severity(), config.to_details())
    } else {
        format!("error: {:#}", e)
    }
}

fn run(args: Args, loaded: Result<Config, ConfigError>) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    match args.command {
        Command::InitConfig { force } => {
            Config::write_default(&args.config, force)?;
            println!("Wrote default configuration to {}", args.config.display());
        }
        Command::Add { amount, payment_mode, category, date, remarks } => {
            let config = resolve_config(loaded, &args.config)?;
            let mut store = open_store(&config);

            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let draft = NewExpense::new(amount, payment_mode, category, date).with_remarks(remarks);

            // A persistence failure surfaces through CoreError::to_details in main
            let record = store.add(draft, Utc::now())?;
            println!(
                "Expense added successfully! {} {} on {} ({} expenses stored)",
                format_currency(record.amount, &config.currency),
                record.category,
                record.date,
                store.len()
            );
        }
        Command::List(filter) => {
            let config = resolve_config(loaded, &args.config)?;
            let store = open_store(&config);

            let (spec, context) = build_filter(&filter, config.time_range.default_range, today)?;
            let result = render(store.all(), &spec, today);

            if result.view.is_empty() {
                println!("No transactions found");
            }
            for record in &result.view {
                println!(
                    "{}  {:<14} {:<11} {:>14}  {}",
                    record.date,
                    record.category,
                    record.payment_mode,
                    format_currency(record.amount, &config.currency),
                    record.remarks
                );
            }
            println!();
            println!("{} ({} expenses)", context.description(), result.view.len());
            println!("Total spent: {}", format_currency(result.total, &config.currency));
            println!("This month:  {}", format_currency(result.month_total, &config.currency));
        }
        Command::Summary(filter) => {
            let config = resolve_config(loaded, &args.config)?;
            let store = open_store(&config);

            let (spec, context) = build_filter(&filter, config.time_range.default_range, today)?;
            let filtered = spendlog_core::filter(store.all(), &spec);

            println!("{}", context.description());
            print_breakdown("By category", &category_breakdown(&filtered), &config);
            print_breakdown("By payment mode", &payment_mode_breakdown(&filtered), &config);

            println!("\nBy month");
            for month in monthly_summaries(&filtered) {
                println!(
                    "  {}  {:>14}  {:>4} expenses",
                    month.month,
                    format_currency(month.total, &config.currency),
                    month.count
                );
            }
        }
        Command::Clear { yes } => {
            let config = resolve_config(loaded, &args.config)?;
            let mut store = open_store(&config);

            if !yes {
                bail!(
                    "Refusing to clear {} expenses without --yes. This cannot be undone.",
                    store.len()
                );
            }
            let count = store.len();
            store.reset()?;
            println!("Cleared {} expenses", count);
        }
    }

    Ok(())
}

/// Fall back to defaults when the config file does not exist
fn resolve_config(loaded: Result<Config, ConfigError>, path: &Path) -> Result<Config, ConfigError> {
    match loaded {
        Ok(config) => {
            log::debug!("Config loaded from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::FileNotFound { path }) => {
            log::warn!("Config file {} not found, using defaults", path);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn open_store(config: &Config) -> RecordStore<FileStorage> {
    RecordStore::open(FileStorage::new(config.storage.path.clone()), config.storage.key.clone())
        .with_validator(RecordValidator::from_config(&config.expenses))
}

/// Turn command-line filters into a filter spec and the range it covers
fn build_filter(
    args: &FilterArgs,
    default_range: TimeRange,
    today: NaiveDate,
) -> anyhow::Result<(FilterSpec, TimeContext)> {
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;

    let context = if from.is_some() || to.is_some() {
        TimeContext::custom(from, to)
    } else {
        TimeContext::new(args.range.unwrap_or(default_range))
    };

    let mut spec = FilterSpec::new().within(&context, today);
    if let Some(ref mode) = args.payment_mode {
        spec = spec.payment_mode(mode.as_str());
    }
    if let Some(ref category) = args.category {
        spec = spec.category(category.as_str());
    }

    Ok((spec, context))
}

fn print_breakdown(title: &str, entries: &[Breakdown], config: &Config) {
    println!("\n{}", title);
    for entry in entries {
        println!(
            "  {:<14} {:>14}  {:>6}%  {:>4} expenses",
            entry.label,
            format_currency(entry.amount, &config.currency),
            entry.percentage,
            entry.count
        );
    }
}

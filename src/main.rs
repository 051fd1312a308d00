//! Rentboard CLI
//!
//! Command-line interface for the rent dashboard:
//! - Render the dashboard
//! - Browse studios, the table view, rent records and payment history
//! - Record payments and send reminders
//! - Export a month as CSV

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentboard::config::{generate_default_config, Config, LoggingConfig, Resolved};
use rentboard::dashboard::{ChartRange, ChartSurface, Dashboard, DashboardOptions, TerminalCharts};
use rentboard::source::{load_with_fallback, ApiSource, LocalSource, RecordSource};
use rentboard::store::LocalStore;
use rentboard::{ApiClient, ClientConfig, Period, RentPayment};

#[derive(Parser)]
#[command(name = "rentboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rent-tracking dashboard for a spreadsheet-backed rent API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceChoice {
    /// API when configured and reachable, else the local store
    Auto,
    Api,
    Local,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dashboard
    Dashboard {
        /// Where to load records from
        #[arg(short, long, value_enum, default_value = "auto")]
        source: SourceChoice,
        /// Profit trend window (6m, 12m, all); default from config
        #[arg(short, long)]
        range: Option<String>,
        /// Filter the recent-activity table
        #[arg(long)]
        search: Option<String>,
        /// Skip the charts
        #[arg(long)]
        no_charts: bool,
    },

    /// List studios
    Studios,

    /// Show the raw table view
    Table,

    /// Rent records for a month
    RentRecords {
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
    },

    /// Record a rent payment
    Pay {
        /// Studio ID
        #[arg(short, long)]
        studio: String,
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
        /// Amount paid
        #[arg(short, long)]
        amount: f64,
        /// Maintenance fee
        #[arg(long, default_value = "0")]
        maintenance: f64,
        /// Payment date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Payment history of a studio
    History {
        /// Studio ID
        #[arg(short, long)]
        studio: String,
    },

    /// Export a month as CSV
    Export {
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send a rent reminder for one studio
    Remind {
        /// Studio ID
        #[arg(short, long)]
        studio: String,
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
    },

    /// Send rent reminders for a whole month
    RemindAll {
        #[arg(short, long)]
        month: u32,
        #[arg(short, long)]
        year: i32,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Resolved {
        config,
        source,
        skipped,
    } = Config::resolve(cli.config.as_deref())?;
    init_logging(&config.logging);

    for e in &skipped {
        tracing::warn!("Skipped config: {}", e);
    }
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    let json = match cli.format.as_str() {
        "json" => true,
        "table" => false,
        other => bail!("Invalid format: {}. Use: table, json", other),
    };

    let client = Arc::new(ApiClient::new(ClientConfig::from(&config.api))?);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Dashboard {
            source,
            range,
            search,
            no_charts,
        } => {
            let range: ChartRange = range
                .as_deref()
                .unwrap_or(config.dashboard.default_range.as_str())
                .parse()
                .map_err(anyhow::Error::msg)?;

            let local = LocalSource::new(LocalStore::new(config.dashboard.store_path()));
            let api = ApiSource::new(Arc::clone(&client), today);

            let snapshot = match source {
                SourceChoice::Local => local.load().await?,
                SourceChoice::Api => api.load().await?,
                SourceChoice::Auto => {
                    let primary = client.is_configured().then_some(&api as &dyn RecordSource);
                    load_with_fallback(primary, &local).await?
                }
            };

            let mut options = DashboardOptions::from(&config.dashboard);
            options.sheet_url = client.sheet_url().map(str::to_string);

            let dashboard = Dashboard::new(snapshot, options, today);
            let view = dashboard.view(range, search.as_deref());

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let charts = TerminalCharts::default();
                let surface = (!no_charts).then_some(&charts as &dyn ChartSurface);
                print!("{}", view.render_text(surface));
            }
        }

        Commands::Studios => {
            let rows = client.get_studios().await?;
            print_rows(&rows, json, "No studios yet.")?;
        }

        Commands::Table => {
            let rows = client.get_table().await?;
            print_rows(&rows, json, "Table is empty.")?;
        }

        Commands::RentRecords { month, year } => {
            let period = Period::new(month, year)?;
            let rows = client.get_rent_records(period).await?;
            print_rows(&rows, json, &format!("No rent records for {}.", period.label()))?;
        }

        Commands::Pay {
            studio,
            month,
            year,
            amount,
            maintenance,
            date,
        } => {
            let payment_date = match date.as_deref() {
                None => today,
                Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid payment date: {}. Use YYYY-MM-DD", s))?,
            };

            let payment = RentPayment {
                studio_id: studio,
                period: Period::new(month, year)?,
                payment_date,
                amount,
                maintenance,
            };

            let payload = client.add_rent_payment(&payment).await?;
            print_ack(
                &payload,
                json,
                &format!(
                    "Recorded payment of {} for {} ({})",
                    amount,
                    payment.studio_id,
                    payment.period.label()
                ),
            )?;
        }

        Commands::History { studio } => {
            let rows = client.get_payment_history(&studio).await?;
            print_rows(&rows, json, &format!("No payments recorded for {}.", studio))?;
        }

        Commands::Export {
            month,
            year,
            output,
        } => {
            let period = Period::new(month, year)?;
            let data = client.export_csv(period).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported {} rows to {:?}", count_csv_rows(&data), path);
                }
                None => {
                    print!("{}", data);
                }
            }
        }

        Commands::Remind {
            studio,
            month,
            year,
        } => {
            let period = Period::new(month, year)?;
            let payload = client.send_reminder(&studio, period).await?;
            print_ack(
                &payload,
                json,
                &format!("Reminder sent for {} ({})", studio, period.label()),
            )?;
        }

        Commands::RemindAll { month, year } => {
            let period = Period::new(month, year)?;
            let payload = client.send_bulk_reminder(period).await?;
            print_ack(
                &payload,
                json,
                &format!("Reminders sent for {}", period.label()),
            )?;
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rentboard={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Column names in order of first appearance
fn columns(rows: &[Value]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for key in row.keys() {
            if !cols.contains(key) {
                cols.push(key.clone());
            }
        }
    }
    cols
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn print_rows(rows: &[Value], json: bool, empty: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", empty);
        return Ok(());
    }

    let cols = columns(rows);
    if cols.is_empty() {
        for row in rows {
            println!("{}", row);
        }
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| cols.iter().map(|c| cell(row.get(c))).collect())
        .collect();

    let widths: Vec<usize> = cols
        .iter()
        .enumerate()
        .map(|(i, c)| {
            table
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = cols
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = w))
        .collect();
    println!("{}", header.join(" | "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));

    for row in &table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = w))
            .collect();
        println!("{}", line.join(" | "));
    }

    println!();
    println!("{} rows", rows.len());
    Ok(())
}

fn print_ack(payload: &Value, json: bool, fallback: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(payload)?);
    } else {
        match payload.get("message").and_then(Value::as_str) {
            Some(message) => println!("{}", message),
            None => println!("{}", fallback),
        }
    }
    Ok(())
}

fn count_csv_rows(data: &str) -> usize {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes())
        .records()
        .filter(|r| r.is_ok())
        .count()
}

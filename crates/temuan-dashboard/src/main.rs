//! Findings monitoring dashboard CLI
//!
//! Fetches the findings sheet once and renders the summary tables, the
//! filtered detail table, or the CSV export.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use temuan_dashboard::config::{Config, FileConfig};
use temuan_dashboard::{constants, render};
use temuan_dashboard::{Dashboard, Field, FilterField, LoadStatus};

#[derive(Parser, Debug)]
#[command(name = "temuan-dashboard")]
#[command(about = "Monitoring dashboard for significant findings (temuan)")]
struct Args {
    /// Config file (optional; defaults apply when missing)
    #[arg(short, long, default_value = constants::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Sheet gviz export URL (overrides the config file)
    #[arg(long, global = true)]
    sheet_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Yearly loss and status tables plus the status distribution (default)
    Summary,

    /// Detail table with sorting, filtering, and paging
    Detail {
        /// Click a column header; repeat to toggle direction
        /// (identifier, owner, unit, segment, period, problem_text,
        /// root_cause_text, action_text, loss_amount, recovery_amount, status)
        #[arg(long = "sort", value_name = "FIELD")]
        sort: Vec<Field>,

        /// Only findings owned by this person (PIC)
        #[arg(long)]
        owner: Option<String>,

        /// Only findings of this unit
        #[arg(long)]
        unit: Option<String>,

        /// Only findings of this segment
        #[arg(long)]
        segment: Option<String>,

        /// Only findings with this status
        #[arg(long)]
        status: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// List the values available for each filter
    Filters,

    /// Export every finding to CSV
    Export {
        /// Output path (default from config, "temuan.csv")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "temuan_dashboard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file_config = FileConfig::load_or_default(&args.config)?;
    let config = Config::from_file(&file_config, args.sheet_url)?;

    tracing::info!("fetching findings sheet");
    let mut dashboard = Dashboard::load(&config).await;

    match args.command.unwrap_or(Command::Summary) {
        Command::Summary => {
            render::print_header(&dashboard);
            render::print_financial_table(&dashboard.financial_rollup());
            render::print_status_table(&dashboard.status_rollup());
            render::print_distribution(&dashboard.status_distribution());
            Ok(())
        }

        Command::Detail {
            sort,
            owner,
            unit,
            segment,
            status,
            page,
        } => {
            for field in sort {
                dashboard.sort_by(field);
            }
            dashboard.set_filter(FilterField::Owner, owner);
            dashboard.set_filter(FilterField::Unit, unit);
            dashboard.set_filter(FilterField::Segment, segment);
            dashboard.set_filter(FilterField::Status, status);
            dashboard.set_page(page);

            render::print_header(&dashboard);
            render::print_detail(&dashboard.visible_page(), dashboard.view());
            Ok(())
        }

        Command::Filters => {
            render::print_header(&dashboard);
            render::print_filter_choices(&dashboard);
            Ok(())
        }

        Command::Export { output } => {
            if let LoadStatus::Failed(reason) = dashboard.status() {
                anyhow::bail!("Not exporting: findings could not be loaded ({})", reason);
            }

            let path = output.unwrap_or_else(|| config.export_path.clone());
            dashboard.export_csv(&path)?;
            println!(
                "  Generated: {} ({} record(s))",
                path.display(),
                dashboard.records().len()
            );
            Ok(())
        }
    }
}

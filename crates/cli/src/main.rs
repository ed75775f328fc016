use clap::{Parser, Subcommand};
use ferrous_shield_domain::{CliOverrides, WildcardMode};
use tracing::info;

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "ferrous-shield")]
#[command(version)]
#[command(about = "Ferrous Shield - DNS filtering decision engine")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Wildcard mode: 0 = subdomains only, 1 = include root, 2 = smart
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=2))]
    wildcard_mode: Option<i64>,

    /// Response cache capacity
    #[arg(long)]
    cache_max_entries: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the background maintenance jobs until interrupted
    Run,

    /// Print the verdict for one or more domains
    Check {
        #[arg(required = true)]
        domains: Vec<String>,

        /// Emit one JSON document per domain
        #[arg(long)]
        json: bool,

        /// Also list the N most queried domains of this run
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Print every candidate rule for a domain in precedence order
    Explain { domain: String },

    /// Change the wildcard policy and write it back to the config file
    SetWildcardMode {
        #[arg(value_parser = clap::value_parser!(i64).range(0..=2))]
        mode: i64,

        /// Let explicit allow rules suppress root coverage (unchanged if omitted)
        #[arg(long, action = clap::ArgAction::Set)]
        respect_allowlist: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        wildcard_mode: cli
            .wildcard_mode
            .map(WildcardMode::try_from)
            .transpose()
            .map_err(anyhow::Error::msg)?,
        cache_max_entries: cli.cache_max_entries,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Shield v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config)?;
    let use_cases = di::UseCases::new(&services, bootstrap::config_path(cli.config.as_deref()));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::run(&config, &use_cases).await?,
        Command::Check { domains, json, top } => {
            commands::check(&use_cases, &domains, json, top)?
        }
        Command::Explain { domain } => commands::explain(&use_cases, &domain)?,
        Command::SetWildcardMode {
            mode,
            respect_allowlist,
        } => commands::set_wildcard_mode(
            &use_cases,
            services.policy.snapshot(),
            mode,
            respect_allowlist,
        )?,
    }

    Ok(())
}

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::catalog::CatalogSubcommand;
use errmap_core::policy::HIDE_DETAILS_ENV;
use errmap_core::{PolicyError, ResolverPolicy};

#[derive(Parser)]
#[command(
    name = "errmap",
    about = "Error code catalog: serve the demo API and inspect how errors map to responses",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "ERRMAP_PORT", default_value = "8080")]
        port: u16,

        /// Omit the error chain from error responses (1/0, true/false, yes/no, on/off)
        #[arg(
            long = "hide-details",
            env = HIDE_DETAILS_ENV,
            default_value = "true",
            action = clap::ArgAction::Set,
            value_parser = parse_policy
        )]
        policy: ResolverPolicy,

        /// Deadline for a single store operation, in milliseconds
        #[arg(long, env = "ERRMAP_OP_TIMEOUT_MS", default_value = "5000")]
        op_timeout_ms: u64,
    },

    /// Inspect the error catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Show one error code
    Explain { code: String },
}

fn parse_policy(raw: &str) -> Result<ResolverPolicy, PolicyError> {
    ResolverPolicy::from_env_value(Some(raw))
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve {
            port,
            policy,
            op_timeout_ms,
        } => cmd::serve::run(port, policy, op_timeout_ms),
        Commands::Catalog { subcommand } => cmd::catalog::run(subcommand, cli.json),
        Commands::Explain { code } => cmd::explain::run(&code, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

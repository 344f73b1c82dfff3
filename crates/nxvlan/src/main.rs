mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose, cli.global.quiet);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (verbosity, quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    // Shell completions never read the config file
    if let Command::Completions(args) = command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "nxvlan", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config()?;
    global.apply_defaults(&cfg.defaults)?;

    match command {
        // Config commands don't need a switch
        Command::Config(args) => commands::config_cmd::handle(args, &global, cfg),

        // All other commands talk to the switch
        cmd => {
            let device = config::resolve_device_config(&global, &cfg)?;
            tracing::debug!(endpoint = %device.endpoint, command = ?cmd, "dispatching command");
            commands::dispatch(cmd, device, &global).await
        }
    }
}

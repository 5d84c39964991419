mod cli;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    configure_logging(args.verbose, args.quiet);
    cli::output::set_quiet(args.quiet);
    cli::context::init(args.config.as_deref());

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(),
        Commands::Comment { action } => cli::commands::comment::execute(action),
        Commands::Run { name, args } => cli::commands::run::execute(name, args),
        Commands::Actions => cli::commands::actions::execute(),
        Commands::Log {
            operation,
            since,
            last,
        } => cli::commands::log::execute(operation.as_deref(), since.as_deref(), *last),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Send diagnostics to stderr. `RUST_LOG` takes precedence over the flags.
fn configure_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datalog={log_level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

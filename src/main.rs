use clap::Parser;
use filevault::cli::{error_message, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => filevault::cli::commands::init::execute(&cli),
        Commands::Store { ref path } => filevault::cli::commands::store::execute(&cli, path),
        Commands::Retrieve { ref name, ref to } => {
            filevault::cli::commands::retrieve::execute(&cli, name, to.as_deref())
        }
        Commands::List { json } => filevault::cli::commands::list::execute(&cli, json),
    };

    if let Err(e) = result {
        filevault::cli::output::error(&error_message(&e));
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` overrides the `-v` count.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use users_contract::cli::{self, CliConfig, EXIT_CONFIG, EXIT_FAILED};
use users_contract::{SuiteConfig, UsersClient, run_suite};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliConfig::parse();

    let client = match SuiteConfig::from_env().and_then(|config| UsersClient::new(&config)) {
        Ok(client) => client,
        Err(err) => {
            error!("{err}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    info!(url = %client.users_url(), "running users contract");
    let report = run_suite(&client).await;

    match cli::render(&report, args.format) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            error!("{err}");
            return ExitCode::from(EXIT_FAILED);
        }
    }

    if let Some(path) = &args.report {
        if let Err(err) = cli::write_report(&report, path) {
            error!("{err}");
            return ExitCode::from(EXIT_FAILED);
        }
    }

    ExitCode::from(cli::exit_code(&report))
}

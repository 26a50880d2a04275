use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use profilegen::{Cli, ProfileGenError, ProfileGenerator};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            if let ProfileGenError::UnknownKeys(keys) = &e {
                for key in keys {
                    tracing::error!("  {key}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ProfileGenError> {
    let settings = cli.settings_builder().load()?;
    tracing::debug!(?settings, "resolved settings");

    let generator = ProfileGenerator::new(&settings);
    let result = generator.handle(&cli.into_action())?;
    println!("{result}");
    Ok(())
}

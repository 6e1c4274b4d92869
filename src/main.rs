use std::{path::PathBuf, process::ExitCode};

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match naf_calendar_lib::run(config_path.as_deref()) {
        Ok(summary) => {
            println!(
                "Wrote {} events to {}",
                summary.events,
                summary.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("naf-calendar: {err:#}");
            ExitCode::FAILURE
        }
    }
}

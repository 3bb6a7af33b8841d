use std::{
    fs::File,
    io::{IsTerminal, Read},
};

use anyhow::{Context, Result};
use toy_bank::bin_utils::{Service, ServiceError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input: Box<dyn Read> = match std::env::args().nth(1) {
        Some(filename) => Box::new(
            File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?,
        ),
        None => {
            if std::io::stdin().is_terminal() {
                eprintln!("Welcome to the Bank System! Type `help` to list commands.");
            }
            Box::new(std::io::stdin())
        }
    };

    let service = Service {
        input,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| match err {
            ServiceError::Parse(err) => eprintln!("Error at line {line}: {err}"),
            err => eprintln!("Error: {err}"),
        }),
    };
    service.run()
}

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, execute_command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute_command(&cli);
}

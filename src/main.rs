use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use anyhow::Result;

use timeweaver::presentation::cli::{Cli, Commands};
use timeweaver::presentation::cli::commands::{SampleCommand, SolveCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("timeweaver=debug,info")
    } else {
        EnvFilter::new("timeweaver=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Solve {
            input,
            output,
            format,
            time_limit,
        } => SolveCommand::execute(
            input,
            output,
            format.should_generate_json(),
            format.should_generate_csv(),
            format.should_generate_html(),
            *time_limit,
        )?,
        Commands::Sample { output } => SampleCommand::execute(output)?,
    }

    Ok(())
}

use clap::Parser;
use logit::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Log(args) => logit::cli::log::run(args),
        Commands::Start => logit::cli::start::run(),
        Commands::Open {
            target,
            task,
            alias,
            force,
        } => logit::cli::open::run(target, task, alias, force),
        Commands::Tasks => logit::cli::tasks::run(),
        Commands::Worklogs {
            today,
            yesterday,
            week,
            days,
        } => logit::cli::worklogs::run(today, yesterday, week, days),
        Commands::Alias { action } => logit::cli::alias::run(action),
        Commands::Config { action } => logit::cli::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

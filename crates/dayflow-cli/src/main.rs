use clap::{Parser, Subcommand};
use dayflow_core::Config;
use tracing_subscriber::EnvFilter;

mod bell;
mod commands;

#[derive(Parser)]
#[command(name = "dayflow", version, about = "Dayflow task tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log, list and delete tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Streak, rolling average and heatmap
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Main goal for the day
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Quick-add task templates
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Session windows and daily targets
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Raw stored state
    State {
        #[command(subcommand)]
        action: commands::state::StateAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&Config::load_or_default());

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Template { action } => commands::template::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::State { action } => commands::state::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

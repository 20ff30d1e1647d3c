use clap::Parser;
use kanban::cli::commands::Cli;
use kanban::cli::handlers;
use kanban::io::{config_dir, logging, state};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init_file(&config_dir().join("kanban.log"));
            if let Err(e) = run_tui(&cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_stderr();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = handlers::effective_config(cli)?;
    let api = handlers::connect(cli, &config)?;
    let start_path = cli.board.map(|id| format!("/{}", id));
    kanban::tui::run(api, &config, start_path, state::default_state_path())
}

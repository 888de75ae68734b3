use clap::Parser;
use qalist::cli::commands::{Cli, Commands};
use qalist::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let project_dir = cli.project_dir.clone();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => qalist::tui::run(project_dir.as_deref()),
        // Init is handled before workspace discovery
        Some(Commands::Init(args)) => handlers::cmd_init(args, project_dir.as_deref()),
        Some(_) => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

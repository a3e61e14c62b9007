use bughive::cli::commands;
use bughive::cli::{Cli, Commands};
use bughive::config::CliOverrides;
use bughive::logging::init_logging;
use bughive::{BugHiveError, StructuredError};
use clap::Parser;
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let overrides = CliOverrides {
        db_path: cli.db.clone(),
        current_user_id: cli.user,
        lock_timeout_ms: cli.lock_timeout,
    };

    let use_color =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(force, cli.json),
        Commands::Create(args) => commands::create::execute(&args, cli.json, &overrides),
        Commands::List(args) => commands::list::execute(&args, cli.json, use_color, &overrides),
        Commands::Show { id } => commands::show::execute(id, cli.json, use_color, &overrides),
        Commands::Update(args) => commands::update::execute(&args, cli.json, &overrides),
        Commands::Users { command } => commands::users::execute(&command, cli.json, &overrides),
        Commands::Projects { command } => {
            commands::projects::execute(&command, cli.json, &overrides)
        }
        Commands::Filter { command } => commands::filter::execute(&command, cli.json, &overrides),
        Commands::Notify { command } => {
            commands::notify::execute(&command, cli.json, use_color, &overrides)
        }
        Commands::Import(args) => commands::import::execute(&args, cli.json, &overrides),
        Commands::Version => commands::version::execute(cli.json),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to
/// stderr. Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &BugHiveError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

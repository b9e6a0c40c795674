use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use schemi::cli::commands::clone::{CloneCommand, CloneCommandHandler};
use schemi::cli::commands::init::{InitCommand, InitCommandHandler};
use schemi::cli::commands::migrate::{MigrateCommand, MigrateCommandHandler};
use schemi::cli::commands::revision::{RevisionCommand, RevisionCommandHandler};
use schemi::cli::{Cli, Commands};
use std::process;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    schemi::logging::init(cli.verbose);

    // 非同期ランタイムを作成して実行
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} Failed to create Tokio runtime: {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    }
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    let settings_path = cli.settings_path;
    let format = cli.format;

    match cli.command {
        Commands::Init {
            project_name,
            output,
            connections,
            environments,
            force,
        } => {
            let handler = InitCommandHandler::new();
            let command = InitCommand {
                settings_path,
                project_name,
                output_dir: output,
                connections,
                environments,
                force,
                format,
            };
            handler.execute(&command)
        }

        Commands::Revision {
            project_name,
            message,
            no_autogenerate,
            env,
        } => {
            let handler = RevisionCommandHandler::new();
            let command = RevisionCommand {
                settings_path,
                project_name,
                message,
                autogenerate: !no_autogenerate,
                env,
                format,
            };
            handler.execute(&command)
        }

        Commands::Migrate {
            target,
            dry_run,
            revision,
        } => {
            let handler = MigrateCommandHandler::new();
            let command = MigrateCommand {
                settings_path,
                target,
                dry_run,
                revision,
                format,
            };
            handler.execute(&command)
        }

        Commands::Clone {
            source,
            target,
            dry_run,
        } => {
            let handler = CloneCommandHandler::new();
            let command = CloneCommand {
                settings_path,
                source,
                target,
                dry_run,
                format,
            };
            handler.execute(&command).await
        }
    }
}

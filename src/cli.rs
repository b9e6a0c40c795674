// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::naming;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Schemi - database schema and migration management
///
/// Scaffolds Alembic migration projects for SQLModel/SQLAlchemy applications
/// and keeps one connection string per named environment.
#[derive(Parser, Debug)]
#[command(name = "schemi")]
#[command(author = "Schemi Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A command line tool for managing database schemas and migrations")]
#[command(long_about = "Schemi - A command line tool for managing database schemas and migrations

Schemi generates the migration folder for a project (alembic.ini, env.py,
script.py.mako and versions/) and records one database connection string
per environment (local, lab, prod, ...) in a YAML settings file.

Supported databases: PostgreSQL, SQLite")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a project:       schemi init news -o ./apps -c postgres://app@localhost/news --env local
  2. Define your models:         Edit ./apps/news/models.py
  3. Create a revision:          schemi revision news -m \"create tables\"
  4. Apply migrations:           schemi migrate news.local

For detailed help on each command, use: schemi <command> --help")]
pub struct Cli {
    /// Path to settings file (overrides SCHEMI_SETTINGS_PATH env var)
    #[arg(
        short = 's',
        long,
        global = true,
        value_name = "FILE",
        env = naming::SETTINGS_PATH_ENV
    )]
    pub settings_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize migration folder for a project
    ///
    /// Creates <output>/<project_name>/migrations with alembic.ini, env.py,
    /// script.py.mako and a versions/ directory, and records the project and
    /// its environments in the settings file.
    ///
    /// EXAMPLES:
    ///   # Project without environments (in-memory SQLite as default URL)
    ///   schemi init news
    ///
    ///   # One environment per connection string
    ///   schemi init news -o ./apps -c sqlite:///local.db --env local -c postgres://app@lab-db/news --env lab
    ///
    ///   # Regenerate the migration files
    ///   schemi init news --force
    Init {
        /// Name of the project to initialize
        #[arg(value_name = "PROJECT_NAME")]
        project_name: String,

        /// Output directory for project files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Database connection string (repeat for several environments)
        #[arg(short = 'c', long = "connection", value_name = "DSN")]
        connections: Vec<String>,

        /// Environment name for the matching --connection
        #[arg(long = "env", value_name = "ENV")]
        environments: Vec<String>,

        /// Overwrite existing migration files
        #[arg(short, long)]
        force: bool,
    },

    /// Create a new migration revision
    ///
    /// Runs `alembic revision` against the generated alembic.ini.
    ///
    /// EXAMPLES:
    ///   schemi revision news -m "add user table"
    ///   schemi revision news -m "empty revision" --no-autogenerate
    ///   schemi revision news -m "compare against lab" --env lab
    Revision {
        /// Name of the project to create revision for
        #[arg(value_name = "PROJECT_NAME")]
        project_name: String,

        /// Revision message
        #[arg(short, long, default_value = "Auto-generated revision")]
        message: String,

        /// Do not auto-generate the migration from model changes
        #[arg(long)]
        no_autogenerate: bool,

        /// Environment whose database is compared against the models
        #[arg(short, long, value_name = "ENV")]
        env: Option<String>,
    },

    /// Run database migrations
    ///
    /// EXAMPLES:
    ///   schemi migrate news.local
    ///   schemi migrate news.prod --revision ae1027a6acf
    ///   schemi migrate news.prod --dry-run
    Migrate {
        /// Target in format 'project.environment'
        #[arg(value_name = "TARGET")]
        target: String,

        /// Show what would be done without executing
        #[arg(long)]
        dry_run: bool,

        /// Target revision
        #[arg(long, value_name = "REVISION", default_value = "head")]
        revision: String,
    },

    /// Clone database from source to target (same database type only)
    ///
    /// EXAMPLES:
    ///   schemi clone news.prod news.local
    ///   schemi clone news.prod news.lab --dry-run
    Clone {
        /// Source database in format 'project.environment'
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Target database in format 'project.environment'
        #[arg(value_name = "TARGET")]
        target: String,

        /// Show what would be done without executing
        #[arg(long)]
        dry_run: bool,
    },
}

// migrateコマンドハンドラー
//
// `project.environment` を解決し、その環境の接続文字列で
// `alembic upgrade <revision>` を実行する。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::dsn::Dialect;
use crate::services::alembic_runner::{AlembicInvocation, AlembicRunner};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// migrateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MigrateCommand {
    pub settings_path: Option<PathBuf>,
    /// `project.environment`
    pub target: String,
    pub dry_run: bool,
    /// 適用先リビジョン（既定は head）
    pub revision: String,
    pub format: OutputFormat,
}

/// migrateコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct MigrateOutput {
    pub project: String,
    pub environment: String,
    pub database: String,
    pub dialect: Dialect,
    pub revision: String,
    pub dry_run: bool,
    pub command: String,
    /// Alembicの標準出力（dry-runでは空）
    pub alembic_output: String,
}

impl CommandOutput for MigrateOutput {
    fn to_text(&self) -> String {
        if self.dry_run {
            let mut text = format!(
                "[DRY RUN] Would migrate database '{}' ({}) to {}",
                self.database, self.dialect, self.revision
            )
            .yellow()
            .to_string();
            text.push('\n');
            text.push_str(&format!("Command: {}", self.command));
            return text;
        }

        let mut text = String::new();
        let alembic_output = self.alembic_output.trim();
        if !alembic_output.is_empty() {
            text.push_str(alembic_output);
            text.push('\n');
        }
        text.push_str(
            &format!(
                "Migrated database '{}' ({}) to {}",
                self.database, self.dialect, self.revision
            )
            .green()
            .to_string(),
        );
        text
    }
}

/// migrateコマンドハンドラー
#[derive(Debug)]
pub struct MigrateCommandHandler {
    runner: AlembicRunner,
}

impl MigrateCommandHandler {
    /// SCHEMI_ALEMBIC_BIN を考慮したハンドラーを作成
    pub fn new() -> Self {
        Self::with_runner(AlembicRunner::from_env())
    }

    pub fn with_runner(runner: AlembicRunner) -> Self {
        Self { runner }
    }

    /// migrateコマンドを実行
    pub fn execute(&self, command: &MigrateCommand) -> Result<String> {
        let context = CommandContext::load(command.settings_path.clone())?;
        let target = context.resolve_target(&command.target)?;
        context.require_migrations_dir(target.project)?;

        let dsn = target
            .environment
            .parsed_dsn()
            .with_context(|| format!("Invalid connection string for '{}'", command.target))?;

        let invocation = AlembicInvocation {
            config_file: target.project.config_file(),
            working_dir: target.project.project_dir(),
            args: vec!["upgrade".to_string(), command.revision.clone()],
            dsn: Some(dsn.sqlalchemy_url()),
        };

        let mut output = MigrateOutput {
            project: target.project_name.to_string(),
            environment: target.environment_name.to_string(),
            database: dsn.database().to_string(),
            dialect: dsn.dialect(),
            revision: command.revision.clone(),
            dry_run: command.dry_run,
            command: self.runner.command_line(&invocation),
            alembic_output: String::new(),
        };

        if !command.dry_run {
            let result = self
                .runner
                .run(&invocation)
                .with_context(|| format!("Failed to migrate '{}'", command.target))?;
            output.alembic_output = result.stdout;
            info!(
                target = %command.target,
                database = %dsn.redacted(),
                revision = %command.revision,
                "migration applied"
            );
        }

        render_output(&output, &command.format)
    }
}

impl Default for MigrateCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

// cloneコマンドハンドラー
//
// 2つの `project.environment` を解決し、同じ方言の場合のみ
// clone元のデータベースをclone先へ複製する。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::dsn::Dialect;
use crate::core::error::ValidationError;
use crate::services::database_cloner::{CloneEndpoint, DatabaseCloner};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// cloneコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct CloneCommand {
    pub settings_path: Option<PathBuf>,
    /// clone元 `project.environment`
    pub source: String,
    /// clone先 `project.environment`
    pub target: String,
    pub dry_run: bool,
    pub format: OutputFormat,
}

/// cloneコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct CloneOutput {
    pub source: String,
    pub target: String,
    pub source_database: String,
    pub target_database: String,
    pub dialect: Dialect,
    pub dry_run: bool,
}

impl CommandOutput for CloneOutput {
    fn to_text(&self) -> String {
        if self.dry_run {
            format!(
                "[DRY RUN] Would clone {} to {} ({})",
                self.source_database, self.target_database, self.dialect
            )
            .yellow()
            .to_string()
        } else {
            format!(
                "Cloned {} to {} ({})",
                self.source_database, self.target_database, self.dialect
            )
            .green()
            .to_string()
        }
    }
}

/// cloneコマンドハンドラー
#[derive(Debug, Default)]
pub struct CloneCommandHandler {}

impl CloneCommandHandler {
    pub fn new() -> Self {
        Self {}
    }

    /// cloneコマンドを実行
    pub async fn execute(&self, command: &CloneCommand) -> Result<String> {
        let context = CommandContext::load(command.settings_path.clone())?;
        let source = context.resolve_target(&command.source)?;
        let target = context.resolve_target(&command.target)?;

        let source_dsn = source
            .environment
            .parsed_dsn()
            .with_context(|| format!("Invalid connection string for '{}'", command.source))?;
        let target_dsn = target
            .environment
            .parsed_dsn()
            .with_context(|| format!("Invalid connection string for '{}'", command.target))?;

        if source_dsn.dialect() != target_dsn.dialect() {
            return Err(ValidationError::DialectMismatch {
                source_dialect: source_dsn.dialect().to_string(),
                target_dialect: target_dsn.dialect().to_string(),
            }
            .into());
        }

        let output = CloneOutput {
            source: command.source.clone(),
            target: command.target.clone(),
            source_database: source_dsn.database().to_string(),
            target_database: target_dsn.database().to_string(),
            dialect: source_dsn.dialect(),
            dry_run: command.dry_run,
        };

        if !command.dry_run {
            let source_dir = source.project.project_dir();
            let target_dir = target.project.project_dir();
            DatabaseCloner::clone_database(
                CloneEndpoint {
                    dsn: &source_dsn,
                    base_dir: &source_dir,
                },
                CloneEndpoint {
                    dsn: &target_dsn,
                    base_dir: &target_dir,
                },
            )
            .await
            .with_context(|| {
                format!("Failed to clone '{}' to '{}'", command.source, command.target)
            })?;

            info!(
                source = %source_dsn.redacted(),
                target = %target_dsn.redacted(),
                "database cloned"
            );
        }

        render_output(&output, &command.format)
    }
}

// revisionコマンドハンドラー
//
// 生成済みのalembic.iniを使って `alembic revision` を実行し、
// versions/ に新しく作られたリビジョンファイルを報告する。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::error::ValidationError;
use crate::services::alembic_runner::{AlembicInvocation, AlembicRunner};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// revisionコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct RevisionCommand {
    pub settings_path: Option<PathBuf>,
    pub project_name: String,
    /// リビジョンメッセージ
    pub message: String,
    /// モデルとの差分から自動生成するか
    pub autogenerate: bool,
    /// 比較対象の環境（Noneならalembic.iniのsqlalchemy.url）
    pub env: Option<String>,
    pub format: OutputFormat,
}

/// revisionコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct RevisionOutput {
    pub message: String,
    pub revision_file: Option<PathBuf>,
}

impl CommandOutput for RevisionOutput {
    fn to_text(&self) -> String {
        let mut text = format!("Created revision: {}", self.message)
            .green()
            .to_string();
        if let Some(file) = &self.revision_file {
            text.push('\n');
            text.push_str(
                &format!("Revision file: {}", file.display())
                    .blue()
                    .to_string(),
            );
        }
        text
    }
}

/// revisionコマンドハンドラー
#[derive(Debug)]
pub struct RevisionCommandHandler {
    runner: AlembicRunner,
}

impl RevisionCommandHandler {
    /// SCHEMI_ALEMBIC_BIN を考慮したハンドラーを作成
    pub fn new() -> Self {
        Self::with_runner(AlembicRunner::from_env())
    }

    pub fn with_runner(runner: AlembicRunner) -> Self {
        Self { runner }
    }

    /// revisionコマンドを実行
    pub fn execute(&self, command: &RevisionCommand) -> Result<String> {
        let context = CommandContext::load(command.settings_path.clone())?;
        let project = context.project(&command.project_name)?;
        context.require_migrations_dir(project)?;

        let dsn = match &command.env {
            Some(env_name) => {
                let environment = project.environments.get(env_name).ok_or_else(|| {
                    ValidationError::EnvironmentNotFound {
                        project: command.project_name.clone(),
                        environment: env_name.clone(),
                    }
                })?;
                Some(environment.parsed_dsn()?.sqlalchemy_url())
            }
            None => None,
        };

        let mut args = vec!["revision".to_string()];
        if command.autogenerate {
            args.push("--autogenerate".to_string());
        }
        args.push("-m".to_string());
        args.push(command.message.clone());

        let before = list_revision_files(&project.version_locations)?;

        let invocation = AlembicInvocation {
            config_file: project.config_file(),
            working_dir: project.project_dir(),
            args,
            dsn,
        };
        self.runner
            .run(&invocation)
            .with_context(|| format!("Failed to create revision for '{}'", command.project_name))?;

        let revision_file = newest_new_file(&project.version_locations, &before)?;
        debug!(revision_file = ?revision_file, "revision created");

        let output = RevisionOutput {
            message: command.message.clone(),
            revision_file,
        };
        render_output(&output, &command.format)
    }
}

impl Default for RevisionCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// versions/ 直下の .py ファイル
fn list_revision_files(versions_dir: &Path) -> Result<HashSet<PathBuf>> {
    if !versions_dir.is_dir() {
        return Ok(HashSet::new());
    }
    let mut files = HashSet::new();
    for entry in fs::read_dir(versions_dir)
        .with_context(|| format!("Failed to read versions directory: {}", versions_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "py") {
            files.insert(path);
        }
    }
    Ok(files)
}

/// 実行前にはなかったファイルのうち最も新しいもの
fn newest_new_file(versions_dir: &Path, before: &HashSet<PathBuf>) -> Result<Option<PathBuf>> {
    let after = list_revision_files(versions_dir)?;
    let newest = after
        .into_iter()
        .filter(|path| !before.contains(path))
        .max_by_key(|path| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        });
    Ok(newest)
}

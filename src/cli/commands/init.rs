// initコマンドハンドラー
//
// プロジェクトの初期化処理を実装します。
// - 接続文字列と環境名の検証（ファイルを書く前に行う）
// - ディレクトリ構造の作成（<output>/<project>/migrations/versions）
// - alembic.ini / env.py / script.py.mako の生成
// - 設定ファイルへのプロジェクトと環境の記録
// - 初期化済みプロジェクトの検出

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::dsn::Dsn;
use crate::core::error::ValidationError;
use crate::core::naming;
use crate::core::settings::{validate_name, ProjectConfig};
use crate::services::project_initializer::ProjectInitializer;
use crate::services::template_renderer::{RenderContext, TemplateRenderer};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// 設定ファイルのパス（Noneなら既定パス）
    pub settings_path: Option<PathBuf>,
    /// プロジェクト名
    pub project_name: String,
    /// 出力ディレクトリ（Noneならカレントディレクトリ）
    pub output_dir: Option<PathBuf>,
    /// 接続文字列（--connection の出現順）
    pub connections: Vec<String>,
    /// 環境名（--env の出現順）
    pub environments: Vec<String>,
    /// 既存のマイグレーションファイルを上書き
    pub force: bool,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// initコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct InitOutput {
    pub project: String,
    pub settings_path: PathBuf,
    pub migrations_dir: PathBuf,
    pub artifacts: Vec<PathBuf>,
    pub environments: Vec<String>,
    /// 設定ファイルにプロジェクトを新規追加したか
    pub config_created: bool,
}

impl CommandOutput for InitOutput {
    fn to_text(&self) -> String {
        let mut lines = Vec::new();
        if self.config_created {
            lines.push(format!("Config created in {}", self.settings_path.display()));
        } else {
            lines.push(format!("Config updated in {}", self.settings_path.display()));
        }
        lines.push(format!(
            "Migration folder initialized at {}",
            self.migrations_dir.display()
        ));
        if !self.environments.is_empty() {
            lines.push(format!("Environments: {}", self.environments.join(", ")));
        }
        lines.join("\n").green().to_string()
    }
}

/// initコマンドハンドラー
#[derive(Debug, Default)]
pub struct InitCommandHandler {}

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// initコマンドを実行
    ///
    /// 検証は全てディレクトリ作成より前に行う。書き込み途中で失敗した場合、
    /// 作成済みのファイルはそのまま残る。
    pub fn execute(&self, command: &InitCommand) -> Result<String> {
        validate_name("project", &command.project_name)?;
        let pairs = Self::pair_environments(&command.connections, &command.environments)?;

        let mut context = CommandContext::load(command.settings_path.clone())?;
        let output_dir = self.resolve_output_dir(command.output_dir.as_deref())?;

        let existing = context.settings.projects.get(&command.project_name);
        let config_created = existing.is_none();
        let mut project = match existing {
            Some(existing) if !command.force => {
                let derived = ProjectConfig::for_output(&output_dir, &command.project_name);
                if command.output_dir.is_some()
                    && derived.script_location != existing.script_location
                {
                    warn!(
                        project = %command.project_name,
                        recorded = %existing.script_location.display(),
                        "project already recorded; keeping its paths (use --force to move it)"
                    );
                }
                existing.clone()
            }
            Some(existing) => {
                // --force: パスは作り直し、記録済みの環境は同名のものだけ置き換える
                let mut fresh = ProjectConfig::for_output(&output_dir, &command.project_name);
                fresh.environments = existing.environments.clone();
                for (env_name, _) in &pairs {
                    fresh.environments.remove(env_name);
                }
                fresh
            }
            None => ProjectConfig::for_output(&output_dir, &command.project_name),
        };

        for (env_name, dsn) in &pairs {
            project.add_environment(&command.project_name, env_name, dsn)?;
        }

        if ProjectInitializer::is_already_initialized(&project) && !command.force {
            return Err(anyhow!(
                "Migrations directory already exists at {}. Use --force to overwrite.",
                project.script_location.display()
            ));
        }

        ProjectInitializer::create_directory_structure(&project)?;

        let render_context = RenderContext {
            project_name: command.project_name.clone(),
            script_location: project.script_location.clone(),
            version_locations: project.version_locations.clone(),
            sqlalchemy_url: Self::default_database_url(&pairs, &project)?,
            models_path: project.module.clone(),
        };
        let renderer = TemplateRenderer::new()?;
        let artifacts = renderer
            .write_all(&render_context, &project.script_location)
            .with_context(|| "Failed to generate migration files")?;

        let output = InitOutput {
            project: command.project_name.clone(),
            settings_path: context.settings_path.clone(),
            migrations_dir: project.script_location.clone(),
            artifacts,
            environments: project.environments.keys().cloned().collect(),
            config_created,
        };

        context
            .settings
            .projects
            .insert(command.project_name.clone(), project);
        context.save()?;

        info!(
            project = %output.project,
            migrations_dir = %output.migrations_dir.display(),
            environments = output.environments.len(),
            "project initialized"
        );

        render_output(&output, &command.format)
    }

    /// 接続文字列と環境名を対応付けて検証する
    ///
    /// 接続文字列が1つで環境名がない場合は `local` とする。
    pub fn pair_environments(
        connections: &[String],
        environments: &[String],
    ) -> Result<Vec<(String, Dsn)>, ValidationError> {
        let names: Vec<String> = if connections.len() == 1 && environments.is_empty() {
            vec![naming::DEFAULT_ENVIRONMENT.to_string()]
        } else if connections.len() == environments.len() {
            environments.to_vec()
        } else {
            return Err(ValidationError::MismatchedEnvironments {
                dsns: connections.len(),
                envs: environments.len(),
            });
        };

        names
            .into_iter()
            .zip(connections)
            .map(|(name, raw)| {
                validate_name("environment", &name)?;
                Ok((name, Dsn::parse(raw)?))
            })
            .collect()
    }

    /// alembic.ini の sqlalchemy.url
    ///
    /// 今回指定された最初の環境、なければ記録済みの最初の環境、
    /// それもなければインメモリSQLite。
    fn default_database_url(pairs: &[(String, Dsn)], project: &ProjectConfig) -> Result<String> {
        if let Some((_, dsn)) = pairs.first() {
            return Ok(dsn.sqlalchemy_url());
        }
        match project.environments.values().next() {
            Some(environment) => Ok(environment.parsed_dsn()?.sqlalchemy_url()),
            None => Ok(naming::FALLBACK_DATABASE_URL.to_string()),
        }
    }

    /// 出力先を絶対パスにする
    ///
    /// alembic.ini は `version_path_separator = os` なので、
    /// OSのパス区切り文字（POSIXでは `:`）を含むパスは受け付けない。
    fn resolve_output_dir(&self, output_dir: Option<&std::path::Path>) -> Result<PathBuf> {
        let base = match output_dir {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().with_context(|| "Failed to get current directory")?,
        };
        let absolute = std::path::absolute(&base)
            .with_context(|| format!("Failed to resolve output directory: {}", base.display()))?;

        let separator = if cfg!(windows) { ';' } else { ':' };
        if absolute.to_string_lossy().contains(separator) {
            return Err(ValidationError::PathSeparatorInPath {
                path: absolute.display().to_string(),
                separator,
            }
            .into());
        }
        Ok(absolute)
    }
}

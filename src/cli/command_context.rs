// コマンド共通コンテキスト
//
// 設定ファイルのパス解決と読み込み、保存をCLI層で集約する。

use crate::core::settings::{ProjectConfig, ResolvedTarget, Settings};
use crate::services::environment_writer::EnvironmentWriter;
use crate::services::settings_loader::SettingsLoader;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings_path: PathBuf,
    pub settings: Settings,
}

impl CommandContext {
    /// 設定ファイルを読み込んでコンテキストを作成
    ///
    /// パスの優先順位: 引数（--settings-path / SCHEMI_SETTINGS_PATH）→ 既定パス
    pub fn load(settings_path: Option<PathBuf>) -> Result<Self> {
        let settings_path = match settings_path {
            Some(path) => path,
            None => SettingsLoader::default_path()?,
        };
        debug!(path = %settings_path.display(), "loading settings");

        let settings = SettingsLoader::load_or_default(&settings_path)
            .with_context(|| "Failed to read settings file")?;

        Ok(Self {
            settings_path,
            settings,
        })
    }

    /// プロジェクト設定を取得
    pub fn project(&self, name: &str) -> Result<&ProjectConfig> {
        Ok(self.settings.project(name)?)
    }

    /// `project.environment` を解決
    pub fn resolve_target<'a>(&'a self, target: &'a str) -> Result<ResolvedTarget<'a>> {
        Ok(self.settings.resolve_target(target)?)
    }

    /// マイグレーションディレクトリが存在することを確認して返す
    pub fn require_migrations_dir<'a>(&self, project: &'a ProjectConfig) -> Result<&'a Path> {
        let path = project.script_location.as_path();
        if !path.is_dir() {
            return Err(anyhow::anyhow!(
                "Migrations directory not found at {}. Run 'schemi init' first.",
                path.display()
            ));
        }
        Ok(path)
    }

    /// 設定を保存
    pub fn save(&self) -> Result<()> {
        EnvironmentWriter::save(&self.settings, &self.settings_path)
            .with_context(|| "Failed to save settings file")
    }
}

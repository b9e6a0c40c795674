// 設定ファイル読み込みサービス
//
// core::settings の純粋性を保つため、ファイルI/Oはこのサービスに集約する。

use crate::core::error::{FileSystemError, SettingsError};
use crate::core::naming;
use crate::core::settings::Settings;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 設定ファイル読み込みサービス
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader;

impl SettingsLoader {
    /// YAMLファイルから設定を読み込む
    pub fn from_file(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path).map_err(|e| FileSystemError::FileRead {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        Self::from_yaml(&content, path)
    }

    /// 設定ファイルがなければ空の設定を返す
    pub fn load_or_default(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, starting empty");
            return Ok(Settings::default());
        }
        Self::from_file(path)
    }

    /// 既定の設定ファイルパス（`<config dir>/schemi/settings.yaml`）
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(config_dir.join(naming::APP_NAME).join(naming::SETTINGS_FILE))
    }

    fn from_yaml(content: &str, path: &Path) -> Result<Settings> {
        // 空ファイルは空の設定として扱う
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings = serde_saphyr::from_str(content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        Ok(settings)
    }
}

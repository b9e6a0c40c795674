// 環境設定書き出しサービス
//
// プロジェクトと環境ごとの接続文字列を設定ファイル（YAML）へ保存する。
// core::settings の純粋性を保つため、YAMLへの直列化とファイル書き込みはここに集約する。

use crate::core::error::{FileSystemError, SettingsError};
use crate::core::settings::Settings;
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 環境設定書き出しサービス
#[derive(Debug, Clone, Default)]
pub struct EnvironmentWriter;

impl EnvironmentWriter {
    /// SettingsをYAML文字列に変換
    pub fn to_yaml(settings: &Settings) -> Result<String, SettingsError> {
        serde_saphyr::to_string(settings).map_err(|e| SettingsError::Serialize {
            cause: e.to_string(),
        })
    }

    /// 設定ファイルに保存（親ディレクトリがなければ作成）
    pub fn save(settings: &Settings, path: &Path) -> Result<()> {
        let yaml = Self::to_yaml(settings)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FileSystemError::DirectoryCreate {
                path: parent.display().to_string(),
                cause: e.to_string(),
            })?;
        }

        fs::write(path, yaml).map_err(|e| FileSystemError::FileWrite {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;

        debug!(
            path = %path.display(),
            projects = settings.projects.len(),
            "saved settings"
        );
        Ok(())
    }
}

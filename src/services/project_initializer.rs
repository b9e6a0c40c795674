// プロジェクト初期化サービス
//
// <output>/<project>/migrations/versions のディレクトリ骨格を作成する。
// ディレクトリを作るべき場所に通常ファイルがある場合はPathCollisionとして扱う。

use crate::core::error::FileSystemError;
use crate::core::settings::ProjectConfig;
use std::fs;
use std::path::Path;
use tracing::debug;

/// プロジェクト初期化サービス
#[derive(Debug, Clone, Default)]
pub struct ProjectInitializer;

impl ProjectInitializer {
    /// マイグレーションディレクトリが既にあるか
    pub fn is_already_initialized(project: &ProjectConfig) -> bool {
        project.script_location.exists()
    }

    /// ディレクトリ構造を作成
    ///
    /// # Arguments
    ///
    /// * `project` - 作成するパスを持つプロジェクト設定
    pub fn create_directory_structure(project: &ProjectConfig) -> Result<(), FileSystemError> {
        let project_dir = project.project_dir();
        for dir in [
            project_dir.as_path(),
            project.script_location.as_path(),
            project.version_locations.as_path(),
        ] {
            Self::ensure_dir(dir)?;
        }
        Ok(())
    }

    fn ensure_dir(path: &Path) -> Result<(), FileSystemError> {
        // 既存の祖先のうち最も近いものがディレクトリでなければ作成できない
        if let Some(existing) = path.ancestors().find(|p| p.exists()) {
            if !existing.is_dir() {
                return Err(FileSystemError::PathCollision {
                    path: existing.display().to_string(),
                });
            }
        }

        fs::create_dir_all(path).map_err(|e| FileSystemError::DirectoryCreate {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        debug!(path = %path.display(), "ensured directory");
        Ok(())
    }
}

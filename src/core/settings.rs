// 設定モデル
//
// 設定ファイル（YAML形式）に保存されるプロジェクトと環境の定義、
// および `project.environment` 形式の対象指定の解決を行います。

use crate::core::dsn::{Dialect, Dsn};
use crate::core::error::ValidationError;
use crate::core::naming;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("name pattern is a valid regex")
});

/// プロジェクト名・環境名として使えるかを検証
pub fn validate_name(kind: &str, name: &str) -> Result<(), ValidationError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName {
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }
}

/// 設定ファイル全体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// プロジェクト名 → プロジェクト設定
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// プロジェクト設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// SQLModel定義を含むPythonモジュールのパス
    pub module: PathBuf,

    /// Alembicのスクリプトディレクトリ（migrations/）
    pub script_location: PathBuf,

    /// バージョンファイルのディレクトリ（migrations/versions/）
    pub version_locations: PathBuf,

    /// 環境名 → 環境設定
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// 環境別のデータベース設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// データベース方言
    pub dialect: Dialect,

    /// 接続文字列
    pub dsn: String,

    /// データベース名
    pub database: String,
}

impl EnvironmentConfig {
    pub fn from_dsn(dsn: &Dsn) -> Self {
        Self {
            dialect: dsn.dialect(),
            dsn: dsn.as_str().to_string(),
            database: dsn.database().to_string(),
        }
    }

    /// 保存されている接続文字列を再検証して返す
    pub fn parsed_dsn(&self) -> Result<Dsn, ValidationError> {
        Dsn::parse(&self.dsn)
    }
}

impl ProjectConfig {
    /// 出力ディレクトリとプロジェクト名からパスを導出して作成
    ///
    /// `<output>/<name>/models.py`、`<output>/<name>/migrations`、
    /// `<output>/<name>/migrations/versions` を使う。
    pub fn for_output(output_dir: &Path, project_name: &str) -> Self {
        let project_dir = output_dir.join(project_name);
        let script_location = project_dir.join(naming::MIGRATIONS_DIR);
        Self {
            module: project_dir.join(naming::MODELS_FILE),
            version_locations: script_location.join(naming::VERSIONS_DIR),
            script_location,
            environments: BTreeMap::new(),
        }
    }

    /// プロジェクトのルートディレクトリ（モデルモジュールの親）
    pub fn project_dir(&self) -> PathBuf {
        self.module
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// 生成したalembic.iniのパス
    pub fn config_file(&self) -> PathBuf {
        self.script_location
            .join(crate::core::artifact::Artifact::MasterConfig.file_name())
    }

    /// 環境を追加する（同名の環境があればエラー）
    pub fn add_environment(
        &mut self,
        project_name: &str,
        env_name: &str,
        dsn: &Dsn,
    ) -> Result<(), ValidationError> {
        if self.environments.contains_key(env_name) {
            return Err(ValidationError::DuplicateEnvironment {
                project: project_name.to_string(),
                name: env_name.to_string(),
            });
        }
        self.environments
            .insert(env_name.to_string(), EnvironmentConfig::from_dsn(dsn));
        Ok(())
    }
}

/// `project.environment` で解決された対象
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget<'a> {
    pub project_name: &'a str,
    pub environment_name: &'a str,
    pub project: &'a ProjectConfig,
    pub environment: &'a EnvironmentConfig,
}

impl Settings {
    /// プロジェクト設定を取得
    pub fn project(&self, name: &str) -> Result<&ProjectConfig, ValidationError> {
        self.projects
            .get(name)
            .ok_or_else(|| ValidationError::ProjectNotFound {
                name: name.to_string(),
            })
    }

    /// `project.environment` 形式の対象を解決
    pub fn resolve_target<'a>(
        &'a self,
        target: &'a str,
    ) -> Result<ResolvedTarget<'a>, ValidationError> {
        let (project_name, environment_name) = target
            .split_once('.')
            .filter(|(project, env)| !project.is_empty() && !env.is_empty())
            .ok_or_else(|| ValidationError::TargetFormat {
                target: target.to_string(),
            })?;

        let project = self.project(project_name)?;
        let environment = project.environments.get(environment_name).ok_or_else(|| {
            ValidationError::EnvironmentNotFound {
                project: project_name.to_string(),
                environment: environment_name.to_string(),
            }
        })?;

        Ok(ResolvedTarget {
            project_name,
            environment_name,
            project,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> Settings {
        let mut project = ProjectConfig::for_output(Path::new("/work"), "news");
        project
            .add_environment("news", "local", &Dsn::parse("sqlite:///local.db").unwrap())
            .unwrap();
        let mut settings = Settings::default();
        settings.projects.insert("news".to_string(), project);
        settings
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("project", "news_agg").is_ok());
        assert!(validate_name("environment", "prod-eu").is_ok());
        assert!(validate_name("project", "").is_err());
        assert!(validate_name("project", "a.b").is_err());
        assert!(validate_name("project", "../escape").is_err());
        assert!(validate_name("environment", "with space").is_err());
    }

    #[test]
    fn test_for_output_derives_paths() {
        let project = ProjectConfig::for_output(Path::new("/work"), "news");
        assert_eq!(project.module, Path::new("/work/news/models.py"));
        assert_eq!(project.script_location, Path::new("/work/news/migrations"));
        assert_eq!(
            project.version_locations,
            Path::new("/work/news/migrations/versions")
        );
        assert_eq!(project.project_dir(), Path::new("/work/news"));
        assert_eq!(
            project.config_file(),
            Path::new("/work/news/migrations/alembic.ini")
        );
    }

    #[test]
    fn test_add_environment_rejects_duplicate() {
        let mut project = ProjectConfig::for_output(Path::new("/work"), "news");
        let dsn = Dsn::parse("sqlite:///a.db").unwrap();
        project.add_environment("news", "local", &dsn).unwrap();
        let err = project.add_environment("news", "local", &dsn).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateEnvironment { .. }));
    }

    #[test]
    fn test_resolve_target() {
        let settings = sample_settings();
        let resolved = settings.resolve_target("news.local").unwrap();
        assert_eq!(resolved.project_name, "news");
        assert_eq!(resolved.environment_name, "local");
        assert_eq!(resolved.environment.database, "local");
    }

    #[test]
    fn test_resolve_target_errors() {
        let settings = sample_settings();
        assert!(matches!(
            settings.resolve_target("invalid_target"),
            Err(ValidationError::TargetFormat { .. })
        ));
        assert!(matches!(
            settings.resolve_target("news."),
            Err(ValidationError::TargetFormat { .. })
        ));
        assert!(matches!(
            settings.resolve_target("nonexistent.local"),
            Err(ValidationError::ProjectNotFound { .. })
        ));
        assert!(matches!(
            settings.resolve_target("news.prod"),
            Err(ValidationError::EnvironmentNotFound { .. })
        ));
    }
}

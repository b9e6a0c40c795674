// テンプレートレンダリングサービス
//
// alembic.ini / env.py / script.py.mako のテンプレートをバイナリに埋め込み、
// teraでプロジェクト固有の値を差し込んで書き出す。

use crate::core::artifact::Artifact;
use crate::core::error::FileSystemError;
use crate::core::naming;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Tera, Value};
use tracing::debug;

const MASTER_CONFIG_TEMPLATE: &str = include_str!("../../templates/alembic.ini.tera");
const ENVIRONMENT_SCRIPT_TEMPLATE: &str = include_str!("../../templates/env.py.tera");
const SCRIPT_TEMPLATE_TEMPLATE: &str = include_str!("../../templates/script.py.mako.tera");

fn template_source(artifact: Artifact) -> &'static str {
    match artifact {
        Artifact::MasterConfig => MASTER_CONFIG_TEMPLATE,
        Artifact::EnvironmentScript => ENVIRONMENT_SCRIPT_TEMPLATE,
        Artifact::ScriptTemplate => SCRIPT_TEMPLATE_TEMPLATE,
    }
}

/// テンプレートに差し込む値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub project_name: String,
    pub script_location: PathBuf,
    pub version_locations: PathBuf,
    pub sqlalchemy_url: String,
    pub models_path: PathBuf,
}

impl RenderContext {
    /// env.py で `from <module> import *` に使うモジュール名
    pub fn models_module(&self) -> String {
        self.models_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "models".to_string())
    }

    fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("project_name", &self.project_name);
        context.insert("script_location", &self.script_location.display().to_string());
        context.insert(
            "version_locations",
            &self.version_locations.display().to_string(),
        );
        context.insert("sqlalchemy_url", &self.sqlalchemy_url);
        context.insert("models_path", &self.models_path.display().to_string());
        context.insert("models_module", &self.models_module());
        context.insert("dsn_env", naming::CURRENT_DSN_ENV);
        context
    }
}

/// テンプレートレンダラー
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// 埋め込みテンプレートを読み込んだレンダラーを作成
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            Artifact::ALL
                .iter()
                .map(|artifact| (artifact.file_name(), template_source(*artifact))),
        )
        .with_context(|| "Failed to parse built-in templates")?;
        tera.register_filter("ini_escape", ini_escape);
        tera.register_filter("py_str", py_str);
        Ok(Self { tera })
    }

    /// 生成物を文字列にレンダリング
    pub fn render(&self, artifact: Artifact, context: &RenderContext) -> Result<String> {
        self.tera
            .render(artifact.file_name(), &context.to_tera())
            .with_context(|| format!("Failed to render {}", artifact))
    }

    /// 生成物をレンダリングして `target_dir` に書き出す（既存ファイルは上書き）
    pub fn write(
        &self,
        artifact: Artifact,
        context: &RenderContext,
        target_dir: &Path,
    ) -> Result<PathBuf> {
        let content = self.render(artifact, context)?;
        let path = target_dir.join(artifact.file_name());
        fs::write(&path, content).map_err(|e| FileSystemError::FileWrite {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        debug!(artifact = %artifact, path = %path.display(), "wrote artifact");
        Ok(path)
    }

    /// 全ての生成物を書き出す
    pub fn write_all(&self, context: &RenderContext, target_dir: &Path) -> Result<Vec<PathBuf>> {
        Artifact::ALL
            .iter()
            .map(|artifact| self.write(*artifact, context, target_dir))
            .collect()
    }
}

/// configparserの補間を避けるため `%` を `%%` にする
fn ini_escape(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("ini_escape expects a string"))?;
    Ok(Value::String(s.replace('%', "%%")))
}

/// Pythonの二重引用符文字列リテラル用にエスケープ
fn py_str(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("py_str expects a string"))?;
    Ok(Value::String(s.replace('\\', "\\\\").replace('"', "\\\"")))
}

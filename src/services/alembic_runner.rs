// Alembic実行サービス
//
// 生成したalembic.iniを `-c` で渡して外部コマンドとしてAlembicを起動する。
// 環境の接続文字列は SCHEMI_CURRENT_DSN 経由でenv.pyに渡す。

use crate::core::error::ToolError;
use crate::core::naming;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Alembic呼び出しの内容
#[derive(Debug, Clone)]
pub struct AlembicInvocation {
    /// alembic.iniのパス
    pub config_file: PathBuf,
    /// 実行ディレクトリ
    pub working_dir: PathBuf,
    /// サブコマンドと引数（例: `["upgrade", "head"]`）
    pub args: Vec<String>,
    /// env.pyに渡すSQLAlchemy URL
    pub dsn: Option<String>,
}

/// Alembicの出力
#[derive(Debug, Clone, Default)]
pub struct AlembicOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Alembic実行サービス
#[derive(Debug, Clone)]
pub struct AlembicRunner {
    program: PathBuf,
}

impl AlembicRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// SCHEMI_ALEMBIC_BIN があればそれを、なければ `alembic` を使う
    pub fn from_env() -> Self {
        let program = std::env::var_os(naming::ALEMBIC_BIN_ENV)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| OsString::from(naming::DEFAULT_ALEMBIC_BIN));
        Self::new(program)
    }

    /// 表示用のコマンドライン
    pub fn command_line(&self, invocation: &AlembicInvocation) -> String {
        let mut parts = vec![
            self.program.display().to_string(),
            "-c".to_string(),
            invocation.config_file.display().to_string(),
        ];
        parts.extend(invocation.args.iter().cloned());
        parts.join(" ")
    }

    /// Alembicを実行し、非ゼロ終了ならエラーにする
    pub fn run(&self, invocation: &AlembicInvocation) -> Result<AlembicOutput, ToolError> {
        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg(&invocation.config_file)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir);

        match &invocation.dsn {
            Some(dsn) => {
                command.env(naming::CURRENT_DSN_ENV, dsn);
            }
            None => {
                command.env_remove(naming::CURRENT_DSN_ENV);
            }
        }

        info!(command = %self.command_line(invocation), "running alembic");
        let output = command.output().map_err(|e| ToolError::Spawn {
            program: self.program.display().to_string(),
            cause: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!(status = %output.status, stdout = %stdout.trim(), "alembic finished");

        if !output.status.success() {
            return Err(ToolError::Failed {
                subcommand: invocation.args.first().cloned().unwrap_or_default(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(AlembicOutput { stdout, stderr })
    }
}

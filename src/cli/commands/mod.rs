// コマンドハンドラー層
// 各CLIコマンドの実装

pub mod clone;
pub mod init;
pub mod migrate;
pub mod revision;

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;

/// コマンド結果の出力
pub trait CommandOutput: Serialize {
    /// テキスト形式の出力
    fn to_text(&self) -> String;
}

/// 出力フォーマットに応じて結果を文字列化
pub fn render_output<T: CommandOutput>(output: &T, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output.to_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(output).with_context(|| "Failed to serialize output")
        }
    }
}

// ログ出力の初期化
//
// 標準出力はコマンド結果に使うため、ログは標準エラーへ出す。
// フィルタは SCHEMI_LOG（EnvFilter形式）、未設定なら warn。

use crate::core::naming;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// グローバルsubscriberを設定する
///
/// `verbose` が真なら SCHEMI_LOG より優先して debug にする。
/// 2回目以降の呼び出しは何もしない。
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(naming::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

// 命名ポリシー
//
// アプリケーション名、生成ファイル名、環境変数名の単一ソースを提供します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "schemi";

/// 既定の設定ファイル名
pub const SETTINGS_FILE: &str = "settings.yaml";

/// 設定ファイルパスを上書きする環境変数
pub const SETTINGS_PATH_ENV: &str = "SCHEMI_SETTINGS_PATH";

/// ログフィルタを指定する環境変数
pub const LOG_ENV: &str = "SCHEMI_LOG";

/// Alembic実行ファイルを上書きする環境変数
pub const ALEMBIC_BIN_ENV: &str = "SCHEMI_ALEMBIC_BIN";

/// 生成したenv.pyへ接続文字列を渡す環境変数
pub const CURRENT_DSN_ENV: &str = "SCHEMI_CURRENT_DSN";

/// 既定のAlembic実行ファイル
pub const DEFAULT_ALEMBIC_BIN: &str = "alembic";

/// マイグレーションディレクトリ名
pub const MIGRATIONS_DIR: &str = "migrations";

/// バージョンファイルディレクトリ名
pub const VERSIONS_DIR: &str = "versions";

/// モデル定義モジュールのファイル名
pub const MODELS_FILE: &str = "models.py";

/// 単一の接続文字列に環境名が指定されなかった場合の環境名
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// 環境が一つもない場合のsqlalchemy.url
pub const FALLBACK_DATABASE_URL: &str = "sqlite:///:memory:";

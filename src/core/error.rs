// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、FileSystemError, ValidationError, SettingsError,
// ToolError, CloneError を定義します。

use thiserror::Error;

/// ファイルシステムエラー
///
/// ディレクトリ作成やファイル書き込み時に発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum FileSystemError {
    /// Directory creation error
    #[error("Failed to create directory: {path} (cause: {cause})")]
    DirectoryCreate {
        /// ディレクトリパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// File write error
    #[error("Failed to write file: {path} (cause: {cause})")]
    FileWrite {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// File read error
    #[error("Failed to read file: {path} (cause: {cause})")]
    FileRead {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// ディレクトリを作るべき場所に別のファイルが存在する
    #[error("Path exists and is not a directory: {path}")]
    PathCollision {
        /// 衝突したパス
        path: String,
    },
}

impl FileSystemError {
    /// パス衝突エラーかどうか
    pub fn is_path_collision(&self) -> bool {
        matches!(self, FileSystemError::PathCollision { .. })
    }

    /// ディレクトリ作成エラーかどうか
    pub fn is_directory_create(&self) -> bool {
        matches!(self, FileSystemError::DirectoryCreate { .. })
    }
}

/// バリデーションエラー
///
/// 接続文字列やプロジェクト/環境名、コマンドの対象指定の検証で発生するエラーです。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// スキームがない
    #[error("Connection string '{dsn}' has no scheme (expected e.g. postgres://user:pw@host:5432/db)")]
    MissingScheme { dsn: String },

    /// URLとして解析できない
    #[error("Connection string '{dsn}' is malformed: {cause}")]
    MalformedDsn { dsn: String, cause: String },

    /// 未対応のスキーム
    #[error("Unsupported scheme '{scheme}'. Only sqlite and postgresql/postgres are supported.")]
    UnsupportedScheme { scheme: String },

    /// ホストが空
    #[error("Connection string '{dsn}' has an empty host")]
    EmptyHost { dsn: String },

    /// SQLiteのパスがない
    #[error("SQLite URI must include a path: '{dsn}'")]
    MissingPath { dsn: String },

    /// データベース名が不正
    #[error("Invalid database name '{name}': database name cannot contain spaces")]
    InvalidDatabaseName { name: String },

    /// プロジェクト名・環境名が不正
    #[error("Invalid {kind} name '{name}': use letters, digits, '_' or '-' (no '.')")]
    InvalidName { kind: String, name: String },

    /// 環境名の重複
    #[error("Environment '{name}' is defined more than once for project '{project}'")]
    DuplicateEnvironment { project: String, name: String },

    /// 接続文字列と環境名の数が一致しない
    #[error("Got {dsns} connection string(s) but {envs} environment name(s); pass one --env per --connection")]
    MismatchedEnvironments { dsns: usize, envs: usize },

    /// project.environment 形式でない
    #[error("Target must be in format 'project.environment' (got '{target}')")]
    TargetFormat { target: String },

    /// プロジェクトがない
    #[error("Project '{name}' not found in settings")]
    ProjectNotFound { name: String },

    /// 環境がない
    #[error("Environment '{environment}' not found in project '{project}'")]
    EnvironmentNotFound { project: String, environment: String },

    /// Alembicのパス区切り文字を含む出力先
    #[error("Output directory '{path}' contains '{separator}', which Alembic treats as a path separator in version_locations")]
    PathSeparatorInPath { path: String, separator: char },

    /// clone元と先の方言が違う
    #[error("Database types must match (source: {source_dialect}, target: {target_dialect})")]
    DialectMismatch {
        source_dialect: String,
        target_dialect: String,
    },
}

impl ValidationError {
    /// 接続文字列に起因するエラーかどうか
    pub fn is_dsn_error(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingScheme { .. }
                | ValidationError::MalformedDsn { .. }
                | ValidationError::UnsupportedScheme { .. }
                | ValidationError::EmptyHost { .. }
                | ValidationError::MissingPath { .. }
                | ValidationError::InvalidDatabaseName { .. }
        )
    }
}

/// 設定ファイルエラー
#[derive(Debug, Error)]
pub enum SettingsError {
    /// YAMLの解析に失敗
    #[error("Failed to parse settings file {path}: {cause}")]
    Parse { path: String, cause: String },

    /// YAMLへの直列化に失敗
    #[error("Failed to serialize settings: {cause}")]
    Serialize { cause: String },

    /// 設定ディレクトリを特定できない
    #[error("Could not determine the user config directory; pass --settings-path or set SCHEMI_SETTINGS_PATH")]
    NoConfigDir,
}

/// 外部ツール（Alembic）の実行エラー
#[derive(Debug, Error)]
pub enum ToolError {
    /// プロセスを起動できない
    #[error("Failed to run '{program}': {cause}")]
    Spawn { program: String, cause: String },

    /// 非ゼロで終了
    #[error("Alembic {subcommand} failed ({status}): {stderr}")]
    Failed {
        subcommand: String,
        status: String,
        stderr: String,
    },
}

/// データベースclone時のエラー
#[derive(Debug, Error)]
pub enum CloneError {
    /// clone元がない
    #[error("Source database does not exist: {path}")]
    SourceMissing { path: String },

    /// clone先が既に存在する
    #[error("Target database already exists: {path}")]
    TargetExists { path: String },

    /// PostgreSQLでホスト/ポートが異なる
    #[error("PostgreSQL clone requires source and target on the same server (source: {source_server}, target: {target_server})")]
    ServerMismatch {
        source_server: String,
        target_server: String,
    },

    /// 接続文字列がドライバーに受理されない
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// ドライバーエラー
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

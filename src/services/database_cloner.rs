// データベースcloneサービス
//
// 同じ方言の環境間でデータベースを複製する。
// - SQLite: `VACUUM INTO` でファイルを書き出す
// - PostgreSQL: 同一サーバー上で `CREATE DATABASE ... TEMPLATE ...`

use crate::core::dsn::{Dialect, Dsn};
use crate::core::error::CloneError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tracing::info;

/// clone元/先
#[derive(Debug, Clone, Copy)]
pub struct CloneEndpoint<'a> {
    /// 接続文字列
    pub dsn: &'a Dsn,
    /// 相対SQLiteパスの基準ディレクトリ（Alembicの実行ディレクトリと揃える）
    pub base_dir: &'a Path,
}

impl CloneEndpoint<'_> {
    /// SQLiteファイルの実パス
    pub fn sqlite_file(&self) -> Option<PathBuf> {
        self.dsn.sqlite_path().map(|path| {
            if path.is_absolute() {
                path
            } else {
                self.base_dir.join(path)
            }
        })
    }
}

/// データベースcloneサービス
#[derive(Debug, Clone, Default)]
pub struct DatabaseCloner;

impl DatabaseCloner {
    /// 方言に応じてcloneする（方言の一致は呼び出し側で検証済みであること）
    pub async fn clone_database(
        source: CloneEndpoint<'_>,
        target: CloneEndpoint<'_>,
    ) -> Result<(), CloneError> {
        match source.dsn.dialect() {
            Dialect::SQLite => {
                let (Some(source_file), Some(target_file)) =
                    (source.sqlite_file(), target.sqlite_file())
                else {
                    return Err(CloneError::SourceMissing {
                        path: source.dsn.redacted(),
                    });
                };
                Self::clone_sqlite(&source_file, &target_file).await
            }
            Dialect::PostgreSQL => Self::clone_postgres(source.dsn, target.dsn).await,
        }
    }

    /// SQLiteファイルを `VACUUM INTO` で複製
    pub async fn clone_sqlite(source: &Path, target: &Path) -> Result<(), CloneError> {
        if !source.is_file() {
            return Err(CloneError::SourceMissing {
                path: source.display().to_string(),
            });
        }
        if target.exists() {
            return Err(CloneError::TargetExists {
                path: target.display().to_string(),
            });
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(source)
            .connect()
            .await?;

        let sql = format!("VACUUM INTO {}", quote_literal(&target.display().to_string()));
        sqlx::raw_sql(&sql).execute(&mut conn).await?;
        conn.close().await?;

        info!(source = %source.display(), target = %target.display(), "cloned sqlite database");
        Ok(())
    }

    /// PostgreSQLのテンプレート機能で複製
    pub async fn clone_postgres(source: &Dsn, target: &Dsn) -> Result<(), CloneError> {
        let source_server = server_of(source);
        let target_server = server_of(target);
        if source_server != target_server {
            return Err(CloneError::ServerMismatch {
                source_server,
                target_server,
            });
        }

        // CREATE DATABASE は接続先以外のDBに対して実行する
        let mut conn = target
            .pg_connect_options()?
            .database("postgres")
            .connect()
            .await?;

        let sql = format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_ident(target.database()),
            quote_ident(source.database())
        );
        sqlx::raw_sql(&sql).execute(&mut conn).await?;
        conn.close().await?;

        info!(
            source = source.database(),
            target = target.database(),
            server = %target_server,
            "cloned postgres database"
        );
        Ok(())
    }
}

fn server_of(dsn: &Dsn) -> String {
    format!(
        "{}:{}",
        dsn.host().unwrap_or_default(),
        dsn.port().unwrap_or_default()
    )
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

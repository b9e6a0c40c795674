// 接続文字列（DSN）
//
// 接続文字列の解析と検証、SQLAlchemy形式への変換を行います。
// ファイルI/Oは行わず、PostgreSQLについてはsqlxの接続オプション解析で
// ドライバーが受理できる形式かを確認します。

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "sqlite")]
    SQLite,
    #[serde(rename = "postgres")]
    PostgreSQL,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::SQLite => write!(f, "sqlite"),
            Dialect::PostgreSQL => write!(f, "postgres"),
        }
    }
}

impl Dialect {
    /// URLスキームから方言を判定
    ///
    /// `postgresql+psycopg2` のようなSQLAlchemyのドライバー指定も受け付けます。
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        let base = scheme.split('+').next().unwrap_or(scheme);
        match base {
            "sqlite" => Some(Dialect::SQLite),
            "postgres" | "postgresql" => Some(Dialect::PostgreSQL),
            _ => None,
        }
    }

    /// Dialectに応じたデフォルトポートを返す
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Dialect::PostgreSQL => Some(5432),
            Dialect::SQLite => None,
        }
    }
}

/// 検証済みの接続文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    raw: String,
    dialect: Dialect,
    url: Url,
    database: String,
    sqlite_path: Option<String>,
}

impl Dsn {
    /// 接続文字列を解析して検証する
    ///
    /// エラーに含める接続文字列はパスワードを伏せたものにする。
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim().to_string();
        let url = Url::parse(&raw).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => ValidationError::MissingScheme {
                dsn: redact_raw(&raw),
            },
            url::ParseError::EmptyHost => ValidationError::EmptyHost {
                dsn: redact_raw(&raw),
            },
            other => ValidationError::MalformedDsn {
                dsn: redact_raw(&raw),
                cause: other.to_string(),
            },
        })?;

        let dialect = match Dialect::from_scheme(url.scheme()) {
            Some(dialect) => dialect,
            // localhost:5432/db のように `//` がなければスキームの書き忘れとみなす
            None if !url.has_authority() => {
                return Err(ValidationError::MissingScheme {
                    dsn: redact_raw(&raw),
                })
            }
            None => {
                return Err(ValidationError::UnsupportedScheme {
                    scheme: url.scheme().to_string(),
                })
            }
        };

        let shown = redact_url(&raw, &url);
        let (database, sqlite_path) = match dialect {
            Dialect::SQLite => {
                let path = sqlite_path_of(&shown, &url)?;
                let database = Path::new(&path)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.clone());
                (database, Some(path))
            }
            Dialect::PostgreSQL => (postgres_database_of(&shown, &url)?, None),
        };

        if database.contains(' ') {
            return Err(ValidationError::InvalidDatabaseName { name: database });
        }

        Ok(Self {
            raw,
            dialect,
            url,
            database,
            sqlite_path,
        })
    }

    /// ユーザーが指定したままの接続文字列
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// データベース名（SQLiteはファイル名の語幹）
    pub fn database(&self) -> &str {
        &self.database
    }

    /// ホスト名（SQLiteはNone）
    pub fn host(&self) -> Option<&str> {
        match self.dialect {
            Dialect::SQLite => None,
            Dialect::PostgreSQL => self.url.host_str(),
        }
    }

    /// ポート番号（未指定なら方言のデフォルト）
    pub fn port(&self) -> Option<u16> {
        self.url.port().or_else(|| self.dialect.default_port())
    }

    /// SQLiteデータベースファイルのパス
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        self.sqlite_path.as_ref().map(PathBuf::from)
    }

    /// SQLAlchemyが受理する形式のURL
    ///
    /// - `postgres://` は `postgresql://` に置き換える
    /// - SQLiteは `sqlite:///<path>` に正規化する（クエリは残す）
    pub fn sqlalchemy_url(&self) -> String {
        match self.dialect {
            Dialect::SQLite => {
                let path = self.sqlite_path.as_deref().unwrap_or_default();
                match self.url.query() {
                    Some(query) => format!("sqlite:///{}?{}", path, query),
                    None => format!("sqlite:///{}", path),
                }
            }
            Dialect::PostgreSQL => {
                let mut url = self.url.clone();
                if url.scheme() == "postgres" && url.set_scheme("postgresql").is_err() {
                    return self.raw.clone();
                }
                url.to_string()
            }
        }
    }

    /// パスワードを伏せた表示用文字列
    pub fn redacted(&self) -> String {
        redact_url(&self.raw, &self.url)
    }

    /// sqlxのPostgreSQL接続オプション
    pub fn pg_connect_options(&self) -> Result<PgConnectOptions, ValidationError> {
        driver_options(&self.redacted(), &self.url)
    }
}

impl std::fmt::Display for Dsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

/// 解析済みURLのパスワードを `***` に置き換える
fn redact_url(raw: &str, url: &Url) -> String {
    if url.password().is_none() {
        return raw.to_string();
    }
    let mut masked = url.clone();
    match masked.set_password(Some("***")) {
        Ok(()) => masked.to_string(),
        Err(()) => redact_raw(raw),
    }
}

/// URLとして解析できない文字列から `@` より前の認証情報を落とす
fn redact_raw(raw: &str) -> String {
    let Some(at) = raw.rfind('@') else {
        return raw.to_string();
    };
    match raw.find("://") {
        Some(sep) if sep < at => format!("{}://***@{}", &raw[..sep], &raw[at + 1..]),
        _ => format!("***@{}", &raw[at + 1..]),
    }
}

/// SQLiteのファイルパスを取り出す（`shown` はエラー表示用の伏せ字済み文字列）
///
/// SQLAlchemyの規約に従い、`sqlite:///app.db` は相対パス `app.db`、
/// `sqlite:////var/app.db` は絶対パス `/var/app.db` になる。
fn sqlite_path_of(shown: &str, url: &Url) -> Result<String, ValidationError> {
    if url.host_str().is_some_and(|host| !host.is_empty()) {
        // sqlite://app.db のようにパスがホスト部に入ってしまったケース
        return Err(ValidationError::MissingPath {
            dsn: shown.to_string(),
        });
    }

    let path = url.path();
    let path = if url.has_authority() {
        path.strip_prefix('/').unwrap_or(path)
    } else {
        path
    };

    let decoded = urlencoding::decode(path)
        .map_err(|e| ValidationError::MalformedDsn {
            dsn: shown.to_string(),
            cause: e.to_string(),
        })?
        .into_owned();

    if decoded.is_empty() {
        return Err(ValidationError::MissingPath {
            dsn: shown.to_string(),
        });
    }
    Ok(decoded)
}

/// PostgreSQLのデータベース名を取り出し、ドライバーでの解析を確認する
fn postgres_database_of(shown: &str, url: &Url) -> Result<String, ValidationError> {
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::EmptyHost {
            dsn: shown.to_string(),
        });
    }

    driver_options(shown, url)?;

    let path = url.path().trim_start_matches('/');
    let database = urlencoding::decode(path)
        .map_err(|e| ValidationError::MalformedDsn {
            dsn: shown.to_string(),
            cause: e.to_string(),
        })?
        .into_owned();

    if database.is_empty() {
        Ok("postgres".to_string())
    } else {
        Ok(database)
    }
}

/// sqlxが受理するスキームに揃えてから接続オプションを解析する
fn driver_options(shown: &str, url: &Url) -> Result<PgConnectOptions, ValidationError> {
    let mut driver_url = url.clone();
    if driver_url.scheme() != "postgres" && driver_url.set_scheme("postgres").is_err() {
        return Err(ValidationError::MalformedDsn {
            dsn: shown.to_string(),
            cause: format!("cannot normalize scheme '{}'", url.scheme()),
        });
    }

    PgConnectOptions::from_str(driver_url.as_str()).map_err(|e| {
        let cause = match url.password() {
            Some(password) => e.to_string().replace(password, "***"),
            None => e.to_string(),
        };
        ValidationError::MalformedDsn {
            dsn: shown.to_string(),
            cause,
        }
    })
}

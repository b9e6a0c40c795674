// Core Domain
// 接続文字列、設定モデル、生成物、エラー型などI/Oを持たないロジック

pub mod artifact;
pub mod dsn;
pub mod error;
pub mod naming;
pub mod settings;

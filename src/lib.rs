// Schemiライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（接続文字列、設定モデル、生成物、エラー型）
// - services: ファイル生成、設定の読み書き、Alembic実行、データベースclone
// - logging: tracingの初期化

pub mod cli;
pub mod core;
pub mod logging;
pub mod services;

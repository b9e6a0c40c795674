// Services Layer
// ファイルシステムと外部プロセス、データベースにアクセスするサービス層

pub mod alembic_runner;
pub mod database_cloner;
pub mod environment_writer;
pub mod project_initializer;
pub mod settings_loader;
pub mod template_renderer;

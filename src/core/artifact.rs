// 生成物
//
// init時に生成する3つのファイルの識別子とファイル名を定義します。

/// init時にレンダリングされるファイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// マスター設定ファイル（alembic.ini）
    MasterConfig,
    /// 環境ブートストラップスクリプト（env.py）
    EnvironmentScript,
    /// マイグレーションスクリプトのテンプレート（script.py.mako）
    ScriptTemplate,
}

impl Artifact {
    /// 生成順に並べた全ての生成物
    pub const ALL: [Artifact; 3] = [
        Artifact::MasterConfig,
        Artifact::EnvironmentScript,
        Artifact::ScriptTemplate,
    ];

    /// 出力ファイル名
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::MasterConfig => "alembic.ini",
            Artifact::EnvironmentScript => "env.py",
            Artifact::ScriptTemplate => "script.py.mako",
        }
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

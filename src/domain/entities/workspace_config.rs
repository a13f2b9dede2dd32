use super::workspace::Workspace;
use std::path::{Path, PathBuf};

/// ホームディレクトリ配下の既定ワークスペース名
pub const DEFAULT_WORKSPACE_DIR: &str = "Workspace";

/// 起動時に一度だけ構築される実行設定
///
/// コア処理は環境変数を直接読まず、この値だけを参照する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// ワークスペースのルート
    pub root: PathBuf,

    /// クローン後に起動するエディタ
    pub editor: Option<String>,

    /// デバッグ計測を有効にするか
    pub debug: bool,
}

impl WorkspaceConfig {
    /// ルートを明示して作成
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            editor: None,
            debug: false,
        }
    }

    /// 上書き指定が無ければ `<home>/Workspace` をルートとして解決
    pub fn resolve(root_override: Option<PathBuf>, home_dir: &Path) -> Self {
        let root = root_override
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| home_dir.join(DEFAULT_WORKSPACE_DIR));
        Self::new(root)
    }

    /// エディタを設定（空文字列は未設定扱い）
    pub fn with_editor(mut self, editor: Option<String>) -> Self {
        self.editor = editor.filter(|e| !e.trim().is_empty());
        self
    }

    /// デバッグフラグを設定
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// ワークスペースを取得
    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.root.clone())
    }
}

use crate::domain::value_objects::git_url::GitUrl;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// クローン先を配置するワークスペース
///
/// リポジトリは `<root>/<resource>/<path>` に配置される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// ワークスペースのルートパス
    pub root_path: PathBuf,
}

impl Workspace {
    /// 新しいWorkspaceインスタンスを作成
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// ルートパスを取得
    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// ホスト名とリポジトリパスからクローン先を計算
    ///
    /// ホスト名とパスの`.`や`..`のセグメントは無視するため、結果は常にルート配下になる。
    pub fn destination(&self, resource: &str, path: &str) -> PathBuf {
        let mut destination = self.root_path.clone();
        for segment in resource
            .split('/')
            .chain(path.split('/'))
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        {
            destination.push(segment);
        }
        destination
    }

    /// URLからクローン先を計算
    pub fn destination_for(&self, url: &GitUrl) -> PathBuf {
        self.destination(url.resource(), url.path())
    }
}

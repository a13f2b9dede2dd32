use crate::domain::value_objects::git_url::GitUrl;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 失敗の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// URLがどの形状にもマッチしない
    InvalidUrl,
    /// クローン先に空でないディレクトリが既に存在する（クリーンアップしない）
    DestinationOccupied,
    /// クローンコマンドの失敗
    CloneFailed,
    /// クローンコマンドのタイムアウト
    Timeout,
}

/// 1タスクの最終結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloneOutcome {
    /// クローン成功
    Cloned { destination: PathBuf },
    /// ドライラン（副作用なし）
    Planned { destination: PathBuf },
    /// 同じクローン先を持つ先行タスクがあるためスキップ
    Skipped { reason: String },
    /// 失敗
    Failed { kind: FailureKind, reason: String },
}

impl CloneOutcome {
    /// 失敗を作成
    pub fn failed(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Cloned { .. } | Self::Planned { .. })
    }
}

/// 入力URL 1つ分のクローンタスク
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneTask {
    /// 入力そのままのURL
    pub raw_url: String,

    /// 解析結果
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<GitUrl>,

    /// クローンコマンドに渡したURL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_url: Option<String>,

    /// クローン先
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,

    /// 最終結果
    pub outcome: CloneOutcome,

    /// エディタ起動エラー（クローン結果には影響しない）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_error: Option<String>,
}

impl CloneTask {
    /// 解析前のタスクを作成
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
            url: None,
            clone_url: None,
            destination: None,
            outcome: CloneOutcome::Skipped {
                reason: "not started".to_string(),
            },
            editor_error: None,
        }
    }

    /// 解析結果とクローン先を設定
    pub fn with_target(mut self, url: GitUrl, clone_url: String, destination: PathBuf) -> Self {
        self.url = Some(url);
        self.clone_url = Some(clone_url);
        self.destination = Some(destination);
        self
    }

    /// 最終結果を設定
    pub fn with_outcome(mut self, outcome: CloneOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// 実行全体の結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneReport {
    /// 入力順のタスク
    pub tasks: Vec<CloneTask>,
}

impl CloneReport {
    pub fn new(tasks: Vec<CloneTask>) -> Self {
        Self { tasks }
    }

    /// 成功したタスク数（ドライラン含む）
    pub fn succeeded_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.outcome.is_success()).count()
    }

    /// 失敗したタスク数
    pub fn failed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, CloneOutcome::Failed { .. }))
            .count()
    }

    /// スキップされたタスク数
    pub fn skipped_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, CloneOutcome::Skipped { .. }))
            .count()
    }

    /// 全タスクが成功したか
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.skipped_count() == 0
    }
}

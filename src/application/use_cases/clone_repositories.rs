use crate::common::error::GcloneError;
use crate::common::result::GcloneResultExt;
use crate::domain::entities::{
    clone_task::{CloneOutcome, CloneReport, CloneTask, FailureKind},
    workspace::Workspace,
};
use crate::domain::value_objects::git_url::GitUrl;
use crate::infrastructure::filesystem::{Ownership, WorkspaceFs};
use crate::infrastructure::process::{CommandExecutor, ExecutionConfig, OutputEcho};
use crate::infrastructure::scm::{CloneOptions, ScmError, ScmOperations};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;

/// クローン処理の設定
#[derive(Debug, Clone)]
pub struct CloneRepositoriesConfig {
    /// クローン先のワークスペース
    pub workspace: Workspace,

    /// 既存のクローン先を削除してからクローンするか
    pub force: bool,

    /// クローンコマンドにそのまま渡す追加オプション
    pub clone_args: Vec<String>,

    /// クローン後にエディタで開くか
    pub open_after_clone: bool,

    /// エディタコマンド（引数付き可）
    pub editor: Option<String>,

    /// 1タスクあたりのタイムアウト秒数（Noneは無制限）
    pub timeout_seconds: Option<u64>,

    /// 実際には何もせず計画だけ表示するか
    pub dry_run: bool,

    /// 作成したディレクトリに設定する所有者
    pub ownership: Option<Ownership>,

    /// 子プロセスの出力の中継先
    pub echo_output: OutputEcho,
}

impl CloneRepositoriesConfig {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            force: false,
            clone_args: Vec::new(),
            open_after_clone: false,
            editor: None,
            timeout_seconds: None,
            dry_run: false,
            ownership: None,
            echo_output: OutputEcho::Inherit,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_clone_args(mut self, clone_args: Vec<String>) -> Self {
        self.clone_args = clone_args;
        self
    }

    pub fn with_open_after_clone(mut self, open: bool, editor: Option<String>) -> Self {
        self.open_after_clone = open;
        self.editor = editor;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_ownership(mut self, ownership: Option<Ownership>) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn with_echo_output(mut self, echo_output: OutputEcho) -> Self {
        self.echo_output = echo_output;
        self
    }

    fn clone_options(&self) -> CloneOptions {
        CloneOptions::new(self.clone_args.clone())
            .with_timeout(self.timeout_seconds)
            .with_echo_output(self.echo_output)
    }
}

/// タスクの進行をユーザーに伝えるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneEvent {
    /// URLを解析できなかった
    InvalidUrl { raw_url: String, message: String },
    /// 先行タスクと同じクローン先
    Duplicate {
        raw_url: String,
        destination: PathBuf,
    },
    /// ドライランでの計画
    Planned {
        clone_url: String,
        destination: PathBuf,
    },
    /// クローン成功
    Cloned { path: String, destination: PathBuf },
    /// クローン失敗
    CloneFailed {
        raw_url: String,
        destination: PathBuf,
        message: String,
        cleaned_up: bool,
    },
    /// エディタの起動失敗
    EditorFailed {
        destination: PathBuf,
        editor: String,
        message: String,
    },
}

/// イベントの出力先
///
/// 複数タスクから同時に呼ばれるため、実装は1イベントを1回の書き込みで出力すること。
pub trait CloneReporter: Send + Sync {
    fn report(&self, event: CloneEvent);
}

/// 解析済みでクローン待ちのタスク
struct PreparedClone {
    task: CloneTask,
    url_path: String,
    clone_url: String,
    destination: PathBuf,
}

/// 複数リポジトリを並行にクローンするユースケース
#[derive(Clone)]
pub struct CloneRepositoriesUseCase {
    config: Arc<CloneRepositoriesConfig>,
    scm: Arc<dyn ScmOperations>,
    fs: Arc<dyn WorkspaceFs>,
    reporter: Arc<dyn CloneReporter>,
}

impl CloneRepositoriesUseCase {
    /// 新しいCloneRepositoriesUseCaseインスタンスを作成
    pub fn new(
        config: CloneRepositoriesConfig,
        scm: Arc<dyn ScmOperations>,
        fs: Arc<dyn WorkspaceFs>,
        reporter: Arc<dyn CloneReporter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            scm,
            fs,
            reporter,
        }
    }

    /// 全URLをクローンし、全タスクの完了を待って結果を返す
    ///
    /// 個々の失敗は他のタスクに影響せず、レポートに記録されるだけ。
    pub async fn execute(&self, raw_urls: &[String]) -> CloneReport {
        // 1. 解析とクローン先の決定（入力順）
        let planned = self.plan(raw_urls);

        // 2. URLごとに1タスクを起動
        let mut slots: Vec<Option<CloneTask>> = Vec::with_capacity(planned.len());
        let mut handles = Vec::new();
        for entry in planned {
            match entry {
                Ok(prepared) => {
                    let index = slots.len();
                    let fallback = prepared.task.clone();
                    let span = tracing::info_span!("clone", url = %prepared.task.raw_url);
                    let this = self.clone();
                    let handle = tokio::spawn(async move { this.run_task(prepared).await }.instrument(span));
                    handles.push((index, fallback, handle));
                    slots.push(None);
                }
                Err(done) => slots.push(Some(done)),
            }
        }

        // 3. 全タスクの完了を待つ
        let (meta, futures): (Vec<_>, Vec<_>) = handles
            .into_iter()
            .map(|(index, fallback, handle)| ((index, fallback), handle))
            .unzip();
        let results = join_all(futures).await;

        for ((index, fallback), result) in meta.into_iter().zip(results) {
            let task = match result {
                Ok(task) => task,
                Err(e) => {
                    tracing::error!("Clone task for {} aborted: {}", fallback.raw_url, e);
                    fallback.with_outcome(CloneOutcome::failed(
                        FailureKind::CloneFailed,
                        format!("task aborted: {}", e),
                    ))
                }
            };
            slots[index] = Some(task);
        }

        CloneReport::new(slots.into_iter().flatten().collect())
    }

    /// 各URLを解析してクローン先を決める
    ///
    /// `Err` は既に結果が確定したタスク（解析失敗・重複）。
    fn plan(&self, raw_urls: &[String]) -> Vec<Result<PreparedClone, CloneTask>> {
        let mut seen = HashSet::new();

        raw_urls
            .iter()
            .map(|raw_url| {
                let task = CloneTask::new(raw_url.clone());
                let normalized = raw_url.to_lowercase();

                let url = match GitUrl::parse(&normalized) {
                    Ok(url) => url,
                    Err(e) => {
                        self.reporter.report(CloneEvent::InvalidUrl {
                            raw_url: raw_url.clone(),
                            message: e.to_string(),
                        });
                        return Err(task.with_outcome(CloneOutcome::failed(
                            FailureKind::InvalidUrl,
                            e.to_string(),
                        )));
                    }
                };

                let clone_url = url.clone_url(&normalized);
                let destination = self.config.workspace.destination_for(&url);
                let url_path = url.path().to_string();
                let task = task.with_target(url, clone_url.clone(), destination.clone());

                if !seen.insert(destination.clone()) {
                    self.reporter.report(CloneEvent::Duplicate {
                        raw_url: raw_url.clone(),
                        destination: destination.clone(),
                    });
                    return Err(task.with_outcome(CloneOutcome::Skipped {
                        reason: format!(
                            "duplicate destination {}",
                            destination.display()
                        ),
                    }));
                }

                Ok(PreparedClone {
                    task,
                    url_path,
                    clone_url,
                    destination,
                })
            })
            .collect()
    }

    /// 1リポジトリ分の処理
    async fn run_task(self, prepared: PreparedClone) -> CloneTask {
        let PreparedClone {
            task,
            url_path,
            clone_url,
            destination,
        } = prepared;

        if self.config.dry_run {
            self.reporter.report(CloneEvent::Planned {
                clone_url,
                destination: destination.clone(),
            });
            return task.with_outcome(CloneOutcome::Planned { destination });
        }

        self.prepare_destination(&destination);

        tracing::debug!("Cloning {} into {}", clone_url, destination.display());
        let options = self.config.clone_options();
        if let Err(e) = self
            .scm
            .clone_repository(&clone_url, &destination, &options)
            .await
        {
            return self.handle_clone_failure(task, &destination, e);
        }

        self.reporter.report(CloneEvent::Cloned {
            path: url_path,
            destination: destination.clone(),
        });
        let mut task = task.with_outcome(CloneOutcome::Cloned {
            destination: destination.clone(),
        });

        if self.config.open_after_clone {
            if let Err(e) = self.open_in_editor(&destination).await {
                let editor = self.config.editor.clone().unwrap_or_default();
                self.reporter.report(CloneEvent::EditorFailed {
                    destination: destination.clone(),
                    editor,
                    message: e.to_string(),
                });
                task.editor_error = Some(e.to_string());
            }
        }

        task
    }

    /// クローン先の準備（失敗してもクローンは試みる）
    fn prepare_destination(&self, destination: &Path) {
        if self.config.force {
            self.fs
                .remove_dir_all(destination)
                .best_effort("Failed to remove existing destination");
        }

        if !self.fs.exists(destination) {
            let created = self
                .fs
                .create_dir_all(destination)
                .best_effort("Failed to create destination");

            if let (Some(()), Some(ownership)) = (created, self.config.ownership) {
                self.fs
                    .set_owner(destination, ownership)
                    .best_effort("Failed to set destination owner");
            }
        }
    }

    fn handle_clone_failure(
        &self,
        task: CloneTask,
        destination: &Path,
        error: ScmError,
    ) -> CloneTask {
        let occupied = error.is_destination_occupied();
        let kind = if occupied {
            FailureKind::DestinationOccupied
        } else if error.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::CloneFailed
        };

        // 既存のチェックアウトは消さない
        let cleaned_up = !occupied
            && self
                .fs
                .remove_dir_all(destination)
                .best_effort("Failed to clean up destination")
                .is_some();

        let message = match error.stderr() {
            Some(stderr) if !stderr.trim().is_empty() => stderr.trim_end().to_string(),
            _ => error.to_string(),
        };

        self.reporter.report(CloneEvent::CloneFailed {
            raw_url: task.raw_url.clone(),
            destination: destination.to_path_buf(),
            message: message.clone(),
            cleaned_up,
        });

        task.with_outcome(CloneOutcome::failed(kind, message))
    }

    /// エディタでクローン先を開く（端末の入出力を引き継ぐ）
    async fn open_in_editor(&self, destination: &Path) -> Result<(), GcloneError> {
        let editor = self
            .config
            .editor
            .as_deref()
            .ok_or_else(|| GcloneError::config_error("no editor configured"))?;

        let (program, mut args) = CommandExecutor::parse_command(editor)
            .map_err(|e| GcloneError::command_error_with_source("Invalid editor command", editor, e))?;
        args.push(destination.to_string_lossy().into_owned());

        let config = ExecutionConfig::new().with_echo_output(self.config.echo_output);
        let result = CommandExecutor::run_interactive(&program, &args, &config)
            .await
            .map_err(|e| GcloneError::command_error_with_source("Failed to launch editor", editor, e))?;

        if !result.success {
            return Err(GcloneError::command_error(
                format!("editor exited with status {}", result.exit_code),
                editor,
                Some(result.exit_code),
            ));
        }

        Ok(())
    }
}

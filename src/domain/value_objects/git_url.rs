use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::url_shape::{default_shapes, ShapeKind, UrlShape};

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GitUrlError {
    #[error("invalid repository URL {0}")]
    InvalidRepositoryUrl(String),
}

/// リポジトリURLを分解した値オブジェクト
///
/// 解析に成功した値は常に空でない`resource`と`path`を持つ。
/// それ以外のフィールドは表示やURL再構築のためのベストエフォートな情報で、
/// 空文字列の場合がある。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitUrl {
    /// スキーム（https、ssh、git等）
    pub(crate) protocol: String,

    /// URLに埋め込まれたユーザー
    pub(crate) user: String,

    /// ホスト名
    pub(crate) resource: String,

    /// ポート番号
    pub(crate) port: String,

    /// ホスト配下のリポジトリパス（`.git`と前後の`/`を除去済み）
    pub(crate) path: String,

    /// 組織名
    pub(crate) owner: String,

    /// リポジトリ名
    pub(crate) name: String,

    /// マッチした形状
    pub(crate) shape: ShapeKind,

    /// スキームが入力に無く推測されたか
    pub(crate) scheme_inferred: bool,
}

impl GitUrl {
    /// 既定の形状セットでURLを解析
    ///
    /// 大文字小文字の正規化は呼び出し側の責務。
    pub fn parse(raw: &str) -> Result<Self, GitUrlError> {
        DEFAULT_PARSER.parse(raw)
    }

    /// スキームを取得
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// ユーザーを取得
    pub fn user(&self) -> &str {
        &self.user
    }

    /// ホスト名を取得
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// ポート番号を取得
    pub fn port(&self) -> &str {
        &self.port
    }

    /// リポジトリパスを取得
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 組織名を取得
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// リポジトリ名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// マッチした形状を取得
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// スキームが推測されたものか
    pub fn scheme_inferred(&self) -> bool {
        self.scheme_inferred
    }

    /// クローンコマンドに渡すURLを生成
    ///
    /// スキームが推測され、かつ入力がそのスキームで始まっていない場合のみ
    /// `<scheme>://`を前置する。それ以外は入力をそのまま返す。
    pub fn clone_url(&self, raw: &str) -> String {
        if self.scheme_inferred && !self.protocol.is_empty() && !raw.starts_with(&self.protocol) {
            format!("{}://{}", self.protocol, raw)
        } else {
            raw.to_string()
        }
    }

    /// HTTPS形式のURLを生成
    pub fn to_https_url(&self) -> String {
        format!("https://{}/{}.git", self.resource, self.path)
    }

    /// SSH形式のURLを生成
    pub fn to_ssh_url(&self) -> String {
        format!("git@{}:{}.git", self.resource, self.path)
    }

    /// リポジトリ名を取得（形状が名前を持たない場合はパスの末尾）
    pub fn repo_name(&self) -> &str {
        if self.name.is_empty() {
            self.path.rsplit('/').next().unwrap_or_default()
        } else {
            &self.name
        }
    }

    /// 同じリポジトリを指しているかチェック
    pub fn is_same_repo(&self, other: &GitUrl) -> bool {
        self.resource == other.resource && self.path == other.path
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.path)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::parse(url)
    }
}

/// 形状を優先順位順に試すパーサー
///
/// 最初にマッチした形状の結果を採用し、後続の形状は試さない。
pub struct UrlParser<'a> {
    shapes: Vec<&'a dyn UrlShape>,
}

impl Default for UrlParser<'static> {
    fn default() -> Self {
        Self {
            shapes: default_shapes().collect(),
        }
    }
}

impl<'a> UrlParser<'a> {
    /// 任意の形状セットでパーサーを作成
    pub fn with_shapes(shapes: Vec<&'a dyn UrlShape>) -> Self {
        Self { shapes }
    }

    /// URLを解析
    pub fn parse(&self, raw: &str) -> Result<GitUrl, GitUrlError> {
        self.shapes
            .iter()
            .find_map(|shape| shape.try_match(raw))
            .ok_or_else(|| GitUrlError::InvalidRepositoryUrl(raw.to_string()))
    }
}

static DEFAULT_PARSER: Lazy<UrlParser<'static>> = Lazy::new(UrlParser::default);

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::git_url::GitUrl;

/// 認識できるURLの形状
///
/// 優先順位はこの列挙の並び順と同じ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `scheme://[user@]host[:port]/[owner/]name[.git][/]`
    SchemeUrl,
    /// `[git+]scheme://[user@]host/[owner/]name[.git][/]`
    GitPlusSchemeUrl,
    /// `[user@]host:owner/name.git`
    ScpWithSuffix,
    /// `[user@]host/owner/name[.git][/]`
    HostPathShorthand,
    /// `[user@]host:owner/name[.git][/]`
    ScpShorthand,
    /// `git@host:owner/name[.git][/]`
    GitAtShorthand,
    /// `scheme://[user@]host[:port]/opaque/path[.git][/]`
    SchemeOpaquePath,
    /// `[scheme://][user@]host[/[owner/]name[.git][/]]`
    Generic,
}

/// 1つのURL形状に対するマッチャー
///
/// 入力全体にマッチし、`resource`と`path`が空でない場合のみ`Some`を返す。
/// `.`や`..`のようにドットだけのホスト名は拒否する。
pub trait UrlShape: Send + Sync {
    /// 形状の種類
    fn kind(&self) -> ShapeKind;

    /// 入力を記述子に分解する
    fn try_match(&self, input: &str) -> Option<GitUrl>;
}

/// 名前付きキャプチャグループを持つ正規表現による形状
pub struct RegexShape {
    kind: ShapeKind,
    regex: Regex,
    /// 形状自体が示すスキーム（`git@`リテラル等）。推測扱いにはならない
    implied_protocol: Option<&'static str>,
    /// 形状自体が示すユーザー
    implied_user: Option<&'static str>,
    /// スキームが省略された場合に補うスキーム。推測扱いになる
    fallback_protocol: Option<&'static str>,
}

impl RegexShape {
    /// 新しい形状を作成
    ///
    /// パターンは定数であることを前提とし、不正な場合はパニックする。
    pub fn new(kind: ShapeKind, pattern: &str) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).expect("URL shape pattern must compile"),
            implied_protocol: None,
            implied_user: None,
            fallback_protocol: None,
        }
    }

    /// 形状が示すスキームとユーザーを設定
    pub fn with_implied(mut self, protocol: &'static str, user: &'static str) -> Self {
        self.implied_protocol = Some(protocol);
        self.implied_user = Some(user);
        self
    }

    /// スキーム省略時の既定スキームを設定
    pub fn with_fallback_protocol(mut self, protocol: &'static str) -> Self {
        self.fallback_protocol = Some(protocol);
        self
    }
}

impl UrlShape for RegexShape {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn try_match(&self, input: &str) -> Option<GitUrl> {
        let caps = self.regex.captures(input)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        let resource = group("resource");
        let path = normalize_path(group("path"));
        if is_dot_only(resource) || path.is_empty() {
            return None;
        }

        let (protocol, scheme_inferred) = match group("protocol") {
            "" => match (self.implied_protocol, self.fallback_protocol) {
                (Some(implied), _) => (implied, false),
                (None, Some(fallback)) => (fallback, true),
                (None, None) => ("", false),
            },
            explicit => (explicit, false),
        };

        let user = match group("user") {
            "" => self.implied_user.unwrap_or_default(),
            user => user,
        };

        Some(GitUrl {
            protocol: protocol.to_string(),
            user: user.to_string(),
            resource: resource.to_string(),
            port: group("port").to_string(),
            path,
            owner: strip_git_suffix(group("owner")).to_string(),
            name: strip_git_suffix(group("name")).to_string(),
            shape: self.kind,
            scheme_inferred,
        })
    }
}

/// 空、またはドットだけで構成されたホスト名
fn is_dot_only(resource: &str) -> bool {
    resource.chars().all(|c| c == '.')
}

/// 末尾の`.git`を除去
pub(crate) fn strip_git_suffix(value: &str) -> &str {
    value.strip_suffix(".git").unwrap_or(value)
}

/// パスの正規化: 末尾の`/`、`.git`、先頭の`/`を除去
fn normalize_path(raw: &str) -> String {
    let without_slash = raw.trim_end_matches('/');
    strip_git_suffix(without_slash)
        .trim_start_matches('/')
        .to_string()
}

static DEFAULT_SHAPES: Lazy<Vec<RegexShape>> = Lazy::new(|| {
    vec![
        RegexShape::new(
            ShapeKind::SchemeUrl,
            r"^(?P<protocol>https?|git|ssh|rsync)://(?:(?P<user>.+)@)?(?P<resource>[a-z0-9_.-]*)(?::(?P<port>\d+))?(?P<path>/(?:(?P<owner>[\w\-]+)/)?(?:(?P<name>[\w\-.]+?)(?:\.git|/)?)?)$",
        ),
        RegexShape::new(
            ShapeKind::GitPlusSchemeUrl,
            r"^(?:git\+)?(?P<protocol>\w+)://(?:(?P<user>\w+)@)?(?P<resource>[\w.\-]+)(?P<path>(?:(?:/(?P<owner>[\w\-]+))?/(?P<name>[\w\-]+)(?:\.git|/)?)?)$",
        ),
        RegexShape::new(
            ShapeKind::ScpWithSuffix,
            r"^(?:(?P<user>[^@/]+)@)?(?P<resource>[a-z0-9_.-]*)(?::(?P<port>\d+)/|:)(?P<path>/?(?P<owner>[^/].*)/(?P<name>[^/]+)\.git)$",
        ),
        RegexShape::new(
            ShapeKind::HostPathShorthand,
            r"^(?:(?P<user>\w+)@)?(?P<resource>[\w.\-]+)/{1,2}(?P<path>(?:(?P<owner>[\w\-]+)/)?(?:(?P<name>[\w\-.]+?)(?:\.git|/)?)?)$",
        )
        .with_fallback_protocol("https"),
        RegexShape::new(
            ShapeKind::ScpShorthand,
            r"^(?:(?P<user>\w+)@)?(?P<resource>[\w.\-]+)[:/]{1,2}(?P<path>(?:(?P<owner>[\w\-]+)/)?(?:(?P<name>[\w\-.]+?)(?:\.git|/)?)?)$",
        ),
        RegexShape::new(
            ShapeKind::GitAtShorthand,
            r"^git@(?P<resource>[a-z0-9_.-]*):(?P<path>(?:(?P<owner>\w+)/)?(?:(?P<name>[\w\-]+)(?:\.git|/)?)?)$",
        )
        .with_implied("ssh", "git"),
        RegexShape::new(
            ShapeKind::SchemeOpaquePath,
            r"^(?P<protocol>https?|git|ssh|rsync)://(?:(?P<user>[^@/]+)@)?(?P<resource>[a-z0-9_.-]*)(?::(?P<port>\d+))?/(?P<path>[^.]+)(?:\.git|/)?$",
        ),
        RegexShape::new(
            ShapeKind::Generic,
            r"^(?:(?P<protocol>\w+)://)?(?:(?P<user>\w+)@)?(?P<resource>[\w.\-]+)(?P<path>(?:(?:/(?P<owner>\w+))?/(?P<name>[\w\-]+)(?:\.git|/)?)?)$",
        )
        .with_fallback_protocol("https"),
    ]
});

/// 既定の形状を優先順位順に返す
pub fn default_shapes() -> impl Iterator<Item = &'static dyn UrlShape> {
    DEFAULT_SHAPES.iter().map(|shape| shape as &dyn UrlShape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(kind: ShapeKind) -> &'static dyn UrlShape {
        default_shapes()
            .find(|s| s.kind() == kind)
            .expect("shape registered")
    }

    #[test]
    fn test_default_shape_order() {
        let kinds: Vec<ShapeKind> = default_shapes().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ShapeKind::SchemeUrl,
                ShapeKind::GitPlusSchemeUrl,
                ShapeKind::ScpWithSuffix,
                ShapeKind::HostPathShorthand,
                ShapeKind::ScpShorthand,
                ShapeKind::GitAtShorthand,
                ShapeKind::SchemeOpaquePath,
                ShapeKind::Generic,
            ]
        );
    }

    #[test]
    fn test_scheme_url_with_port() {
        let url = shape(ShapeKind::SchemeUrl)
            .try_match("https://github.com:8443/owner/repo.git")
            .unwrap();
        assert_eq!(url.resource(), "github.com");
        assert_eq!(url.port(), "8443");
        assert_eq!(url.path(), "owner/repo");
        assert_eq!(url.owner(), "owner");
        assert_eq!(url.name(), "repo");
    }

    #[test]
    fn test_scheme_url_rejects_nested_groups() {
        assert!(shape(ShapeKind::SchemeUrl)
            .try_match("https://gitlab.com/group/subgroup/project")
            .is_none());
    }

    #[test]
    fn test_git_plus_scheme() {
        let url = shape(ShapeKind::GitPlusSchemeUrl)
            .try_match("git+ssh://git@github.com/owner/repo.git")
            .unwrap();
        assert_eq!(url.protocol(), "ssh");
        assert_eq!(url.user(), "git");
        assert_eq!(url.path(), "owner/repo");
        assert!(!url.scheme_inferred());
    }

    #[test]
    fn test_scp_with_suffix_does_not_swallow_scheme_urls() {
        assert!(shape(ShapeKind::ScpWithSuffix)
            .try_match("https://gitlab.com/group/subgroup/project.git")
            .is_none());
    }

    #[test]
    fn test_scp_with_suffix_port() {
        let url = shape(ShapeKind::ScpWithSuffix)
            .try_match("git@example.com:2222/owner/repo.git")
            .unwrap();
        assert_eq!(url.port(), "2222");
        assert_eq!(url.path(), "owner/repo");
    }

    #[test]
    fn test_host_path_shorthand_infers_https() {
        let url = shape(ShapeKind::HostPathShorthand)
            .try_match("github.com/owner/repo.git")
            .unwrap();
        assert_eq!(url.protocol(), "https");
        assert!(url.scheme_inferred());
        assert_eq!(url.path(), "owner/repo");

        assert!(shape(ShapeKind::HostPathShorthand)
            .try_match("github.com:owner/repo")
            .is_none());
    }

    #[test]
    fn test_git_at_shorthand_implies_ssh() {
        let url = shape(ShapeKind::GitAtShorthand)
            .try_match("git@github.com:owner/repo")
            .unwrap();
        assert_eq!(url.protocol(), "ssh");
        assert_eq!(url.user(), "git");
        assert!(!url.scheme_inferred());
    }

    #[test]
    fn test_generic_fallback_infers_https() {
        let url = shape(ShapeKind::Generic)
            .try_match("example.org/repo")
            .unwrap();
        assert_eq!(url.protocol(), "https");
        assert!(url.scheme_inferred());
        assert_eq!(url.path(), "repo");
    }

    #[test]
    fn test_generic_keeps_explicit_scheme() {
        let url = shape(ShapeKind::Generic)
            .try_match("ftp://example.org/owner/repo")
            .unwrap();
        assert_eq!(url.protocol(), "ftp");
        assert!(!url.scheme_inferred());
    }

    #[test]
    fn test_empty_path_is_not_a_match() {
        assert!(shape(ShapeKind::Generic).try_match("github.com").is_none());
        assert!(shape(ShapeKind::SchemeUrl)
            .try_match("https://github.com/")
            .is_none());
    }

    #[test]
    fn test_host_is_never_split_to_fill_the_path() {
        assert!(shape(ShapeKind::GitPlusSchemeUrl)
            .try_match("https://github.com/")
            .is_none());
        assert!(shape(ShapeKind::Generic).try_match("foo/").is_none());

        let url = shape(ShapeKind::GitPlusSchemeUrl)
            .try_match("git+https://host.com/repo")
            .unwrap();
        assert_eq!(url.resource(), "host.com");
        assert_eq!(url.owner(), "");
        assert_eq!(url.name(), "repo");
    }

    #[test]
    fn test_dot_only_host_is_rejected() {
        for kind in [ShapeKind::SchemeUrl, ShapeKind::SchemeOpaquePath] {
            assert!(shape(kind).try_match("https://../documents").is_none());
            assert!(shape(kind).try_match("https://./x/y").is_none());
        }
        assert!(shape(ShapeKind::ScpWithSuffix)
            .try_match("..:owner/repo.git")
            .is_none());
        assert!(shape(ShapeKind::Generic).try_match("../x").is_none());
        assert!(is_dot_only("..."));
        assert!(!is_dot_only("a.b"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/owner/repo.git"), "owner/repo");
        assert_eq!(normalize_path("owner/repo/"), "owner/repo");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(strip_git_suffix("repo.git"), "repo");
        assert_eq!(strip_git_suffix("repo"), "repo");
    }
}

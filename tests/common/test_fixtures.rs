//! Test fixtures: repository URLs in the dialects gclone accepts

/// `(input, resource, path)` triples covering every supported URL dialect
pub const URL_DIALECTS: &[(&str, &str, &str)] = &[
    ("https://github.com/x/y", "github.com", "x/y"),
    ("https://github.com/x/y.git", "github.com", "x/y"),
    ("https://github.com/x/y/", "github.com", "x/y"),
    ("http://git.example.com:8080/team/project.git", "git.example.com", "team/project"),
    ("ssh://git@github.com/ntk148v/gclone.git", "github.com", "ntk148v/gclone"),
    ("git+ssh://git@github.com/owner/repo.git", "github.com", "owner/repo"),
    ("git@github.com:ntk148v/gclone.git", "github.com", "ntk148v/gclone"),
    ("user@bitbucket.org:team/tool.git", "bitbucket.org", "team/tool"),
    ("git@gitlab.com:group/sub/project.git", "gitlab.com", "group/sub/project"),
    ("github.com/owner/repo", "github.com", "owner/repo"),
    ("https://gitlab.com/group/sub/project", "gitlab.com", "group/sub/project"),
];

/// Inputs no shape accepts
pub const INVALID_URLS: &[&str] = &["foo", "", "github.com", "https://github.com/"];

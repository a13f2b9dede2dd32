pub mod git_url;
pub mod url_shape;

pub use git_url::{GitUrl, GitUrlError, UrlParser};
pub use url_shape::{RegexShape, ShapeKind, UrlShape};

use crate::common::error::GcloneError;

/// gclone全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use gclone::common::result::GcloneResult;
/// use gclone::common::error::GcloneError;
///
/// fn example_with_error() -> GcloneResult<()> {
///     Err(GcloneError::config_error("no editor configured"))
/// }
/// assert!(example_with_error().is_err());
/// ```
pub type GcloneResult<T> = Result<T, GcloneError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてGcloneResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use gclone::common::result::{GcloneResult, ResultExt};
    /// use std::path::PathBuf;
    ///
    /// let result: Result<(), std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::PermissionDenied, "denied"
    /// ));
    /// let converted: GcloneResult<()> =
    ///     result.with_filesystem_error("Failed to create directory", Some(PathBuf::from("/x")));
    /// assert!(converted.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GcloneResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GcloneResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| GcloneError::filesystem_error_with_source(message, path, e.into()))
    }
}

/// ベストエフォートな操作用のヘルパー
pub trait GcloneResultExt<T> {
    /// エラーを警告ログに出して破棄する（伝播しない）
    fn best_effort(self, context: &str) -> Option<T>;
}

impl<T> GcloneResultExt<T> for GcloneResult<T> {
    fn best_effort(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                match e.path() {
                    Some(path) => tracing::warn!("{} ({}): {}", context, path.display(), e),
                    None => tracing::warn!("{}: {}", context, e),
                }
                None
            }
        }
    }
}

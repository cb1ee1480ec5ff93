//! Remote and local path helpers.

use std::path::Path;

/// Returns the last component of a slash separated remote path.
///
/// Trailing separators are ignored, so `"/pub/docs/"` yields `"docs"`. Both `/`
/// and `\` are treated as separators since FTP servers report either.
pub fn path_element(full_path: &str) -> &str {
    full_path
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
}

/// Display helpers for local paths.
pub trait PathExt {
    /// Lossy UTF-8 rendering with `/` as the only separator.
    fn to_slash_lossy(&self) -> String;
}

impl PathExt for Path {
    fn to_slash_lossy(&self) -> String {
        self.to_string_lossy().replace('\\', "/")
    }
}

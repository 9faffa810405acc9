//! Request path translation
//!
//! Maps a URL path onto the root directory. Decoding and normalization are
//! purely lexical; `ensure_within_root` then checks the resolved file on disk
//! so that symlinks cannot lead outside the root.

use crate::error::RequestError;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// A request path resolved against the root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Location on disk (not yet canonicalized)
    pub fs_path: PathBuf,
    /// Decoded URL path, used for display
    pub decoded: String,
    /// The request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a raw URL path (no query string) into a path under `root`
///
/// - percent-decodes the path; invalid UTF-8 or NUL bytes are rejected
/// - `.` and empty segments are dropped, `..` removes the previous segment
///   and never climbs above the root
/// - segments that are not a single plain file name (e.g. containing a
///   platform separator or drive prefix) are ignored
///
/// # Examples
/// ```
/// use dirserve::handler::path::translate_path;
/// use std::path::Path;
///
/// let target = translate_path(Path::new("/srv"), "/a/../../etc/passwd").unwrap();
/// assert_eq!(target.fs_path, Path::new("/srv/etc/passwd"));
/// ```
pub fn translate_path(root: &Path, raw_path: &str) -> Result<RequestTarget, RequestError> {
    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| RequestError::MalformedPath)?;

    if decoded.contains('\0') {
        return Err(RequestError::MalformedPath);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => segments.push(segment),
            (Some(Component::ParentDir), None) => {
                segments.pop();
            }
            _ => {}
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(&segments);

    Ok(RequestTarget {
        fs_path,
        trailing_slash: decoded.ends_with('/'),
        decoded: decoded.into_owned(),
    })
}

/// Verify that `path` resolves (following symlinks) to a location under the
/// canonical `root`.
pub async fn ensure_within_root(root: &Path, path: &Path) -> Result<(), RequestError> {
    let canonical = tokio::fs::canonicalize(path).await?;
    if canonical.starts_with(root) {
        Ok(())
    } else {
        Err(RequestError::OutsideRoot(canonical))
    }
}

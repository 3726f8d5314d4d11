use std::path::{Path, PathBuf};
use uzers::os::unix::UserExt;

/// Expand a leading `~` or `~user` in a configured path.
///
/// Returns `None` when the home directory cannot be resolved.
///
/// ```
/// use tac_setup::utils::path::expand_tilde;
///
/// let path = expand_tilde("/data").unwrap();
/// assert_eq!(path, std::path::PathBuf::from("/data"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_str()?;

    let Some(after_tilde) = path_str.strip_prefix('~') else {
        return Some(path.to_path_buf());
    };

    if after_tilde.is_empty() || after_tilde.starts_with('/') {
        let home = std::env::var("HOME").ok()?;
        return Some(PathBuf::from(home).join(after_tilde.trim_start_matches('/')));
    }

    let (username, rest) = after_tilde
        .split_once('/')
        .unwrap_or((after_tilde, ""));

    let user = uzers::get_user_by_name(username)?;
    Some(user.home_dir().join(rest))
}

/// Expand `path`, keeping it verbatim if expansion is impossible
pub fn expand_or_keep(path: &Path) -> PathBuf {
    expand_tilde(path).unwrap_or_else(|| path.to_path_buf())
}

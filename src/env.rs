//! Process environment resolution.
//!
//! Resolves the temporary directory, home directory, and executable search
//! path once at startup. A missing variable or missing directory is never
//! fatal: the platform default is substituted and a warning goes to the
//! logging sink.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::platform::{self, Family};

/// Windows directory used when `WINDIR` itself is unset.
const WINDIR_FALLBACK: &str = r"C:\Windows";

/// Environment-derived paths, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Temporary directory.
    pub tmp: PathBuf,

    /// User home directory. Guaranteed to exist, falling back to `tmp`.
    pub home: PathBuf,

    /// Executable search path list.
    pub search_path: Vec<PathBuf>,
}

impl Paths {
    /// Resolve all paths from the process environment.
    pub fn resolve() -> Self {
        let family = platform::current();
        let windir = std::env::var_os("WINDIR");

        let tmp = resolve_tmp(std::env::var_os("TMP"), windir.as_deref(), family);
        let home = resolve_home(
            std::env::var_os("HOME"),
            std::env::home_dir(),
            &tmp,
            family,
        );
        let search_path = resolve_search_path(std::env::var_os("PATH"), windir.as_deref(), family);

        Self {
            tmp,
            home,
            search_path,
        }
    }
}

/// Whether any of the ad hoc debug flags appears in the argument list.
pub fn debug_from_args<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .any(|arg| matches!(arg.as_ref(), "-d" | "-debug" | "--debug"))
}

fn windows_dir(windir: Option<&OsStr>) -> PathBuf {
    match windir {
        Some(dir) => PathBuf::from(dir),
        None => {
            warn!("WINDIR variable not set");
            PathBuf::from(WINDIR_FALLBACK)
        }
    }
}

fn resolve_tmp(var: Option<OsString>, windir: Option<&OsStr>, family: Option<Family>) -> PathBuf {
    if let Some(tmp) = var {
        return PathBuf::from(tmp);
    }

    warn!("TMP variable not set");
    if family == Some(Family::Windows) {
        windows_dir(windir).join("temp")
    } else {
        PathBuf::from("/tmp")
    }
}

fn resolve_home(
    var: Option<OsString>,
    profile: Option<PathBuf>,
    tmp: &Path,
    family: Option<Family>,
) -> PathBuf {
    let home = match var {
        Some(home) => PathBuf::from(home),
        None => {
            if family != Some(Family::Windows) {
                warn!("HOME variable not set");
            }
            profile.unwrap_or_else(|| tmp.to_path_buf())
        }
    };

    if home.exists() {
        home
    } else {
        warn!(path = %home.display(), "home directory does not exist");
        tmp.to_path_buf()
    }
}

fn resolve_search_path(
    var: Option<OsString>,
    windir: Option<&OsStr>,
    family: Option<Family>,
) -> Vec<PathBuf> {
    if let Some(path) = var {
        return std::env::split_paths(&path).collect();
    }

    warn!("PATH variable not set");
    match family {
        Some(Family::MacOs) => ["/opt/local/bin", "/usr/local/bin", "/usr/bin", "/bin"]
            .iter()
            .map(PathBuf::from)
            .collect(),
        Some(Family::Windows) => {
            let windir = windows_dir(windir);
            vec![windir.join("system32"), windir]
        }
        _ => ["/usr/local/bin", "/usr/bin", "/bin"]
            .iter()
            .map(PathBuf::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_honors_variable() {
        let tmp = resolve_tmp(Some(OsString::from("/var/tmp")), None, Some(Family::Linux));
        assert_eq!(tmp, PathBuf::from("/var/tmp"));
    }

    #[test]
    fn test_tmp_posix_default() {
        for family in [Some(Family::Linux), Some(Family::MacOs), Some(Family::Haiku), None] {
            assert_eq!(resolve_tmp(None, None, family), PathBuf::from("/tmp"));
        }
    }

    #[test]
    fn test_tmp_windows_default_under_windir() {
        let windir = OsString::from(r"C:\Windows");
        let tmp = resolve_tmp(None, Some(&windir), Some(Family::Windows));
        assert_eq!(tmp, Path::new(r"C:\Windows").join("temp"));
    }

    #[test]
    fn test_tmp_windows_default_without_windir() {
        let tmp = resolve_tmp(None, None, Some(Family::Windows));
        assert_eq!(tmp, Path::new(WINDIR_FALLBACK).join("temp"));
    }

    #[test]
    fn test_home_honors_existing_variable() {
        let existing = std::env::temp_dir();
        let home = resolve_home(
            Some(existing.clone().into_os_string()),
            None,
            Path::new("/tmp"),
            Some(Family::Linux),
        );
        assert_eq!(home, existing);
    }

    #[test]
    fn test_missing_home_directory_falls_back_to_tmp() {
        let tmp = std::env::temp_dir();
        let home = resolve_home(
            Some(OsString::from("/nonexistent/appshell-home")),
            None,
            &tmp,
            Some(Family::Linux),
        );
        assert_eq!(home, tmp);
    }

    #[test]
    fn test_unset_home_uses_profile_lookup() {
        let profile = std::env::temp_dir();
        let home = resolve_home(None, Some(profile.clone()), Path::new("/tmp"), Some(Family::Linux));
        assert_eq!(home, profile);
    }

    #[test]
    fn test_unset_home_without_profile_uses_tmp() {
        let tmp = std::env::temp_dir();
        let home = resolve_home(None, None, &tmp, Some(Family::Linux));
        assert_eq!(home, tmp);
    }

    #[test]
    fn test_search_path_splits_variable() {
        let joined = std::env::join_paths([Path::new("/usr/bin"), Path::new("/bin")]).unwrap();
        let list = resolve_search_path(Some(joined), None, Some(Family::Linux));
        assert_eq!(list, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
    }

    #[test]
    fn test_search_path_defaults_per_family() {
        let macos = resolve_search_path(None, None, Some(Family::MacOs));
        assert_eq!(macos[0], PathBuf::from("/opt/local/bin"));
        assert_eq!(macos.len(), 4);

        let posix = resolve_search_path(None, None, Some(Family::Linux));
        assert_eq!(
            posix,
            vec![
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin"),
            ]
        );

        let windir = OsString::from(r"C:\Windows");
        let windows = resolve_search_path(None, Some(&windir), Some(Family::Windows));
        assert_eq!(windows[0], Path::new(r"C:\Windows").join("system32"));
        assert_eq!(windows[1], PathBuf::from(r"C:\Windows"));
    }

    #[test]
    fn test_debug_flags() {
        assert!(debug_from_args(["-d"]));
        assert!(debug_from_args(["-debug"]));
        assert!(debug_from_args(["positional", "--debug"]));
        assert!(!debug_from_args(["-dd", "--verbose"]));
        assert!(!debug_from_args(Vec::<String>::new()));
    }
}

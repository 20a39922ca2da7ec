//! Host platform detection.
//!
//! Classifies the operating system into one of four families once at
//! startup. Unrecognized hosts are a valid outcome, not an error: every
//! predicate simply answers false.

use std::sync::OnceLock;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    MacOs,
    Linux,
    Haiku,
    Windows,
}

impl Family {
    /// Classify an OS identifier string (the shape of `std::env::consts::OS`).
    ///
    /// Returns `None` for identifiers outside the four supported families.
    pub fn detect(os: &str) -> Option<Family> {
        match os {
            "macos" | "darwin" => Some(Family::MacOs),
            "windows" | "cygwin" => Some(Family::Windows),
            _ if os.contains("linux") => Some(Family::Linux),
            _ if os.contains("haiku") => Some(Family::Haiku),
            _ => None,
        }
    }
}

/// The host's family, detected once and cached.
pub fn current() -> Option<Family> {
    static CURRENT: OnceLock<Option<Family>> = OnceLock::new();
    *CURRENT.get_or_init(|| Family::detect(std::env::consts::OS))
}

/// Whether the host is macOS.
pub fn is_macos() -> bool {
    current() == Some(Family::MacOs)
}

/// Whether the host is in the Linux family.
pub fn is_linux() -> bool {
    current() == Some(Family::Linux)
}

/// Whether the host is Haiku.
pub fn is_haiku() -> bool {
    current() == Some(Family::Haiku)
}

/// Whether the host is in the Windows family.
pub fn is_windows() -> bool {
    current() == Some(Family::Windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_identifiers() {
        assert_eq!(Family::detect("macos"), Some(Family::MacOs));
        assert_eq!(Family::detect("darwin"), Some(Family::MacOs));
        assert_eq!(Family::detect("linux"), Some(Family::Linux));
        assert_eq!(Family::detect("haiku"), Some(Family::Haiku));
        assert_eq!(Family::detect("windows"), Some(Family::Windows));
        assert_eq!(Family::detect("cygwin"), Some(Family::Windows));
    }

    #[test]
    fn test_unsupported_identifiers_match_nothing() {
        for os in ["freebsd", "netbsd", "solaris", "wasi", ""] {
            assert_eq!(Family::detect(os), None, "{os} should be unclassified");
        }
    }

    #[test]
    fn test_exactly_one_family_per_identifier() {
        for os in ["macos", "darwin", "linux", "haiku", "windows", "cygwin", "freebsd"] {
            let family = Family::detect(os);
            let matches = [
                family == Some(Family::MacOs),
                family == Some(Family::Linux),
                family == Some(Family::Haiku),
                family == Some(Family::Windows),
            ]
            .iter()
            .filter(|&&m| m)
            .count();
            assert!(matches <= 1);
            if family.is_some() {
                assert_eq!(matches, 1);
            } else {
                assert_eq!(matches, 0);
            }
        }
    }
}

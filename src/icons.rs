//! Icon lookup.
//!
//! Resolves a logical icon name and pixel size against the user's icon
//! theme directories, falling back to the bundled resource convention
//! `resources/<size>x<size>/<name>.svgz` next to the executable. Absence
//! of both sources yields an empty icon, not an error.

use std::path::{Path, PathBuf};

/// Default pixel size for lookups.
pub const DEFAULT_ICON_SIZE: u32 = 16;

/// File extensions a theme may store an icon under, in preference order.
const EXTENSIONS: [&str; 3] = ["png", "svg", "svgz"];

/// Context subdirectories searched within a theme's size directory.
const CONTEXTS: [&str; 8] = [
    "apps",
    "actions",
    "devices",
    "places",
    "status",
    "categories",
    "mimetypes",
    "emblems",
];

/// Where a resolved icon was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// In the user's icon theme.
    Theme(PathBuf),

    /// In the bundled fallback resources.
    Bundled(PathBuf),
}

/// A resolved, possibly empty, icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeIcon {
    name: String,
    size: u32,
    source: Option<IconSource>,
}

impl ThemeIcon {
    /// The logical name the icon was looked up under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pixel size the icon was looked up at.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether neither the theme nor the bundled resources had the icon.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// Path of the resolved file, theme or bundled.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Some(IconSource::Theme(path)) | Some(IconSource::Bundled(path)) => Some(path),
            None => None,
        }
    }

    /// The source of the resolved file.
    pub fn source(&self) -> Option<&IconSource> {
        self.source.as_ref()
    }

    /// Decode a PNG source into RGBA pixels.
    ///
    /// Vector sources and empty icons decode to `None`; so does a file
    /// that fails to parse.
    pub fn load_rgba(&self) -> Option<(Vec<u8>, u32, u32)> {
        let path = self.path()?;
        if path.extension()? != "png" {
            return None;
        }
        let pixels = image::open(path).ok()?.into_rgba8();
        let (width, height) = pixels.dimensions();
        Some((pixels.into_raw(), width, height))
    }
}

/// Look `name` up at `size`: user theme first, bundled resources second.
pub fn find_icon(name: &str, size: u32) -> ThemeIcon {
    let theme = std::env::var("XDG_ICON_THEME").unwrap_or_else(|_| "hicolor".to_string());
    lookup(
        &theme_base_dirs(),
        &theme,
        bundled_resource_dir().as_deref(),
        name,
        size,
    )
}

fn lookup(
    bases: &[PathBuf],
    theme: &str,
    bundled_root: Option<&Path>,
    name: &str,
    size: u32,
) -> ThemeIcon {
    let sized = format!("{size}x{size}");

    let mut themes = vec![theme];
    if theme != "hicolor" {
        themes.push("hicolor");
    }

    for theme in themes {
        for base in bases {
            let size_dir = base.join(theme).join(&sized);
            let candidates =
                std::iter::once(size_dir.clone()).chain(CONTEXTS.iter().map(|c| size_dir.join(c)));
            for dir in candidates {
                for ext in EXTENSIONS {
                    let candidate = dir.join(format!("{name}.{ext}"));
                    if candidate.is_file() {
                        return ThemeIcon {
                            name: name.to_string(),
                            size,
                            source: Some(IconSource::Theme(candidate)),
                        };
                    }
                }
            }
        }
    }

    if let Some(root) = bundled_root {
        let candidate = root.join(&sized).join(format!("{name}.svgz"));
        if candidate.is_file() {
            return ThemeIcon {
                name: name.to_string(),
                size,
                source: Some(IconSource::Bundled(candidate)),
            };
        }
    }

    ThemeIcon {
        name: name.to_string(),
        size,
        source: None,
    }
}

// Base directories that may hold icon themes, in search order.
fn theme_base_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = std::env::home_dir();

    if let Some(home) = &home {
        dirs.push(home.join(".icons"));
    }

    match std::env::var_os("XDG_DATA_HOME") {
        Some(data_home) => dirs.push(PathBuf::from(data_home).join("icons")),
        None => {
            if let Some(home) = &home {
                dirs.push(home.join(".local/share/icons"));
            }
        }
    }

    let data_dirs = std::env::var_os("XDG_DATA_DIRS")
        .unwrap_or_else(|| "/usr/local/share:/usr/share".into());
    for dir in std::env::split_paths(&data_dirs) {
        dirs.push(dir.join("icons"));
    }

    dirs
}

fn bundled_resource_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("resources"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("appshell-icons-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_theme_lookup_finds_sized_context_entry() {
        let base = scratch_dir("theme-hit");
        let stored = base.join("breeze/24x24/apps/document-open.png");
        touch(&stored);

        let icon = lookup(&[base.clone()], "breeze", None, "document-open", 24);
        assert_eq!(icon.source(), Some(&IconSource::Theme(stored)));
        assert!(!icon.is_empty());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_hicolor_searched_after_active_theme() {
        let base = scratch_dir("hicolor");
        let stored = base.join("hicolor/16x16/actions/go-up.svg");
        touch(&stored);

        let icon = lookup(&[base.clone()], "breeze", None, "go-up", 16);
        assert_eq!(icon.path(), Some(stored.as_path()));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_bundled_fallback_path_convention() {
        let root = scratch_dir("bundled");
        let stored = root.join("48x48/media-playback-start.svgz");
        touch(&stored);

        let icon = lookup(&[], "breeze", Some(&root), "media-playback-start", 48);
        assert_eq!(icon.source(), Some(&IconSource::Bundled(stored.clone())));
        assert!(stored.ends_with("48x48/media-playback-start.svgz"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_theme_wins_over_bundled() {
        let base = scratch_dir("theme-first");
        let themed = base.join("hicolor/16x16/apps/view-refresh.png");
        touch(&themed);
        let root = scratch_dir("bundled-second");
        touch(&root.join("16x16/view-refresh.svgz"));

        let icon = lookup(&[base.clone()], "hicolor", Some(&root), "view-refresh", 16);
        assert_eq!(icon.source(), Some(&IconSource::Theme(themed)));

        let _ = fs::remove_dir_all(&base);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_absent_everywhere_is_empty_not_an_error() {
        let icon = lookup(&[], "breeze", None, "no-such-icon", 16);
        assert!(icon.is_empty());
        assert_eq!(icon.path(), None);
        assert_eq!(icon.load_rgba(), None);
        assert_eq!(icon.name(), "no-such-icon");
        assert_eq!(icon.size(), 16);
    }
}

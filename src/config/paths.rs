//! Where settings, templates and bundles live on disk (`dirs` crate).
//!
//! | Path | Linux | macOS | Windows |
//! |---|---|---|---|
//! | settings | `~/.config/web-story/settings.toml` | `~/Library/Application Support/web-story/` | `%APPDATA%\web-story\` |
//! | templates, bundles | `~/.local/share/web-story/` | `~/Library/Application Support/web-story/` | `%LOCALAPPDATA%\web-story\` |

use std::path::{Path, PathBuf};

const APP_DIR: &str = "web-story";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Named AMP and submission templates.
    pub templates_dir: PathBuf,
    /// Default output directory of `bundle`.
    pub bundles_dir: PathBuf,
}

impl AppPaths {
    /// Platform directories, or `./web-story` when the platform has none.
    pub fn new() -> Self {
        let base = |dir: Option<PathBuf>| dir.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR);
        Self::rooted(&base(dirs::config_dir()), &base(dirs::data_local_dir()))
    }

    /// Layout under explicit roots.
    pub fn rooted(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join(SETTINGS_FILE),
            templates_dir: data_dir.join("templates"),
            bundles_dir: data_dir.join("bundles"),
        }
    }

    /// `name` inside the templates directory; `.html` is appended when the
    /// name has no extension.
    pub fn template(&self, name: &str) -> PathBuf {
        let file = self.templates_dir.join(name);
        if file.extension().is_some() {
            file
        } else {
            file.with_extension("html")
        }
    }

    /// `{stem}.zip` inside the bundles directory.
    pub fn bundle_file(&self, stem: &str) -> PathBuf {
        self.bundles_dir.join(format!("{stem}.zip"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_layout_is_complete() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert_eq!(paths.settings_file, paths.config_dir.join(SETTINGS_FILE));
        assert!(paths.templates_dir.ends_with("templates"));
        assert!(paths.bundles_dir.ends_with("bundles"));
    }

    #[test]
    fn template_and_bundle_names() {
        let paths = AppPaths::rooted(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(paths.template("amp"), PathBuf::from("/data/templates/amp.html"));
        assert_eq!(paths.template("final.htm"), PathBuf::from("/data/templates/final.htm"));
        assert_eq!(paths.bundle_file("mars_x_G"), PathBuf::from("/data/bundles/mars_x_G.zip"));
    }
}

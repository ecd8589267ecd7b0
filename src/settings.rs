//! Lesson settings and preferences
//!
//! Persisted as JSON next to the binaries. Every field has a default so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{LESSON_HEIGHT, LESSON_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Environment variable naming an alternative settings file
pub const SETTINGS_ENV: &str = "BLOCKS_LESSONS_SETTINGS";
/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Fonts probed when no font path is configured
const SYSTEM_FONTS: &[&str] = &[
    "fonts/arial.ttf",
    "assets/fonts/arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Lesson settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    /// Graphics lesson window width (physical pixels)
    pub window_width: u32,
    /// Graphics lesson window height (physical pixels)
    pub window_height: u32,
    /// Wait for vertical blank when presenting
    pub vsync: bool,

    // === Blocks game ===
    /// Logical screen the game simulates in (scaled to the window)
    pub game_width: f32,
    pub game_height: f32,

    // === Assets ===
    /// TrueType font used for text; system fonts are probed when unset
    pub font_path: Option<PathBuf>,
    /// Pixel height glyphs are rasterized at
    pub font_pixel_size: f32,
    /// Image for the texture lessons; a checkerboard is generated when unset
    pub texture_path: Option<PathBuf>,
    /// WGSL file replacing the built-in triangle shader
    pub triangle_shader: Option<PathBuf>,

    // === Logging ===
    /// env_logger filter, e.g. "info" or "blocks_lessons=debug,wgpu=warn"
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: LESSON_WIDTH,
            window_height: LESSON_HEIGHT,
            vsync: true,

            game_width: SCREEN_WIDTH,
            game_height: SCREEN_HEIGHT,

            font_path: None,
            font_pixel_size: 48.0,
            texture_path: None,
            triangle_shader: None,

            log_filter: None,
        }
    }
}

impl Settings {
    /// Where settings are read from: `$BLOCKS_LESSONS_SETTINGS` or `./settings.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings from a file
    ///
    /// A missing file gives defaults. A malformed file is reported and also
    /// gives defaults; settings never stop a lesson from starting.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The configured font, or the first system font that exists
    pub fn resolve_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        SYSTEM_FONTS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "window_width": 1024, "vsync": false }"#).unwrap();
        assert_eq!(settings.window_width, 1024);
        assert!(!settings.vsync);
        assert_eq!(settings.window_height, LESSON_HEIGHT);
        assert_eq!(settings.font_pixel_size, 48.0);
        assert!(settings.font_path.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ window_width: ").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(Path::new("definitely/not/here/settings.json"));
        assert_eq!(settings.game_width, SCREEN_WIDTH);
        assert_eq!(settings.game_height, SCREEN_HEIGHT);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "blocks-lessons-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            font_path: Some(PathBuf::from("fonts/arial.ttf")),
            font_pixel_size: 32.0,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.font_path, Some(PathBuf::from("fonts/arial.ttf")));
        assert_eq!(loaded.font_pixel_size, 32.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_configured_font_wins() {
        let settings = Settings {
            font_path: Some(PathBuf::from("my/font.ttf")),
            ..Settings::default()
        };
        assert_eq!(settings.resolve_font(), Some(PathBuf::from("my/font.ttf")));
    }
}

pub mod keybinding;
mod loader;

use serde::{Deserialize, Serialize};

use crate::effect::{EffectBackend, EffectLevel};
use crate::host::ActionScope;
use crate::log::LogConfig;

pub use keybinding::{Keybinding, Modifier};
pub use loader::{
    ConfigError, config_dir, config_path, keybindings_path, load, load_keybindings, load_unlogged,
    try_load, try_load_keybindings,
};

/// Top-level configuration for Kolour.
///
/// Loaded from `~/.config/kolour/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How window effects are rendered.
    pub effects: EffectsConfig,
    /// Desktop-wide grayscale settings.
    pub global: GlobalConfig,
    /// Window selector overlay appearance.
    pub selector: SelectorConfig,
    /// Shell modes in which shortcuts are active.
    pub shortcuts: ShortcutConfig,
    /// File logging.
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// `"shader"` (custom GLSL) or `"builtin"` (compositor desaturation).
    pub backend: EffectBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Intensity of the desktop-wide effect.
    pub level: EffectLevel,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            level: EffectLevel::Full,
        }
    }
}

/// Window selector overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Overlay width in pixels.
    pub width: u32,
    /// Overlay height in pixels.
    pub height: u32,
    /// Heading text. `{count}` is replaced by the number of windows.
    pub heading: String,
    /// Label shown for windows with an empty title.
    pub untitled: String,
    /// Label of the close button.
    pub close_label: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            width: 450,
            height: 600,
            heading: "Windows ({count})".into(),
            untitled: "Untitled".into(),
            close_label: "Close".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    /// Fire shortcuts in the normal desktop mode.
    pub normal: bool,
    /// Fire shortcuts while the overview is shown.
    pub overview: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            normal: true,
            overview: true,
        }
    }
}

impl ShortcutConfig {
    pub fn scope(&self) -> ActionScope {
        ActionScope {
            normal: self.normal,
            overview: self.overview,
        }
    }
}

impl Config {
    /// Clamps selector geometry and restores empty labels.
    pub fn validate(&mut self) {
        let defaults = SelectorConfig::default();
        let sel = &mut self.selector;
        sel.width = sel.width.clamp(200, 4096);
        sel.height = sel.height.clamp(120, 4096);
        if sel.heading.trim().is_empty() {
            sel.heading = defaults.heading;
        }
        if sel.untitled.trim().is_empty() {
            sel.untitled = defaults.untitled;
        }
        if sel.close_label.trim().is_empty() {
            sel.close_label = defaults.close_label;
        }
    }
}

/// Wrapper for deserializing the keybindings file.
///
/// The file contains a top-level `[[keybinding]]` array of tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KeybindingsFile {
    #[serde(default = "keybinding::defaults")]
    keybinding: Vec<Keybinding>,
}

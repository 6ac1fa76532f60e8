use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effect::EffectLevel;

/// An action that can be triggered by a global shortcut.
///
/// The string form (e.g. `"grayscale-50"`) doubles as the shortcut name
/// registered with the host and as the value used in `keybindings.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    /// Apply a grayscale level to the focused window.
    Grayscale(EffectLevel),
    /// Remove the grayscale effect from every window.
    RemoveEffects,
    /// Open the window selector, or close it if it is already open.
    ToggleSelector,
    /// Toggle the desktop-wide grayscale effect.
    ToggleGlobalGrayscale,
}

impl Action {
    /// Every action, in registration order.
    pub const ALL: [Action; 7] = [
        Self::Grayscale(EffectLevel::Quarter),
        Self::Grayscale(EffectLevel::Half),
        Self::Grayscale(EffectLevel::ThreeQuarter),
        Self::Grayscale(EffectLevel::Full),
        Self::RemoveEffects,
        Self::ToggleSelector,
        Self::ToggleGlobalGrayscale,
    ];

    /// Returns the shortcut name for this action.
    pub fn name(self) -> String {
        match self {
            Self::Grayscale(level) => format!("grayscale-{}", level.percent()),
            Self::RemoveEffects => "remove-effects".into(),
            Self::ToggleSelector => "window-group".into(),
            Self::ToggleGlobalGrayscale => "global-grayscale".into(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(pct) = s.strip_prefix("grayscale-")
            && let Ok(pct) = pct.parse::<u8>()
            && let Some(level) = EffectLevel::from_percent(pct)
        {
            return Ok(Self::Grayscale(level));
        }
        match s.as_str() {
            "remove-effects" => Ok(Self::RemoveEffects),
            "window-group" => Ok(Self::ToggleSelector),
            "global-grayscale" => Ok(Self::ToggleGlobalGrayscale),
            _ => Err(format!("unknown action: {s:?}")),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.name()
    }
}

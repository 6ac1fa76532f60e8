use serde::{Deserialize, Serialize};

use crate::Action;
use crate::effect::EffectLevel;

/// A user-configured keybinding that maps a key combination to an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keybinding {
    /// The action to trigger.
    pub action: Action,
    /// Key name (e.g. "G", "1", "Escape", "F1").
    pub key: String,
    /// Modifier keys (e.g. ["ctrl", "alt"]).
    pub modifiers: Vec<Modifier>,
}

/// Keyboard modifier keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

/// Returns the default keybindings.
///
/// Grayscale: Ctrl + Alt + 1..4 (25/50/75/100 %)
/// Remove all: Ctrl + Alt + 0
/// Window selector: Ctrl + Alt + G
/// Desktop grayscale: Ctrl + Alt + Q
pub fn defaults() -> Vec<Keybinding> {
    use Modifier::{Alt, Ctrl};

    let mut bindings: Vec<Keybinding> = EffectLevel::ALL
        .into_iter()
        .zip(1..)
        .map(|(level, n): (EffectLevel, u8)| {
            bind(Action::Grayscale(level), &n.to_string(), &[Ctrl, Alt])
        })
        .collect();

    bindings.push(bind(Action::RemoveEffects, "0", &[Ctrl, Alt]));
    bindings.push(bind(Action::ToggleSelector, "G", &[Ctrl, Alt]));
    bindings.push(bind(Action::ToggleGlobalGrayscale, "Q", &[Ctrl, Alt]));
    bindings
}

fn bind(action: Action, key: &str, modifiers: &[Modifier]) -> Keybinding {
    Keybinding {
        action,
        key: key.into(),
        modifiers: modifiers.to_vec(),
    }
}

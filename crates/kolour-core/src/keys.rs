use crate::config::{Keybinding, Modifier};

/// Converts a key name string to its canonical keysym name.
///
/// Supports letters (A–Z), digits (0–9), function keys (F1–F12),
/// and common named keys (Enter, Space, Tab, etc.).
/// Matching is case-insensitive.
pub fn key_name(name: &str) -> Option<String> {
    let upper = name.trim().to_ascii_uppercase();

    // Single letter A–Z or digit 0–9
    if upper.len() == 1 {
        let ch = upper.as_bytes()[0];
        if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
            return Some(upper);
        }
    }

    // Function keys F1–F12
    if let Some(rest) = upper.strip_prefix('F')
        && let Ok(n) = rest.parse::<u32>()
        && (1..=12).contains(&n)
    {
        return Some(format!("F{n}"));
    }

    let named = match upper.as_str() {
        "ENTER" | "RETURN" => "Return",
        "TAB" => "Tab",
        "ESCAPE" | "ESC" => "Escape",
        "SPACE" => "space",
        "BACKSPACE" => "BackSpace",
        "DELETE" | "DEL" => "Delete",
        "INSERT" | "INS" => "Insert",
        "HOME" => "Home",
        "END" => "End",
        "PAGEUP" | "PGUP" => "Page_Up",
        "PAGEDOWN" | "PGDN" => "Page_Down",

        "LEFT" => "Left",
        "UP" => "Up",
        "RIGHT" => "Right",
        "DOWN" => "Down",

        "MINUS" => "minus",
        "PLUS" | "EQUALS" => "equal",
        "COMMA" => "comma",
        "PERIOD" | "DOT" => "period",
        "SLASH" => "slash",
        "SEMICOLON" => "semicolon",
        "BACKSLASH" => "backslash",
        "LBRACKET" => "bracketleft",
        "RBRACKET" => "bracketright",
        "QUOTE" => "apostrophe",
        "BACKTICK" | "GRAVE" => "grave",

        _ => return None,
    };
    Some(named.into())
}

/// Renders a keybinding as an accelerator string such as `<Ctrl><Alt>1`.
///
/// Returns `None` if the key name is not recognised.
pub fn accelerator(binding: &Keybinding) -> Option<String> {
    let key = key_name(&binding.key)?;
    let mut accel = String::new();
    for m in &binding.modifiers {
        accel.push_str(modifier_tag(m));
    }
    accel.push_str(&key);
    Some(accel)
}

fn modifier_tag(modifier: &Modifier) -> &'static str {
    match modifier {
        Modifier::Ctrl => "<Ctrl>",
        Modifier::Alt => "<Alt>",
        Modifier::Shift => "<Shift>",
        Modifier::Super => "<Super>",
    }
}

//! Modal window selector overlay.
//!
//! The overlay lists the normal, unminimized windows of the active
//! workspace and hands the chosen one to the window manager for focus.
//! It is either Closed (no session) or Open (one session holding the
//! surface, its key subscription and the window snapshot it was built
//! from).

use log::debug;

use crate::config::SelectorConfig;
use crate::host::{
    ChromeHost, SubscriptionHandle, SurfaceHandle, WindowHost, WindowInfo, WindowRef, WindowType,
};

/// One clickable row of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    /// 1-based position shown to the user and bound to the digit key.
    pub index: usize,
    pub window: WindowRef,
    /// Rendered text, e.g. `"2. Terminal"`.
    pub label: String,
}

/// Everything the host needs to draw the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySurface {
    pub heading: String,
    pub entries: Vec<OverlayEntry>,
    pub close_label: String,
    pub width: u32,
    pub height: u32,
}

impl OverlaySurface {
    /// Builds the surface for a window snapshot.
    pub fn build(windows: &[WindowInfo], config: &SelectorConfig) -> Self {
        let entries = windows
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let title = if info.title.trim().is_empty() {
                    config.untitled.as_str()
                } else {
                    info.title.as_str()
                };
                OverlayEntry {
                    index: i + 1,
                    window: info.window,
                    label: format!("{}. {title}", i + 1),
                }
            })
            .collect();

        Self {
            heading: config.heading.replace("{count}", &windows.len().to_string()),
            entries,
            close_label: config.close_label.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

/// Keys the overlay distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Escape,
    /// A digit on the main row or keypad.
    Digit(u8),
    Other,
}

impl OverlayKey {
    /// Classifies a keysym name such as `"Escape"`, `"3"` or `"KP_3"`.
    pub fn from_keysym(name: &str) -> Self {
        if name.eq_ignore_ascii_case("escape") {
            return Self::Escape;
        }
        let digit = name.strip_prefix("KP_").unwrap_or(name);
        match digit.as_bytes() {
            [d] if d.is_ascii_digit() => Self::Digit(d - b'0'),
            _ => Self::Other,
        }
    }
}

/// Input delivered to an open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Key(OverlayKey),
    /// Pointer activation of the entry at this 0-based position.
    EntryClicked(usize),
    CloseClicked,
}

/// Whether an input event was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Propagate,
}

/// Returns the windows the selector offers, in host order.
pub fn eligible_windows<H: WindowHost + ?Sized>(host: &H) -> Vec<WindowInfo> {
    let workspace = host.active_workspace();
    host.list_windows()
        .into_iter()
        .filter(|w| {
            w.window_type == WindowType::Normal && !w.minimized && w.workspace == workspace
        })
        .collect()
}

struct SelectorSession {
    surface: SurfaceHandle,
    key_subscription: Option<SubscriptionHandle>,
    windows: Vec<WindowRef>,
}

/// The window selector state machine.
pub struct SelectorOverlay {
    config: SelectorConfig,
    session: Option<SelectorSession>,
}

impl SelectorOverlay {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Opens the overlay, or closes it if it is already open.
    ///
    /// Stays closed when there is nothing to list or the host refuses
    /// the surface. Returns whether the overlay is open afterwards.
    pub fn show<H>(&mut self, host: &mut H) -> bool
    where
        H: WindowHost + ChromeHost + ?Sized,
    {
        if self.session.is_some() {
            self.hide(host);
            return false;
        }

        let windows = eligible_windows(host);
        if windows.is_empty() {
            debug!("selector: no eligible windows");
            return false;
        }

        let surface = OverlaySurface::build(&windows, &self.config);
        let handle = match host.add_overlay_surface(&surface) {
            Ok(h) => h,
            Err(e) => {
                debug!("selector surface not created: {e}");
                return false;
            }
        };
        if let Err(e) = host.set_input_focus(handle) {
            debug!("selector could not take input focus: {e}");
        }
        let key_subscription = match host.connect_key_press(handle) {
            Ok(sub) => Some(sub),
            Err(e) => {
                debug!("selector key handler not connected: {e}");
                None
            }
        };

        self.session = Some(SelectorSession {
            surface: handle,
            key_subscription,
            windows: windows.iter().map(|w| w.window).collect(),
        });
        true
    }

    /// Closes the overlay. Safe to call when already closed.
    pub fn hide<H: ChromeHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(sub) = session.key_subscription {
            host.disconnect(session.surface, sub);
        }
        host.destroy_overlay_surface(session.surface);
    }

    /// Routes an input event to the open overlay.
    pub fn handle_event<H>(&mut self, host: &mut H, event: OverlayEvent) -> Propagation
    where
        H: WindowHost + ChromeHost + ?Sized,
    {
        if self.session.is_none() {
            return Propagation::Propagate;
        }
        match event {
            OverlayEvent::Key(OverlayKey::Escape) | OverlayEvent::CloseClicked => {
                self.hide(host);
                Propagation::Stop
            }
            OverlayEvent::Key(OverlayKey::Digit(d @ 1..=9)) => {
                self.activate(host, usize::from(d) - 1);
                Propagation::Stop
            }
            OverlayEvent::Key(_) => Propagation::Propagate,
            OverlayEvent::EntryClicked(position) => {
                self.activate(host, position);
                Propagation::Stop
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The window snapshot of the open session, empty when closed.
    pub fn windows(&self) -> &[WindowRef] {
        self.session
            .as_ref()
            .map(|s| s.windows.as_slice())
            .unwrap_or_default()
    }

    /// Focuses the snapshot entry at `position` and closes the overlay.
    ///
    /// Out-of-range positions are ignored and leave the overlay open.
    fn activate<H>(&mut self, host: &mut H, position: usize)
    where
        H: WindowHost + ChromeHost + ?Sized,
    {
        let Some(&window) = self.windows().get(position) else {
            return;
        };
        let timestamp = host.current_time();
        if let Err(e) = host.activate(window, timestamp) {
            debug!("selector: activating {window} failed: {e}");
        }
        self.hide(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: u64, title: &str) -> WindowInfo {
        WindowInfo {
            window: WindowRef(id),
            title: title.into(),
            window_type: WindowType::Normal,
            minimized: false,
            workspace: 0,
        }
    }

    #[test]
    fn surface_numbers_entries_from_one() {
        // Arrange
        let windows = vec![info(1, "Editor"), info(2, "Terminal")];

        // Act
        let surface = OverlaySurface::build(&windows, &SelectorConfig::default());

        // Assert
        let labels: Vec<&str> = surface.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["1. Editor", "2. Terminal"]);
        assert_eq!(surface.entries[1].window, WindowRef(2));
        assert_eq!(surface.heading, "Windows (2)");
        assert_eq!((surface.width, surface.height), (450, 600));
    }

    #[test]
    fn empty_title_uses_placeholder() {
        // Arrange
        let config = SelectorConfig {
            untitled: "Sin título".into(),
            ..Default::default()
        };

        // Act
        let surface = OverlaySurface::build(&[info(7, "  ")], &config);

        // Assert
        assert_eq!(surface.entries[0].label, "1. Sin título");
    }

    #[test]
    fn keysyms_classify() {
        // Assert
        assert_eq!(OverlayKey::from_keysym("Escape"), OverlayKey::Escape);
        assert_eq!(OverlayKey::from_keysym("4"), OverlayKey::Digit(4));
        assert_eq!(OverlayKey::from_keysym("KP_9"), OverlayKey::Digit(9));
        assert_eq!(OverlayKey::from_keysym("Return"), OverlayKey::Other);
        assert_eq!(OverlayKey::from_keysym("12"), OverlayKey::Other);
    }
}

//! Collaborator traits implemented by the desktop environment.
//!
//! The core never owns windows, actors, surfaces or shortcuts. It asks
//! the host for them through these traits on every call and never
//! caches what it receives beyond the current handler.

use crate::effect::EffectDescriptor;
use crate::selector::OverlaySurface;

/// Result type for host calls.
pub type HostResult<T> = Result<T, HostError>;

/// Failures reported by the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The window (or its actor) was destroyed between lookup and use.
    #[error("window {0} no longer exists")]
    WindowGone(WindowRef),
    /// The overlay surface was already destroyed.
    #[error("overlay surface {0:?} no longer exists")]
    SurfaceGone(SurfaceHandle),
    /// The shortcut table refused a registration.
    #[error("shortcut {name:?} rejected: {reason}")]
    ShortcutRejected { name: String, reason: String },
    #[error("{0}")]
    Other(String),
}

/// Opaque host identifier for a window surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowRef(pub u64);

impl std::fmt::Display for WindowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Window manager classification of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Normal,
    Dialog,
    Utility,
    Other,
}

/// One row of the host's window enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub window: WindowRef,
    pub title: String,
    pub window_type: WindowType,
    pub minimized: bool,
    /// Index of the workspace the window lives on.
    pub workspace: usize,
}

/// Where an effect is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    Window(WindowRef),
    /// The root UI group covering the whole desktop.
    Desktop,
}

/// Handle to an overlay surface placed in the chrome layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Handle to a key-press subscription on an overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Handle to a registered global shortcut action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortcutHandle(pub u64);

/// Shell modes in which a shortcut fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionScope {
    pub normal: bool,
    pub overview: bool,
}

impl Default for ActionScope {
    fn default() -> Self {
        Self {
            normal: true,
            overview: true,
        }
    }
}

/// Window enumeration, focus and activation.
pub trait WindowHost {
    /// Returns all window actors in stacking order. Queried fresh each call.
    fn list_windows(&self) -> Vec<WindowInfo>;

    /// Returns the window holding keyboard focus, if any.
    fn focused_window(&self) -> Option<WindowRef>;

    /// Returns the index of the active workspace.
    fn active_workspace(&self) -> usize;

    /// Gives focus to `window`.
    fn activate(&mut self, window: WindowRef, timestamp: u32) -> HostResult<()>;

    /// Current event timestamp.
    fn current_time(&self) -> u32;
}

/// Compositor effect attachment.
pub trait EffectHost {
    fn attach_effect(
        &mut self,
        target: EffectTarget,
        name: &str,
        effect: EffectDescriptor,
    ) -> HostResult<()>;

    fn detach_effect(&mut self, target: EffectTarget, name: &str) -> HostResult<()>;

    fn has_effect(&self, target: EffectTarget, name: &str) -> bool;
}

/// Per-window scratch metadata that lives as long as the host process.
pub trait ScratchHost {
    fn window_scratch(&self, window: WindowRef, key: &str) -> Option<String>;

    fn set_window_scratch(&mut self, window: WindowRef, key: &str, value: String) -> HostResult<()>;

    fn clear_window_scratch(&mut self, window: WindowRef, key: &str);
}

/// Placement of transient UI in the top-level chrome layer.
pub trait ChromeHost {
    fn add_overlay_surface(&mut self, surface: &OverlaySurface) -> HostResult<SurfaceHandle>;

    fn destroy_overlay_surface(&mut self, surface: SurfaceHandle);

    fn set_input_focus(&mut self, surface: SurfaceHandle) -> HostResult<()>;

    /// Routes key presses on `surface` to the core until disconnected.
    fn connect_key_press(&mut self, surface: SurfaceHandle) -> HostResult<SubscriptionHandle>;

    fn disconnect(&mut self, surface: SurfaceHandle, subscription: SubscriptionHandle);
}

/// Global keyboard shortcut table.
pub trait ShortcutHost {
    fn register_action(
        &mut self,
        name: &str,
        accelerators: &[String],
        scope: ActionScope,
    ) -> HostResult<ShortcutHandle>;

    fn unregister_action(&mut self, handle: ShortcutHandle);
}

/// Everything the extension needs from the desktop.
pub trait Host: WindowHost + EffectHost + ScratchHost + ChromeHost + ShortcutHost {}

impl<T> Host for T where T: WindowHost + EffectHost + ScratchHost + ChromeHost + ShortcutHost {}

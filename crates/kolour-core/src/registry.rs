//! Per-window grayscale bookkeeping.
//!
//! The registry is the only place that decides which window carries
//! which grayscale level. It keeps two records in step:
//!
//! - the in-memory handle table, mirroring what is attached right now;
//! - the host scratch slot [`SCRATCH_KEY`] on each window, remembering
//!   the user's last choice across an extension disable/enable cycle.
//!
//! [`WindowEffectRegistry::teardown_all`] clears the first and leaves the
//! second, which is what lets [`WindowEffectRegistry::restore_all`] bring
//! effects back after a reload.

use std::collections::HashMap;

use log::{debug, warn};

use crate::effect::{
    EffectBackend, EffectDescriptor, EffectHandle, EffectLevel, WINDOW_EFFECT_NAME,
};
use crate::host::{
    EffectHost, EffectTarget, HostError, HostResult, ScratchHost, WindowHost, WindowRef,
};

/// Scratch key holding the persisted level name.
pub const SCRATCH_KEY: &str = "kolour-grayscale-level";

/// Tracks the grayscale effect applied to each window.
#[derive(Debug, Default)]
pub struct WindowEffectRegistry {
    handles: HashMap<WindowRef, EffectHandle>,
    backend: EffectBackend,
}

impl WindowEffectRegistry {
    pub fn new(backend: EffectBackend) -> Self {
        Self {
            handles: HashMap::new(),
            backend,
        }
    }

    /// Applies `level` to `window`, replacing any level already there.
    ///
    /// Returns `None` if the previous effect could not be detached (the
    /// old handle and level stay in place) or if the attach failed. The
    /// persisted level is only cleared when the window itself is gone.
    pub fn apply<H>(
        &mut self,
        host: &mut H,
        window: WindowRef,
        level: EffectLevel,
    ) -> Option<EffectHandle>
    where
        H: EffectHost + ScratchHost + ?Sized,
    {
        let target = EffectTarget::Window(window);
        if let Err(e) = detach_window_effect(host, target) {
            warn!("grayscale {level} on {window} skipped, old effect still attached: {e}");
            return None;
        }
        self.handles.remove(&window);

        let effect = EffectDescriptor::for_level(level, self.backend);
        if let Err(e) = host.attach_effect(target, WINDOW_EFFECT_NAME, effect) {
            debug!("grayscale {level} on {window} skipped: {e}");
            if matches!(e, HostError::WindowGone(_)) {
                host.clear_window_scratch(window, SCRATCH_KEY);
            }
            return None;
        }

        let handle = EffectHandle::new(window, level);
        self.handles.insert(window, handle);
        if let Err(e) = host.set_window_scratch(window, SCRATCH_KEY, level.as_str().into()) {
            debug!("could not persist level for {window}: {e}");
        }
        debug!("+grayscale {level} on {window}");
        Some(handle)
    }

    /// Applies `level` to the focused window. No focused window is a no-op.
    pub fn apply_to_focused<H>(&mut self, host: &mut H, level: EffectLevel) -> Option<EffectHandle>
    where
        H: WindowHost + EffectHost + ScratchHost + ?Sized,
    {
        let window = host.focused_window()?;
        self.apply(host, window, level)
    }

    /// Removes the effect and the persisted level from `window`.
    ///
    /// A window whose effect cannot be detached keeps its handle and
    /// level. Returns `true` if the window was cleared.
    pub fn remove<H>(&mut self, host: &mut H, window: WindowRef) -> bool
    where
        H: EffectHost + ScratchHost + ?Sized,
    {
        let target = EffectTarget::Window(window);
        let attached =
            self.handles.contains_key(&window) || host.has_effect(target, WINDOW_EFFECT_NAME);
        if attached {
            if let Err(e) = detach_window_effect(host, target) {
                warn!("could not remove grayscale from {window}: {e}");
                return false;
            }
            debug!("-grayscale on {window}");
        }
        self.handles.remove(&window);
        host.clear_window_scratch(window, SCRATCH_KEY);
        attached
    }

    /// Removes every applied effect from the live windows.
    ///
    /// Windows with no handle, no attached effect and no persisted level
    /// are left alone. Returns how many windows were cleared.
    pub fn remove_all<H>(&mut self, host: &mut H) -> usize
    where
        H: WindowHost + EffectHost + ScratchHost + ?Sized,
    {
        let mut cleared = 0;
        let mut live = Vec::new();
        for info in host.list_windows() {
            let window = info.window;
            live.push(window);
            let touched = self.handles.contains_key(&window)
                || host.has_effect(EffectTarget::Window(window), WINDOW_EFFECT_NAME)
                || host.window_scratch(window, SCRATCH_KEY).is_some();
            if !touched {
                continue;
            }
            self.remove(host, window);
            if !self.handles.contains_key(&window) {
                cleared += 1;
            }
        }
        // Handles of windows that are gone have nothing left to detach.
        self.handles.retain(|window, _| live.contains(window));
        cleared
    }

    /// Re-attaches effects for every live window with a persisted level.
    ///
    /// Returns how many windows were restored.
    pub fn restore_all<H>(&mut self, host: &mut H) -> usize
    where
        H: WindowHost + EffectHost + ScratchHost + ?Sized,
    {
        let mut restored = 0;
        for info in host.list_windows() {
            let window = info.window;
            let Some(stored) = host.window_scratch(window, SCRATCH_KEY) else {
                continue;
            };
            match stored.parse::<EffectLevel>() {
                Ok(level) => {
                    if self.apply(host, window, level).is_some() {
                        restored += 1;
                    }
                }
                Err(e) => {
                    warn!("dropping persisted level on {window}: {e}");
                    host.clear_window_scratch(window, SCRATCH_KEY);
                }
            }
        }
        restored
    }

    /// Detaches every window effect but keeps the persisted levels.
    pub fn teardown_all<H>(&mut self, host: &mut H)
    where
        H: WindowHost + EffectHost + ?Sized,
    {
        for info in host.list_windows() {
            let target = EffectTarget::Window(info.window);
            if host.has_effect(target, WINDOW_EFFECT_NAME) {
                detach_quietly(host, target);
            }
        }
        self.handles.clear();
    }

    /// Drops the handle of a window the host reports as destroyed.
    pub fn forget(&mut self, window: WindowRef) {
        self.handles.remove(&window);
    }

    /// Returns the handle for `window`, if an effect is applied.
    pub fn handle(&self, window: WindowRef) -> Option<&EffectHandle> {
        self.handles.get(&window)
    }

    /// Returns the number of windows with an applied effect.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Detaches the window effect, treating a vanished window as already clean.
fn detach_window_effect<H>(host: &mut H, target: EffectTarget) -> HostResult<()>
where
    H: EffectHost + ?Sized,
{
    match host.detach_effect(target, WINDOW_EFFECT_NAME) {
        Ok(()) | Err(HostError::WindowGone(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

fn detach_quietly<H: EffectHost + ?Sized>(host: &mut H, target: EffectTarget) {
    if let Err(e) = detach_window_effect(host, target) {
        warn!("detach on {target:?} failed: {e}");
    }
}

use std::collections::{HashMap, HashSet};

use kolour_core::host::{
    ActionScope, ChromeHost, EffectHost, EffectTarget, ScratchHost, ShortcutHandle, ShortcutHost,
    SubscriptionHandle, SurfaceHandle, WindowHost,
};
use kolour_core::{
    EffectDescriptor, HostError, HostResult, OverlaySurface, WindowInfo, WindowRef, WindowType,
};
use log::debug;

/// A window living in the headless desktop.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub info: WindowInfo,
    /// Effects attached to the window actor, by name.
    pub effects: HashMap<String, EffectDescriptor>,
    scratch: HashMap<String, String>,
}

/// An overlay surface currently placed in the chrome layer.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub handle: SurfaceHandle,
    pub surface: OverlaySurface,
    pub key_subscription: Option<SubscriptionHandle>,
}

/// A shortcut accepted by the headless shortcut table.
#[derive(Debug, Clone)]
pub struct RegisteredShortcut {
    pub handle: ShortcutHandle,
    pub name: String,
    pub accelerators: Vec<String>,
    pub scope: ActionScope,
}

/// In-memory desktop session.
#[derive(Debug)]
pub struct HeadlessDesktop {
    windows: Vec<HeadlessWindow>,
    desktop_effects: HashMap<String, EffectDescriptor>,
    focused: Option<WindowRef>,
    active_workspace: usize,
    surfaces: Vec<HeadlessSurface>,
    input_focus: Option<SurfaceHandle>,
    shortcuts: Vec<RegisteredShortcut>,
    rejected_shortcuts: HashSet<String>,
    failing_attach: HashSet<WindowRef>,
    failing_detach: HashSet<WindowRef>,
    activations: Vec<(WindowRef, u32)>,
    attach_calls: usize,
    surfaces_created: usize,
    time: u32,
    next_id: u64,
}

impl Default for HeadlessDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDesktop {
    /// Creates an empty desktop with workspace 0 active.
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            desktop_effects: HashMap::new(),
            focused: None,
            active_workspace: 0,
            surfaces: Vec::new(),
            input_focus: None,
            shortcuts: Vec::new(),
            rejected_shortcuts: HashSet::new(),
            failing_attach: HashSet::new(),
            failing_detach: HashSet::new(),
            activations: Vec::new(),
            attach_calls: 0,
            surfaces_created: 0,
            time: 1,
            next_id: 1,
        }
    }

    /// Opens a normal window on the active workspace.
    pub fn open_window(&mut self, title: &str) -> WindowRef {
        let workspace = self.active_workspace;
        self.open_window_with(title, WindowType::Normal, workspace)
    }

    /// Opens a window of the given type on `workspace`.
    pub fn open_window_with(
        &mut self,
        title: &str,
        window_type: WindowType,
        workspace: usize,
    ) -> WindowRef {
        let window = WindowRef(self.next_id());
        self.windows.push(HeadlessWindow {
            info: WindowInfo {
                window,
                title: title.into(),
                window_type,
                minimized: false,
                workspace,
            },
            effects: HashMap::new(),
            scratch: HashMap::new(),
        });
        window
    }

    /// Destroys a window together with its effects and scratch data.
    pub fn close_window(&mut self, window: WindowRef) {
        self.windows.retain(|w| w.info.window != window);
        if self.focused == Some(window) {
            self.focused = None;
        }
    }

    /// Moves keyboard focus to `window` (or clears it).
    pub fn focus(&mut self, window: Option<WindowRef>) {
        self.focused = window;
    }

    pub fn set_minimized(&mut self, window: WindowRef, minimized: bool) {
        if let Some(w) = self.window_mut(window) {
            w.info.minimized = minimized;
        }
    }

    pub fn set_title(&mut self, window: WindowRef, title: &str) {
        if let Some(w) = self.window_mut(window) {
            w.info.title = title.into();
        }
    }

    pub fn set_active_workspace(&mut self, workspace: usize) {
        self.active_workspace = workspace;
    }

    /// Advances the event clock used for activation timestamps.
    pub fn tick(&mut self) {
        self.time += 1;
    }

    /// Makes the shortcut table reject `name`.
    pub fn reject_shortcut(&mut self, name: &str) {
        self.rejected_shortcuts.insert(name.into());
    }

    /// Makes effect attachments on `window` fail with `HostError::Other`.
    pub fn fail_attach(&mut self, window: WindowRef) {
        self.failing_attach.insert(window);
    }

    /// Makes effect detachments on `window` fail with `HostError::Other`.
    pub fn fail_detach(&mut self, window: WindowRef) {
        self.failing_detach.insert(window);
    }

    /// Lifts every injected effect failure.
    pub fn clear_failures(&mut self) {
        self.failing_attach.clear();
        self.failing_detach.clear();
    }

    pub fn window(&self, window: WindowRef) -> Option<&HeadlessWindow> {
        self.windows.iter().find(|w| w.info.window == window)
    }

    /// Returns the effect attached to `window` under `name`.
    pub fn window_effect(&self, window: WindowRef, name: &str) -> Option<&EffectDescriptor> {
        self.window(window).and_then(|w| w.effects.get(name))
    }

    /// Number of effects attached to `window`, under any name.
    pub fn effect_count(&self, window: WindowRef) -> usize {
        self.window(window).map_or(0, |w| w.effects.len())
    }

    pub fn desktop_effect(&self, name: &str) -> Option<&EffectDescriptor> {
        self.desktop_effects.get(name)
    }

    pub fn surfaces(&self) -> &[HeadlessSurface] {
        &self.surfaces
    }

    /// Total overlay surfaces ever created.
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    pub fn input_focus(&self) -> Option<SurfaceHandle> {
        self.input_focus
    }

    pub fn shortcuts(&self) -> &[RegisteredShortcut] {
        &self.shortcuts
    }

    pub fn shortcut(&self, name: &str) -> Option<&RegisteredShortcut> {
        self.shortcuts.iter().find(|s| s.name == name)
    }

    /// Every successful `activate` call with its timestamp.
    pub fn activations(&self) -> &[(WindowRef, u32)] {
        &self.activations
    }

    /// Total successful effect attachments.
    pub fn attach_calls(&self) -> usize {
        self.attach_calls
    }

    fn window_mut(&mut self, window: WindowRef) -> Option<&mut HeadlessWindow> {
        self.windows.iter_mut().find(|w| w.info.window == window)
    }

    fn effects_mut(
        &mut self,
        target: EffectTarget,
    ) -> HostResult<&mut HashMap<String, EffectDescriptor>> {
        match target {
            EffectTarget::Desktop => Ok(&mut self.desktop_effects),
            EffectTarget::Window(window) => self
                .window_mut(window)
                .map(|w| &mut w.effects)
                .ok_or(HostError::WindowGone(window)),
        }
    }

    fn surface_mut(&mut self, handle: SurfaceHandle) -> HostResult<&mut HeadlessSurface> {
        self.surfaces
            .iter_mut()
            .find(|s| s.handle == handle)
            .ok_or(HostError::SurfaceGone(handle))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl WindowHost for HeadlessDesktop {
    fn list_windows(&self) -> Vec<WindowInfo> {
        self.windows.iter().map(|w| w.info.clone()).collect()
    }

    fn focused_window(&self) -> Option<WindowRef> {
        self.focused
    }

    fn active_workspace(&self) -> usize {
        self.active_workspace
    }

    fn activate(&mut self, window: WindowRef, timestamp: u32) -> HostResult<()> {
        if self.window(window).is_none() {
            return Err(HostError::WindowGone(window));
        }
        self.focused = Some(window);
        self.activations.push((window, timestamp));
        Ok(())
    }

    fn current_time(&self) -> u32 {
        self.time
    }
}

impl EffectHost for HeadlessDesktop {
    fn attach_effect(
        &mut self,
        target: EffectTarget,
        name: &str,
        effect: EffectDescriptor,
    ) -> HostResult<()> {
        if let EffectTarget::Window(window) = target
            && self.failing_attach.contains(&window)
        {
            return Err(HostError::Other(format!("attach refused on {window}")));
        }
        let effects = self.effects_mut(target)?;
        if effects.contains_key(name) {
            return Err(HostError::Other(format!("effect {name:?} already attached")));
        }
        effects.insert(name.into(), effect);
        self.attach_calls += 1;
        Ok(())
    }

    fn detach_effect(&mut self, target: EffectTarget, name: &str) -> HostResult<()> {
        if let EffectTarget::Window(window) = target
            && self.failing_detach.contains(&window)
        {
            return Err(HostError::Other(format!("detach refused on {window}")));
        }
        self.effects_mut(target)?.remove(name);
        Ok(())
    }

    fn has_effect(&self, target: EffectTarget, name: &str) -> bool {
        match target {
            EffectTarget::Desktop => self.desktop_effects.contains_key(name),
            EffectTarget::Window(window) => self.window_effect(window, name).is_some(),
        }
    }
}

impl ScratchHost for HeadlessDesktop {
    fn window_scratch(&self, window: WindowRef, key: &str) -> Option<String> {
        self.window(window).and_then(|w| w.scratch.get(key).cloned())
    }

    fn set_window_scratch(&mut self, window: WindowRef, key: &str, value: String) -> HostResult<()> {
        let w = self.window_mut(window).ok_or(HostError::WindowGone(window))?;
        w.scratch.insert(key.into(), value);
        Ok(())
    }

    fn clear_window_scratch(&mut self, window: WindowRef, key: &str) {
        if let Some(w) = self.window_mut(window) {
            w.scratch.remove(key);
        }
    }
}

impl ChromeHost for HeadlessDesktop {
    fn add_overlay_surface(&mut self, surface: &OverlaySurface) -> HostResult<SurfaceHandle> {
        let handle = SurfaceHandle(self.next_id());
        self.surfaces.push(HeadlessSurface {
            handle,
            surface: surface.clone(),
            key_subscription: None,
        });
        self.surfaces_created += 1;
        debug!("headless: surface {handle:?} with {} entries", surface.entries.len());
        Ok(handle)
    }

    fn destroy_overlay_surface(&mut self, surface: SurfaceHandle) {
        self.surfaces.retain(|s| s.handle != surface);
        if self.input_focus == Some(surface) {
            self.input_focus = None;
        }
    }

    fn set_input_focus(&mut self, surface: SurfaceHandle) -> HostResult<()> {
        self.surface_mut(surface)?;
        self.input_focus = Some(surface);
        Ok(())
    }

    fn connect_key_press(&mut self, surface: SurfaceHandle) -> HostResult<SubscriptionHandle> {
        let subscription = SubscriptionHandle(self.next_id);
        let s = self.surface_mut(surface)?;
        s.key_subscription = Some(subscription);
        self.next_id += 1;
        Ok(subscription)
    }

    fn disconnect(&mut self, surface: SurfaceHandle, subscription: SubscriptionHandle) {
        if let Ok(s) = self.surface_mut(surface)
            && s.key_subscription == Some(subscription)
        {
            s.key_subscription = None;
        }
    }
}

impl ShortcutHost for HeadlessDesktop {
    fn register_action(
        &mut self,
        name: &str,
        accelerators: &[String],
        scope: ActionScope,
    ) -> HostResult<ShortcutHandle> {
        if self.rejected_shortcuts.contains(name) || self.shortcut(name).is_some() {
            return Err(HostError::ShortcutRejected {
                name: name.into(),
                reason: "name already in use".into(),
            });
        }
        let handle = ShortcutHandle(self.next_id());
        self.shortcuts.push(RegisteredShortcut {
            handle,
            name: name.into(),
            accelerators: accelerators.to_vec(),
            scope,
        });
        Ok(handle)
    }

    fn unregister_action(&mut self, handle: ShortcutHandle) {
        self.shortcuts.retain(|s| s.handle != handle);
    }
}

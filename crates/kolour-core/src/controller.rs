//! Shortcut wiring and the enable/disable lifecycle.

use log::{debug, info, warn};

use crate::Action;
use crate::config::{self, Config, Keybinding};
use crate::effect::EffectLevel;
use crate::global::GlobalEffectToggle;
use crate::host::{ActionScope, Host, ShortcutHandle, WindowRef};
use crate::keys;
use crate::registry::WindowEffectRegistry;
use crate::selector::{OverlayEvent, Propagation, SelectorOverlay};

/// A shortcut the host accepted.
#[derive(Debug, Clone)]
struct ActiveBinding {
    name: String,
    action: Action,
    handle: ShortcutHandle,
}

/// Everything that lives between `enable()` and `disable()`.
///
/// The registry, the desktop toggle and the selector never talk to each
/// other; the controller is the only thing that routes actions to them.
pub struct ExtensionController {
    registry: WindowEffectRegistry,
    global: GlobalEffectToggle,
    selector: SelectorOverlay,
    bindings: Vec<ActiveBinding>,
}

impl ExtensionController {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: WindowEffectRegistry::new(config.effects.backend),
            global: GlobalEffectToggle::new(config.global.level, config.effects.backend),
            selector: SelectorOverlay::new(config.selector.clone()),
            bindings: Vec::new(),
        }
    }

    /// Registers shortcuts and re-attaches persisted window effects.
    pub fn start<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        keybindings: &[Keybinding],
        scope: ActionScope,
    ) {
        self.register_shortcuts(host, keybindings, scope);
        let restored = self.registry.restore_all(host);
        if restored > 0 {
            info!("restored grayscale on {restored} window(s)");
        }
    }

    /// Unregisters shortcuts and detaches everything this session attached.
    ///
    /// Persisted window levels are kept so the next `start` restores them.
    pub fn shutdown<H: Host + ?Sized>(&mut self, host: &mut H) {
        for binding in self.bindings.drain(..) {
            host.unregister_action(binding.handle);
        }
        self.selector.hide(host);
        self.registry.teardown_all(host);
        self.global.teardown(host);
    }

    /// Executes a user-triggered action.
    pub fn handle_action<H: Host + ?Sized>(&mut self, host: &mut H, action: Action) {
        debug!("action {action}");
        match action {
            Action::Grayscale(level) => {
                self.registry.apply_to_focused(host, level);
            }
            Action::RemoveEffects => {
                self.registry.remove_all(host);
            }
            Action::ToggleSelector => {
                self.selector.show(host);
            }
            Action::ToggleGlobalGrayscale => {
                self.global.toggle(host);
            }
        }
    }

    /// Runs the action bound to the host shortcut `name`.
    ///
    /// Returns `false` for names this controller did not register.
    pub fn dispatch_shortcut<H: Host + ?Sized>(&mut self, host: &mut H, name: &str) -> bool {
        let Some(action) = self
            .bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.action)
        else {
            return false;
        };
        self.handle_action(host, action);
        true
    }

    /// Routes a key press or click from the selector overlay.
    pub fn handle_overlay_event<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: OverlayEvent,
    ) -> Propagation {
        self.selector.handle_event(host, event)
    }

    /// Forgets the effect handle of a destroyed window.
    pub fn window_closed(&mut self, window: WindowRef) {
        self.registry.forget(window);
    }

    /// Changes the desktop grayscale intensity.
    pub fn set_global_level<H: Host + ?Sized>(&mut self, host: &mut H, level: EffectLevel) {
        self.global.set_level(host, level);
    }

    pub fn registry(&self) -> &WindowEffectRegistry {
        &self.registry
    }

    pub fn global(&self) -> &GlobalEffectToggle {
        &self.global
    }

    pub fn selector(&self) -> &SelectorOverlay {
        &self.selector
    }

    /// Names of the shortcuts currently registered with the host.
    pub fn registered_shortcuts(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }

    /// Registers one host action per configured action.
    ///
    /// Keybindings for the same action are merged into one accelerator
    /// list. Invalid keys and host rejections are logged and skipped;
    /// they never stop the remaining actions from registering.
    fn register_shortcuts<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        keybindings: &[Keybinding],
        scope: ActionScope,
    ) {
        for action in Action::ALL {
            let accelerators: Vec<String> = keybindings
                .iter()
                .filter(|b| b.action == action)
                .filter_map(|b| {
                    let accel = keys::accelerator(b);
                    if accel.is_none() {
                        warn!("unknown key name {:?} for {action}", b.key);
                    }
                    accel
                })
                .collect();
            if accelerators.is_empty() {
                continue;
            }

            let name = action.name();
            match host.register_action(&name, &accelerators, scope) {
                Ok(handle) => {
                    debug!("shortcut {name} -> {}", accelerators.join(", "));
                    self.bindings.push(ActiveBinding {
                        name,
                        action,
                        handle,
                    });
                }
                Err(e) => warn!("failed to register shortcut {name}: {e}"),
            }
        }
    }
}

/// The object handed to the desktop: one `enable`/`disable` pair.
///
/// A fresh [`ExtensionController`] is built on every `enable` and
/// dropped on `disable`; no state outlives it except the per-window
/// scratch levels stored in the host.
pub struct Extension {
    config: Config,
    keybindings: Vec<Keybinding>,
    controller: Option<ExtensionController>,
}

impl Extension {
    pub fn new(config: Config, keybindings: Vec<Keybinding>) -> Self {
        Self {
            config,
            keybindings,
            controller: None,
        }
    }

    /// Loads `config.toml` and `keybindings.toml`, falling back to defaults.
    ///
    /// The file logger is installed from the loaded config before any
    /// load error is reported, so a broken `config.toml` still lands in
    /// the log.
    pub fn from_disk() -> Self {
        let (config, config_error) = config::load_unlogged();
        crate::log::init(&config.log);
        if let Some(e) = config_error {
            warn!("{e}; using defaults");
        }
        Self::new(config, config::load_keybindings())
    }

    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.controller.is_some() {
            warn!("enable called twice without disable");
            return;
        }
        let mut controller = ExtensionController::new(&self.config);
        controller.start(host, &self.keybindings, self.config.shortcuts.scope());
        self.controller = Some(controller);
        info!("kolour enabled");
    }

    pub fn disable<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(mut controller) = self.controller.take() else {
            return;
        };
        controller.shutdown(host);
        info!("kolour disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.is_some()
    }

    /// The live controller, present between `enable` and `disable`.
    pub fn controller(&self) -> Option<&ExtensionController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut ExtensionController> {
        self.controller.as_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

use log::debug;

use crate::effect::{EffectBackend, EffectDescriptor, EffectLevel, GLOBAL_EFFECT_NAME};
use crate::host::{EffectHost, EffectTarget};

/// Desktop-wide grayscale toggle.
///
/// Independent of the per-window registry: a window can carry its own
/// level and still be covered by the desktop effect.
#[derive(Debug)]
pub struct GlobalEffectToggle {
    level: EffectLevel,
    backend: EffectBackend,
    active: bool,
}

impl GlobalEffectToggle {
    pub fn new(level: EffectLevel, backend: EffectBackend) -> Self {
        Self {
            level,
            backend,
            active: false,
        }
    }

    /// Flips the desktop effect. Returns `true` if it is now on.
    ///
    /// The host's attachment state decides the direction, so a desktop
    /// effect left behind by someone else is switched off rather than
    /// stacked.
    pub fn toggle<H: EffectHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if host.has_effect(EffectTarget::Desktop, GLOBAL_EFFECT_NAME) {
            self.switch_off(host);
        } else {
            self.switch_on(host);
        }
        self.active
    }

    /// Changes the intensity, re-attaching the effect if it is on.
    pub fn set_level<H: EffectHost + ?Sized>(&mut self, host: &mut H, level: EffectLevel) {
        self.level = level;
        if self.active {
            self.switch_off(host);
            self.switch_on(host);
        }
    }

    /// Removes the desktop effect if this toggle turned it on.
    pub fn teardown<H: EffectHost + ?Sized>(&mut self, host: &mut H) {
        if self.active {
            self.switch_off(host);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level(&self) -> EffectLevel {
        self.level
    }

    fn switch_on<H: EffectHost + ?Sized>(&mut self, host: &mut H) {
        let effect = EffectDescriptor::for_level(self.level, self.backend);
        match host.attach_effect(EffectTarget::Desktop, GLOBAL_EFFECT_NAME, effect) {
            Ok(()) => {
                self.active = true;
                debug!("+desktop grayscale {}", self.level);
            }
            Err(e) => debug!("desktop grayscale not attached: {e}"),
        }
    }

    fn switch_off<H: EffectHost + ?Sized>(&mut self, host: &mut H) {
        if let Err(e) = host.detach_effect(EffectTarget::Desktop, GLOBAL_EFFECT_NAME) {
            debug!("desktop grayscale detach failed: {e}");
        }
        self.active = false;
        debug!("-desktop grayscale");
    }
}

pub mod action;
pub mod config;
pub mod controller;
pub mod effect;
pub mod global;
pub mod host;
pub mod keys;
pub mod log;
pub mod registry;
pub mod selector;

pub use action::Action;
pub use controller::{Extension, ExtensionController};
pub use effect::{EffectBackend, EffectDescriptor, EffectHandle, EffectLevel};
pub use global::GlobalEffectToggle;
pub use host::{Host, HostError, HostResult, WindowInfo, WindowRef, WindowType};
pub use registry::WindowEffectRegistry;
pub use selector::{OverlayEvent, OverlayKey, OverlaySurface, Propagation, SelectorOverlay};

//! In-memory desktop implementing every Kolour host trait.
//!
//! `HeadlessDesktop` keeps windows, effect attachments, scratch
//! metadata, shortcuts and overlay surfaces in plain collections so the
//! core can run without a compositor. It also records the calls the core
//! makes (activations, attach counts) for inspection.

mod desktop;

pub use desktop::{HeadlessDesktop, HeadlessSurface, HeadlessWindow, RegisteredShortcut};

//! Shortcut registration and the enable/disable lifecycle.

use kolour_core::config::{Config, Keybinding, Modifier, keybinding};
use kolour_core::effect::WINDOW_EFFECT_NAME;
use kolour_core::{Action, EffectLevel, Extension};
use kolour_headless::HeadlessDesktop;

#[test]
fn enable_registers_all_seven_actions() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let mut ext = Extension::new(Config::default(), keybinding::defaults());

    // Act
    ext.enable(&mut desktop);

    // Assert
    let names: Vec<&str> = desktop.shortcuts().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "grayscale-25",
            "grayscale-50",
            "grayscale-75",
            "grayscale-100",
            "remove-effects",
            "window-group",
            "global-grayscale",
        ]
    );
    let selector = desktop.shortcut("window-group").unwrap();
    assert_eq!(selector.accelerators, vec!["<Ctrl><Alt>G".to_string()]);
    assert!(selector.scope.normal && selector.scope.overview);
}

#[test]
fn rejected_shortcut_does_not_block_others() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    desktop.reject_shortcut("grayscale-50");
    let mut ext = Extension::new(Config::default(), keybinding::defaults());

    // Act
    ext.enable(&mut desktop);

    // Assert
    assert_eq!(desktop.shortcuts().len(), 6);
    let registered = ext.controller().unwrap().registered_shortcuts();
    assert!(!registered.contains(&"grayscale-50"));
    assert!(registered.contains(&"grayscale-100"));
}

#[test]
fn invalid_key_is_skipped() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let mut bindings = keybinding::defaults();
    bindings.retain(|b| b.action != Action::RemoveEffects);
    bindings.push(Keybinding {
        action: Action::RemoveEffects,
        key: "NotAKey".into(),
        modifiers: vec![Modifier::Ctrl],
    });
    let mut ext = Extension::new(Config::default(), bindings);

    // Act
    ext.enable(&mut desktop);

    // Assert
    assert!(desktop.shortcut("remove-effects").is_none());
    assert_eq!(desktop.shortcuts().len(), 6);
}

#[test]
fn bindings_for_one_action_share_a_registration() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let mut bindings = keybinding::defaults();
    bindings.push(Keybinding {
        action: Action::ToggleSelector,
        key: "Tab".into(),
        modifiers: vec![Modifier::Super],
    });
    let mut ext = Extension::new(Config::default(), bindings);

    // Act
    ext.enable(&mut desktop);

    // Assert
    let selector = desktop.shortcut("window-group").unwrap();
    assert_eq!(
        selector.accelerators,
        vec!["<Ctrl><Alt>G".to_string(), "<Super>Tab".to_string()]
    );
}

#[test]
fn disable_unregisters_only_accepted_shortcuts() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    desktop.reject_shortcut("global-grayscale");
    let mut ext = Extension::new(Config::default(), keybinding::defaults());
    ext.enable(&mut desktop);

    // Act
    ext.disable(&mut desktop);

    // Assert
    assert!(desktop.shortcuts().is_empty());
    assert!(!ext.is_enabled());
}

#[test]
fn dispatch_runs_bound_action() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let w = desktop.open_window("Editor");
    desktop.focus(Some(w));
    let mut ext = Extension::new(Config::default(), keybinding::defaults());
    ext.enable(&mut desktop);

    // Act
    let handled = ext
        .controller_mut()
        .unwrap()
        .dispatch_shortcut(&mut desktop, "grayscale-75");
    let unknown = ext
        .controller_mut()
        .unwrap()
        .dispatch_shortcut(&mut desktop, "retile");

    // Assert
    assert!(handled);
    assert!(!unknown);
    let level = ext.controller().unwrap().registry().handle(w).map(|h| h.level);
    assert_eq!(level, Some(EffectLevel::ThreeQuarter));
    assert!(desktop.window_effect(w, WINDOW_EFFECT_NAME).is_some());
}

#[test]
fn rejected_shortcut_cannot_be_dispatched() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    desktop.reject_shortcut("remove-effects");
    let mut ext = Extension::new(Config::default(), keybinding::defaults());
    ext.enable(&mut desktop);

    // Act
    let handled = ext
        .controller_mut()
        .unwrap()
        .dispatch_shortcut(&mut desktop, "remove-effects");

    // Assert
    assert!(!handled);
}

#[test]
fn second_enable_is_ignored() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let mut ext = Extension::new(Config::default(), keybinding::defaults());
    ext.enable(&mut desktop);

    // Act
    ext.enable(&mut desktop);

    // Assert
    assert_eq!(desktop.shortcuts().len(), 7);
}

#[test]
fn configured_scope_is_passed_to_host() {
    // Arrange
    let mut desktop = HeadlessDesktop::new();
    let mut config = Config::default();
    config.shortcuts.overview = false;
    let mut ext = Extension::new(config, keybinding::defaults());

    // Act
    ext.enable(&mut desktop);

    // Assert
    let scope = desktop.shortcut("grayscale-25").unwrap().scope;
    assert!(scope.normal);
    assert!(!scope.overview);
}

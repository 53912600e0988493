use kswitcher_core::{ChordModifier, VirtualKey};

use super::support::{Call, FakeHost, FakePlatform, WINDOW_A};
use crate::input::{
    CorrectionSettings, InputInterceptor, KeyEvent, KeyObserver, LayoutShortcut, ShortcutLatch,
};

fn alt_shift() -> (FakePlatform, ShortcutLatch<FakePlatform>) {
    let platform = FakePlatform::focused(WINDOW_A);
    let latch = ShortcutLatch::new(platform.clone(), ChordModifier::Alt, ChordModifier::Shift);
    (platform, latch)
}

fn down(latch: &mut ShortcutLatch<FakePlatform>, key: VirtualKey) -> bool {
    latch.on_key(&KeyEvent::down(key)).should_swallow()
}

fn up(latch: &mut ShortcutLatch<FakePlatform>, key: VirtualKey) -> bool {
    latch.on_key(&KeyEvent::up(key)).should_swallow()
}

#[test]
fn chord_fires_in_either_order() {
    let (platform, mut latch) = alt_shift();

    assert!(!down(&mut latch, VirtualKey::LMENU));
    assert!(down(&mut latch, VirtualKey::LSHIFT));
    up(&mut latch, VirtualKey::LSHIFT);
    up(&mut latch, VirtualKey::LMENU);

    assert!(!down(&mut latch, VirtualKey::RSHIFT));
    assert!(down(&mut latch, VirtualKey::RMENU));

    assert_eq!(platform.calls(), vec![Call::Layout(WINDOW_A), Call::Layout(WINDOW_A)]);
}

#[test]
fn tapping_the_second_key_twice_fires_twice() {
    let (platform, mut latch) = alt_shift();

    down(&mut latch, VirtualKey::LMENU);
    for _ in 0..2 {
        assert!(down(&mut latch, VirtualKey::LSHIFT));
        assert!(!up(&mut latch, VirtualKey::LSHIFT));
    }

    assert_eq!(platform.layout_requests(), 2);
    assert_eq!(latch.fired(), 2);
}

#[test]
fn autorepeat_does_not_refire() {
    let (platform, mut latch) = alt_shift();

    down(&mut latch, VirtualKey::LMENU);
    assert!(down(&mut latch, VirtualKey::LSHIFT));
    for _ in 0..10 {
        assert!(!down(&mut latch, VirtualKey::LSHIFT));
    }

    assert_eq!(platform.layout_requests(), 1);
    assert!(!latch.is_armed());

    up(&mut latch, VirtualKey::LSHIFT);
    assert!(latch.is_armed());
    assert_eq!(latch.latched(), (true, false));
}

#[test]
fn other_keys_pass_and_do_not_touch_the_latch() {
    let (platform, mut latch) = alt_shift();

    down(&mut latch, VirtualKey::LMENU);
    assert!(!down(&mut latch, VirtualKey::from_ascii(b'a').unwrap()));
    assert!(!down(&mut latch, VirtualKey::LCONTROL));
    assert!(!up(&mut latch, VirtualKey::TAB));

    assert_eq!(latch.latched(), (true, false));
    assert!(platform.calls().is_empty());
}

#[test]
fn release_clears_the_flag() {
    let (platform, mut latch) = alt_shift();

    down(&mut latch, VirtualKey::LMENU);
    up(&mut latch, VirtualKey::LMENU);
    assert!(!down(&mut latch, VirtualKey::LSHIFT));

    assert!(platform.calls().is_empty());
}

#[test]
fn disabled_latch_tracks_but_never_fires() {
    let (platform, mut latch) = alt_shift();
    latch.set_enabled(false);

    down(&mut latch, VirtualKey::LMENU);
    assert!(!down(&mut latch, VirtualKey::LSHIFT));
    assert_eq!(latch.latched(), (true, true));

    latch.set_enabled(true);
    up(&mut latch, VirtualKey::LSHIFT);
    assert!(down(&mut latch, VirtualKey::LSHIFT));
    assert_eq!(platform.layout_requests(), 1);
}

#[test]
fn injected_modifiers_are_ignored() {
    let (platform, mut latch) = alt_shift();

    latch.on_key(&KeyEvent::down(VirtualKey::LMENU).injected());
    latch.on_key(&KeyEvent::down(VirtualKey::LSHIFT).injected());

    assert_eq!(latch.latched(), (false, false));
    assert!(platform.calls().is_empty());
}

#[test]
fn layout_failure_still_consumes_the_chord() {
    let (platform, mut latch) = alt_shift();
    platform.fail_layout();

    down(&mut latch, VirtualKey::LMENU);
    assert!(down(&mut latch, VirtualKey::LSHIFT));
    assert!(!latch.is_armed());
}

#[test]
fn configured_modifiers_are_respected() {
    let platform = FakePlatform::focused(WINDOW_A);
    let mut latch =
        ShortcutLatch::new(platform.clone(), ChordModifier::Control, ChordModifier::Win);

    down(&mut latch, VirtualKey::LMENU);
    assert!(!down(&mut latch, VirtualKey::LSHIFT));
    down(&mut latch, VirtualKey::RCONTROL);
    assert!(down(&mut latch, VirtualKey::LWIN));

    assert_eq!(platform.layout_requests(), 1);
}

#[test]
fn component_enable_disable_and_lifecycle() {
    let host = FakeHost::new();
    let platform = FakePlatform::focused(WINDOW_A);
    let mut shortcut = LayoutShortcut::new(
        platform.clone(),
        ChordModifier::Alt,
        ChordModifier::Shift,
        host.clone(),
    );

    shortcut.start().unwrap();
    shortcut.start().unwrap();
    assert_eq!(host.registry().len(), 1);
    assert!(shortcut.is_enabled());

    shortcut.disable();
    host.key(KeyEvent::down(VirtualKey::LMENU));
    assert!(!host.key(KeyEvent::down(VirtualKey::LSHIFT)));
    assert_eq!(shortcut.latch().latched(), (true, true));

    shortcut.enable();
    host.key(KeyEvent::up(VirtualKey::LSHIFT));
    assert!(host.key(KeyEvent::down(VirtualKey::LSHIFT)));
    assert_eq!(platform.layout_requests(), 1);

    shortcut.stop();
    shortcut.stop();
    assert!(host.registry().is_empty());
    assert!(!shortcut.is_active());
}

#[test]
fn latch_and_interceptor_share_one_stream() {
    let host = FakeHost::new();
    let platform = FakePlatform::focused(WINDOW_A);

    let mut interceptor =
        InputInterceptor::new(platform.clone(), CorrectionSettings::default(), host.clone());
    let mut shortcut = LayoutShortcut::new(
        platform.clone(),
        ChordModifier::Alt,
        ChordModifier::Shift,
        host.clone(),
    );
    interceptor.start().unwrap();
    shortcut.start().unwrap();

    host.type_text("ab");
    host.key(KeyEvent::down(VirtualKey::LMENU));
    assert!(host.key(KeyEvent::down(VirtualKey::LSHIFT)));

    assert_eq!(interceptor.engine().buffer().len(), 2);
    assert_eq!(platform.layout_requests(), 1);
    assert_eq!(platform.backspaces(), 0);
}

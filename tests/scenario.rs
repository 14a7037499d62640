//! End-to-end scenario: a full session against the headless backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use vkwin::callbacks::{Event, InstanceCallbacks, WindowCallbacks};
use vkwin::input::{Key, KeyAction, Modifiers};
use vkwin::system::null::{JoystickConfig, NullSystem};
use vkwin::system::WindowId;
use vkwin::{
    Bool32, Error, Extent2D, Instance, InstanceCreateInfo, VideoMode, WindowCreateInfo,
};

// One instance per process; scenario tests must not overlap.
static SERIAL: Mutex<()> = Mutex::new(());

static KEY_EVENTS: AtomicUsize = AtomicUsize::new(0);
static CLOSE_REQUESTS: AtomicUsize = AtomicUsize::new(0);
static JOYSTICK_CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

fn on_key(_window: WindowId, _key: Key, _scancode: i32, _action: KeyAction, _mods: Modifiers) {
    KEY_EVENTS.fetch_add(1, Ordering::SeqCst);
}

fn on_close(_window: WindowId) {
    CLOSE_REQUESTS.fetch_add(1, Ordering::SeqCst);
}

fn on_joystick(_id: i32, _event: vkwin::callbacks::ConnectionEvent) {
    JOYSTICK_CONNECTIONS.fetch_add(1, Ordering::SeqCst);
}

fn window_info(width: i32, height: i32, title: &str) -> WindowCreateInfo {
    let mut info = WindowCreateInfo::default();
    info.initial_state.size = Extent2D { width, height };
    info.initial_state.title = String::from(title);
    info.requested_video_mode = VideoMode {
        width,
        height,
        refresh_rate: 60,
        ..VideoMode::default()
    };
    info
}

#[test]
fn test_full_session() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    let system = NullSystem::new();
    system.attach_joystick(0, JoystickConfig::default());

    let instance = Instance::create_with_system(
        Box::new(system.clone()),
        &InstanceCreateInfo::default(),
        None,
    )
    .unwrap();

    // A second instance is refused while the first lives.
    assert!(matches!(
        Instance::create(&InstanceCreateInfo::default(), None),
        Err(Error::FeatureNotSupported)
    ));

    instance
        .set_callbacks(InstanceCallbacks {
            joystick_connection: Some(on_joystick),
            ..InstanceCallbacks::default()
        })
        .unwrap();

    let monitors = instance.enumerate_monitors().unwrap();
    assert!(!monitors.is_empty());
    let monitor = &monitors[0];

    let window = instance
        .create_window(monitor, &window_info(800, 600, "session"), None)
        .unwrap();
    window
        .set_callbacks(WindowCallbacks {
            key: Some(on_key),
            close_requested: Some(on_close),
            ..WindowCallbacks::default()
        })
        .unwrap();

    // Synthetic input arrives through the pump and reaches the window's
    // callback set; the joystick connection queued at attach reaches the
    // instance set.
    system.push_event(Event::Key(
        window.id(),
        Key::Escape,
        Key::Escape as i32,
        KeyAction::Press,
        Modifiers::empty(),
    ));
    system.push_event(Event::WindowClose(window.id()));
    instance.process_events(0.0, Bool32::FALSE).unwrap();
    assert_eq!(KEY_EVENTS.load(Ordering::SeqCst), 1);
    assert_eq!(CLOSE_REQUESTS.load(Ordering::SeqCst), 1);
    assert_eq!(JOYSTICK_CONNECTIONS.load(Ordering::SeqCst), 1);

    // Fullscreen round trip through whole-state reconciliation, with no
    // redundant work on the second application.
    let mut desired = window.state().unwrap();
    desired.fullscreen = Bool32::TRUE;
    window.apply_state(&desired).unwrap();
    assert_eq!(window.state().unwrap().fullscreen, Bool32::TRUE);

    let settled = window.state().unwrap();
    let before = system.mutation_count();
    window.apply_state(&settled).unwrap();
    assert_eq!(system.mutation_count(), before);

    // Gamma derivation leaves the monitor's ramp untouched.
    let ramp_before = monitor.gamma_ramp().unwrap().unwrap();
    let derived = monitor.derive_gamma_ramp(2.2).unwrap();
    assert_ne!(derived, ramp_before);
    assert_eq!(monitor.gamma_ramp().unwrap().unwrap(), ramp_before);

    // Joystick queries through the handle.
    let joystick = instance.joystick(0).unwrap();
    assert!(joystick.present().unwrap());
    assert!(joystick.is_gamepad().unwrap());

    window.destroy(None).unwrap();
    assert_eq!(system.window_count(), 0);
    instance.destroy(None).unwrap();

    // The singleton is free again.
    let again = Instance::create(&InstanceCreateInfo::default(), None).unwrap();
    again.destroy(None).unwrap();
}

#[test]
fn test_handles_fail_after_instance_destroy() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    let system = NullSystem::new();
    let instance = Instance::create_with_system(
        Box::new(system),
        &InstanceCreateInfo::default(),
        None,
    )
    .unwrap();
    let monitor = instance.primary_monitor().unwrap();
    instance.destroy(None).unwrap();

    assert_eq!(monitor.properties().err(), Some(Error::InitializationFailed));
}

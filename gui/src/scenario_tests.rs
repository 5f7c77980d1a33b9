//! Whole-desktop scenarios driven through the scripted controller, a fixed
//! clock and an in-memory canvas.

use flux_abi::input::{Event, KeyEvent, Modifiers, MouseButton};
use flux_abi::pixel::PixelFormat;
use flux_abi::rect::Rect;
use flux_abi::window::{InteractionMode, WindowId};
use flux_drivers::testing::{CountingDelay, FixedClock, ScriptedController};
use flux_gfx::DrawBuffer;
use flux_lib::OverflowPolicy;

use crate::button::Button;
use crate::config::GuiConfig;
use crate::desktop::GuiState;
use crate::event_queue::SharedEventQueue;
use crate::theme::*;
use crate::widget::{Child, Screen};
use crate::window::Window;
use crate::window_manager::WindowManager;

const W: u32 = 1024;
const H: u32 = 768;

const LEFT: u8 = 0x01;

fn bare_config() -> GuiConfig {
    GuiConfig {
        demo_windows: false,
        ..GuiConfig::default()
    }
}

/// Three-byte mouse packet moving the cursor by `(dx, dy)` in screen terms.
fn packet(buttons: u8, dx: i32, dy: i32) -> [u8; 3] {
    let dy = -dy;
    let mut flags = 0x08 | buttons;
    if dx < 0 {
        flags |= 0x10;
    }
    if dy < 0 {
        flags |= 0x20;
    }
    [flags, dx as u8, dy as u8]
}

fn click_at(state: &mut GuiState, x: i32, y: i32) {
    let button = MouseButton::Left;
    state.post(Event::MouseDown { x, y, button });
    state.post(Event::MouseUp { x, y, button });
    state.post(Event::MouseClick { x, y, button });
    state.drain_events();
}

fn key_down(scancode: u8, modifiers: Modifiers) -> Event {
    Event::KeyDown(KeyEvent {
        scancode,
        ascii: 0,
        modifiers,
    })
}

fn two_windows(wm: &mut WindowManager) -> (WindowId, WindowId) {
    let a = wm.create(Rect::new(100, 100, 400, 300), "A");
    let b = wm.create(Rect::new(300, 200, 400, 300), "B");
    match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => panic!("window creation failed"),
    }
}

#[test]
fn test_drag_through_main_loop() {
    let mut state = GuiState::new(W, H, bare_config());
    let Some(a) = state
        .window_manager_mut()
        .create(Rect::new(100, 100, 400, 300), "A")
    else {
        panic!("window creation failed");
    };

    // From the centre (512, 384) to (120, 108), then press, drag and release.
    let mut ctrl = ScriptedController::new();
    ctrl.push_mouse(&packet(0, -196, -138));
    ctrl.push_mouse(&packet(0, -196, -138));
    ctrl.push_mouse(&packet(LEFT, 0, 0));
    ctrl.push_mouse(&packet(LEFT, 50, 0));
    ctrl.push_mouse(&packet(0, 0, 0));

    let mut clock = FixedClock::at(10, 30);
    let mut delay = CountingDelay::default();
    let mut canvas = DrawBuffer::new(W, H, PixelFormat::Xrgb8888);
    let passes = state.run_bounded(&mut ctrl, &mut clock, &mut canvas, &mut delay, 3);

    assert_eq!(passes, 3);
    assert_eq!(delay.calls, 3);
    assert_eq!(ctrl.pending(), 0);
    assert_eq!(state.mouse_position(), (170, 108));

    let wm = state.window_manager();
    assert_eq!(wm.get(a).map(Window::geometry), Some(Rect::new(150, 100, 400, 300)));
    assert_eq!(wm.get(a).map(Window::interaction), Some(InteractionMode::Idle));
    assert_eq!(wm.grab(), None);

    assert_eq!(canvas.pixel(300, 103), Some(COLOR_TITLE_BAR));
    assert_eq!(canvas.pixel(120, 350), Some(COLOR_DESKTOP));
    assert_eq!(canvas.pixel(300, 760), Some(COLOR_TASKBAR));
    assert_eq!(canvas.pixel(170, 108), Some(COLOR_BLACK));
    assert_eq!(state.taskbar().clock_text(), "10:30");
    assert!(!state.needs_redraw());
}

#[test]
fn test_hit_test_prefers_topmost() {
    let mut wm = WindowManager::new(Screen::new(1024, 768));
    let (a, b) = two_windows(&mut wm);
    assert_eq!(wm.hit_test_point(350, 250), Some(b));
    assert_eq!(wm.hit_test_point(150, 150), Some(a));
    assert_eq!(wm.hit_test_point(650, 450), Some(b));
    assert_eq!(wm.hit_test_point(900, 50), None);

    wm.bring_to_front(a);
    assert_eq!(wm.hit_test_point(350, 250), Some(a));
}

#[test]
fn test_minimized_hidden_but_enumerable() {
    let mut wm = WindowManager::new(Screen::new(1024, 768));
    let (_, b) = two_windows(&mut wm);
    wm.minimize(b);

    assert_eq!(wm.hit_test_point(650, 450), None);
    assert_eq!(wm.iter().count(), 2);
    assert!(wm.iter().any(|w| w.id() == b && w.is_minimized()));

    let mut canvas = DrawBuffer::new(1024, 768, PixelFormat::Xrgb8888);
    wm.draw(&mut canvas);
    assert_eq!(canvas.pixel(600, 203), Some(COLOR_BLACK));
    assert_eq!(canvas.pixel(200, 103), Some(COLOR_TITLE_BAR));
}

#[test]
fn test_mouse_stays_on_screen() {
    let mut state = GuiState::new(W, H, bare_config());
    let mut ctrl = ScriptedController::new();
    for _ in 0..4 {
        ctrl.push_mouse(&packet(0, -250, -250));
    }
    state.poll_input(&mut ctrl);
    assert_eq!(state.mouse_position(), (0, 0));

    for _ in 0..6 {
        ctrl.push_mouse(&packet(0, 250, 250));
    }
    state.poll_input(&mut ctrl);
    assert_eq!(state.mouse_position(), (1023, 767));
}

#[test]
fn test_poll_respects_byte_budget() {
    let config = GuiConfig {
        max_poll_bytes: 4,
        ..bare_config()
    };
    let mut state = GuiState::new(W, H, config);
    let mut ctrl = ScriptedController::new();
    ctrl.push_mouse(&packet(0, 1, 0));
    ctrl.push_mouse(&packet(0, 1, 0));
    assert_eq!(state.poll_input(&mut ctrl), 4);
    assert_eq!(ctrl.pending(), 2);
    assert_eq!(state.queue().len(), 1);
}

#[test]
fn test_alt_f4_closes_active_window() {
    let mut state = GuiState::new(W, H, bare_config());
    let (a, b) = two_windows(state.window_manager_mut());
    let mut canvas = DrawBuffer::new(64, 64, PixelFormat::Xrgb8888);
    state.repaint(&mut canvas);
    assert!(!state.needs_redraw());

    let mut ctrl = ScriptedController::new();
    ctrl.push_keyboard(&[0x38, 0x3E, 0xBE, 0xB8]);
    state.poll_input(&mut ctrl);
    state.drain_events();

    let wm = state.window_manager();
    assert!(wm.get(b).is_none());
    assert_eq!(wm.active(), Some(a));
    assert!(state.needs_redraw());
}

#[test]
fn test_f4_without_alt_does_nothing() {
    let mut state = GuiState::new(W, H, bare_config());
    two_windows(state.window_manager_mut());
    state.post(key_down(0x3E, Modifiers::empty()));
    state.drain_events();
    assert_eq!(state.window_manager().len(), 2);
}

#[test]
fn test_f11_toggles_maximize() {
    let mut state = GuiState::new(W, H, bare_config());
    let (_, b) = two_windows(state.window_manager_mut());

    state.post(key_down(0x57, Modifiers::empty()));
    state.drain_events();
    let geometry = |s: &GuiState| s.window_manager().get(b).map(Window::geometry);
    assert_eq!(geometry(&state), Some(Rect::new(0, 0, 1024, 736)));

    state.post(key_down(0x57, Modifiers::empty()));
    state.drain_events();
    assert_eq!(geometry(&state), Some(Rect::new(300, 200, 400, 300)));
}

#[test]
fn test_registered_shortcut_runs_before_windows() {
    let mut state = GuiState::new(W, H, bare_config());
    state
        .shortcuts_mut()
        .register(0x13, true, |sink| sink.post(Event::Redraw));

    let mut canvas = DrawBuffer::new(W, H, PixelFormat::Xrgb8888);
    state.repaint(&mut canvas);
    assert!(!state.needs_redraw());

    state.post(key_down(0x13, Modifiers::CTRL));
    state.drain_events();
    assert!(state.needs_redraw());
}

#[test]
fn test_taskbar_button_raises_window() {
    let mut state = GuiState::new(W, H, bare_config());
    let (a, b) = two_windows(state.window_manager_mut());
    assert_eq!(state.window_manager().active(), Some(b));

    // First app button belongs to A, the first window created.
    click_at(&mut state, 90, 750);
    assert_eq!(state.window_manager().active(), Some(a));
    assert_eq!(state.window_manager().z_index(a), Some(0));

    click_at(&mut state, 90, 750);
    assert!(state.window_manager().get(a).is_some_and(Window::is_minimized));
}

#[test]
fn test_start_menu_launches_and_closes() {
    let mut state = GuiState::new(W, H, bare_config());
    click_at(&mut state, 10, 750);
    assert!(state.taskbar().is_menu_open());

    // Second item, "About".
    click_at(&mut state, 20, 715);
    assert!(!state.taskbar().is_menu_open());
    let wm = state.window_manager();
    let about = wm.find_by_title("About Flux");
    assert!(about.is_some());
    assert_eq!(wm.active(), about);

    // Launching again raises the existing window.
    click_at(&mut state, 10, 750);
    click_at(&mut state, 20, 715);
    assert_eq!(state.window_manager().len(), 1);
}

#[test]
fn test_click_outside_menu_closes_it_and_reaches_window() {
    let mut state = GuiState::new(W, H, bare_config());
    let (a, _) = two_windows(state.window_manager_mut());
    click_at(&mut state, 10, 750);
    assert!(state.taskbar().is_menu_open());

    state.post(Event::MouseDown {
        x: 120,
        y: 108,
        button: MouseButton::Left,
    });
    state.drain_events();
    assert!(!state.taskbar().is_menu_open());
    let wm = state.window_manager();
    assert_eq!(wm.grab(), Some(a));
    assert_eq!(wm.active(), Some(a));
    assert!(matches!(
        wm.get(a).map(Window::interaction),
        Some(InteractionMode::Dragging { .. })
    ));
}

#[test]
fn test_drag_released_over_taskbar_ends() {
    let mut state = GuiState::new(W, H, bare_config());
    let (_, b) = two_windows(state.window_manager_mut());
    let button = MouseButton::Left;

    state.post(Event::MouseDown { x: 320, y: 208, button });
    state.post(Event::MouseMove { x: 320, y: 750 });
    state.post(Event::MouseUp { x: 320, y: 750, button });
    state.drain_events();

    let wm = state.window_manager();
    assert_eq!(wm.grab(), None);
    let window = wm.get(b).map(|w| (w.geometry().y, w.interaction().is_idle()));
    assert_eq!(window, Some((768 - TASKBAR_HEIGHT - TITLE_BAR_HEIGHT, true)));

    // A release with no click after it does not keep the next taskbar click.
    click_at(&mut state, 10, 750);
    assert!(state.taskbar().is_menu_open());
}

/// Down, moves and release followed by the click the decoder reports with it.
fn drag(state: &mut GuiState, from: (i32, i32), to: (i32, i32)) {
    let button = MouseButton::Left;
    let (x, y) = to;
    state.post(Event::MouseDown { x: from.0, y: from.1, button });
    state.post(Event::MouseMove { x, y });
    state.post(Event::MouseUp { x, y, button });
    state.post(Event::MouseClick { x, y, button });
    state.drain_events();
}

#[test]
fn test_drag_release_click_stays_with_window() {
    let mut state = GuiState::new(W, H, bare_config());
    let Some(a) = state
        .window_manager_mut()
        .create(Rect::new(100, 100, 400, 300), "A")
    else {
        panic!("window creation failed");
    };

    // Let go over A's own taskbar button.
    let own_button = state.taskbar().app_button_rect(0).map(|r| (r.x + 10, r.y + 10));
    assert_eq!(own_button, Some((90, 750)));
    drag(&mut state, (120, 108), (90, 750));
    let wm = state.window_manager();
    assert_eq!(wm.get(a).map(Window::is_minimized), Some(false));
    assert_eq!(wm.active(), Some(a));
    assert_eq!(wm.grab(), None);

    // Let go over Start.
    drag(&mut state, (150, 725), (10, 750));
    assert!(!state.taskbar().is_menu_open());
    assert_eq!(state.window_manager().get(a).map(Window::is_minimized), Some(false));

    // The next plain click on the taskbar button still works.
    click_at(&mut state, 90, 750);
    assert_eq!(state.window_manager().get(a).map(Window::is_minimized), Some(true));
}

/// Window A with a button at screen (111..191, 134..158), and B off to the side.
fn hover_setup() -> (GuiState, WindowId) {
    let mut state = GuiState::new(W, H, bare_config());
    let wm = state.window_manager_mut();
    let a = wm.create(Rect::new(100, 100, 400, 300), "A");
    let b = wm.create(Rect::new(600, 200, 300, 200), "B");
    let (Some(a), Some(_)) = (a, b) else {
        panic!("window creation failed");
    };
    if let Some(w) = wm.get_mut(a) {
        w.set_child(Button::new(10, 10, 80, 24, "OK"));
    }
    state.post(Event::MouseMove { x: 120, y: 140 });
    state.drain_events();
    assert!(button_hovered(&state, a));
    (state, a)
}

fn button_hovered(state: &GuiState, id: WindowId) -> bool {
    let window = state.window_manager().get(id);
    matches!(window.and_then(Window::child), Some(Child::Button(b)) if b.is_hovered())
}

#[test]
fn test_hover_cleared_when_pointer_moves_to_other_window() {
    let (mut state, a) = hover_setup();
    state.post(Event::MouseMove { x: 700, y: 300 });
    state.drain_events();
    assert!(!button_hovered(&state, a));
}

#[test]
fn test_hover_cleared_when_pointer_moves_to_taskbar() {
    let (mut state, a) = hover_setup();
    state.post(Event::MouseMove { x: 400, y: 750 });
    state.drain_events();
    assert!(!button_hovered(&state, a));
}

#[test]
fn test_hover_cleared_when_pointer_moves_to_desktop() {
    let (mut state, a) = hover_setup();
    state.post(Event::MouseMove { x: 50, y: 50 });
    state.drain_events();
    assert!(!button_hovered(&state, a));
}

#[test]
fn test_welcome_ok_button_closes_window() {
    let mut state = GuiState::new(W, H, GuiConfig::default());
    let wm = state.window_manager();
    assert_eq!(wm.len(), 2);
    let welcome = wm.find_by_title("Welcome to Flux");
    assert_eq!(
        welcome.and_then(|id| wm.get(id)).map(Window::geometry),
        Some(Rect::new(312, 234, 400, 300))
    );

    // OK sits at client (150, 220); the client origin is (313, 258).
    click_at(&mut state, 500, 495);
    let wm = state.window_manager();
    assert_eq!(wm.find_by_title("Welcome to Flux"), None);
    assert_eq!(wm.len(), 1);
    assert_eq!(wm.grab(), None);
}

#[test]
fn test_glyph_minimize_skips_raise() {
    let mut state = GuiState::new(W, H, bare_config());
    let (a, b) = two_windows(state.window_manager_mut());
    state.window_manager_mut().bring_to_front(a);

    // B spans to x = 700; its minimize glyph is clear of A.
    click_at(&mut state, 700 - 40 + 8, 212);
    let wm = state.window_manager();
    assert!(wm.get(b).is_some_and(Window::is_minimized));
    assert_eq!(wm.z_index(b), Some(1));
    assert_eq!(wm.active(), Some(a));
}

#[test]
fn test_clock_minute_change_marks_dirty() {
    let mut state = GuiState::new(W, H, bare_config());
    let mut canvas = DrawBuffer::new(W, H, PixelFormat::Xrgb8888);
    let mut clock = FixedClock::at(8, 15);

    state.update_clock(&mut clock);
    state.repaint(&mut canvas);
    assert!(!state.needs_redraw());

    state.update_clock(&mut clock);
    assert!(!state.needs_redraw());

    clock.time = clock.time.map(|mut t| {
        t.minute = 16;
        t
    });
    state.update_clock(&mut clock);
    assert!(state.needs_redraw());
}

#[test]
fn test_cursor_drawn_without_repaint() {
    let mut state = GuiState::new(W, H, bare_config());
    let mut ctrl = ScriptedController::new();
    let mut clock = FixedClock::default();
    let mut delay = CountingDelay::default();
    let mut canvas = DrawBuffer::new(W, H, PixelFormat::Xrgb8888);

    state.step(&mut ctrl, &mut clock, &mut canvas, &mut delay);
    assert!(!state.needs_redraw());
    canvas.clear_damage();

    ctrl.push_mouse(&packet(0, 10, 10));
    state.step(&mut ctrl, &mut clock, &mut canvas, &mut delay);
    assert_eq!(canvas.pixel(522, 394), Some(COLOR_BLACK));
    assert_eq!(canvas.damage(), Rect::new(522, 394, 9, 12));
}

#[test]
fn test_shared_queue_feeds_loop() {
    static SHARED: SharedEventQueue = SharedEventQueue::new(OverflowPolicy::DropNewest);
    let mut state = GuiState::new(W, H, bare_config());
    state.attach_shared(&SHARED);
    let mut canvas = DrawBuffer::new(W, H, PixelFormat::Xrgb8888);
    state.repaint(&mut canvas);

    assert!(SHARED.push(Event::Redraw));
    assert_eq!(state.drain_events(), 1);
    assert!(state.needs_redraw());
    assert!(SHARED.is_empty());
}

#[test]
fn test_queue_overflow_drops_newest() {
    let mut state = GuiState::new(W, H, bare_config());
    let stored = (0..70)
        .filter(|&x| state.post(Event::MouseMove { x, y: 0 }))
        .count();
    assert_eq!(stored, 63);
    assert_eq!(state.queue().dropped(), 7);
    assert_eq!(state.drain_events(), 63);
}

#[test]
fn test_shutdown_stops_loop() {
    let mut state = GuiState::new(W, H, bare_config());
    let mut ctrl = ScriptedController::new();
    let mut clock = FixedClock::default();
    let mut delay = CountingDelay::default();
    let mut canvas = DrawBuffer::new(64, 64, PixelFormat::Xrgb8888);

    state.shutdown();
    assert!(!state.is_running());
    assert_eq!(
        state.run_bounded(&mut ctrl, &mut clock, &mut canvas, &mut delay, 10),
        0
    );
    assert_eq!(delay.calls, 0);
}

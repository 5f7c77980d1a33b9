//! Desktop state and the polled main loop.
//!
//! One pass of the loop:
//!
//! 1. pull up to `max_poll_bytes` bytes off the PS/2 controller into the
//!    decoders, which queue events;
//! 2. drain the queue, dispatching shortcuts first, then the pointer grab,
//!    the start menu and taskbar, the windows, and finally the desktop;
//! 3. read the clock;
//! 4. repaint everything if something changed;
//! 5. draw the cursor;
//! 6. wait.
//!
//! All state lives in [`GuiState`]; nothing here is global.

use flux_abi::draw::Canvas;
use flux_abi::input::{Event, KeyEvent, Modifiers, MouseButton};
use flux_drivers::keyboard::KeyboardDecoder;
use flux_drivers::mouse::MouseDecoder;
use flux_drivers::ps2::{self, Ps2Byte, Ps2Controller};
use flux_drivers::{Clock, Delay};
use flux_gfx::canvas_ops;
use flux_lib::{klog_debug, klog_info};

use crate::config::GuiConfig;
use crate::cursor;
use crate::demo::DemoWindow;
use crate::event_queue::{EventQueue, SharedEventQueue};
use crate::shortcuts::{KEY_F4, KEY_F11, ShortcutRegistry};
use crate::taskbar::{Taskbar, TaskbarAction};
use crate::theme::COLOR_DESKTOP;
use crate::widget::{EventContext, Screen};
use crate::window_manager::WindowManager;

pub struct GuiState {
    screen: Screen,
    config: GuiConfig,
    mouse: MouseDecoder,
    keyboard: KeyboardDecoder,
    queue: EventQueue,
    wm: WindowManager,
    taskbar: Taskbar,
    shortcuts: ShortcutRegistry,
    shared: Option<&'static SharedEventQueue>,
    running: bool,
    needs_redraw: bool,
}

impl GuiState {
    pub fn new(width: u32, height: u32, config: GuiConfig) -> Self {
        let screen = Screen::new(width as i32, height as i32);
        let mut state = Self {
            screen,
            config,
            mouse: MouseDecoder::new(width, height),
            keyboard: KeyboardDecoder::new(),
            queue: EventQueue::new(config.overflow_policy),
            wm: WindowManager::new(screen),
            taskbar: Taskbar::new(screen),
            shortcuts: ShortcutRegistry::new(),
            shared: None,
            running: true,
            needs_redraw: true,
        };
        if config.demo_windows {
            state.create_demo_windows();
        }
        klog_info!(
            "gui: desktop {}x{} ready, {} window(s), queue policy {:?}",
            width,
            height,
            state.wm.len(),
            config.overflow_policy
        );
        state
    }

    pub fn create_demo_windows(&mut self) {
        for demo in DemoWindow::ALL {
            self.launch(demo);
        }
    }

    /// Also drain `shared` into the loop's queue on every pass.
    pub fn attach_shared(&mut self, shared: &'static SharedEventQueue) {
        self.shared = Some(shared);
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutRegistry {
        &mut self.shortcuts
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse.position()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Queue an event as if an input device had produced it.
    pub fn post(&mut self, event: Event) -> bool {
        self.queue.push(event)
    }

    /// Stop the loop after the current pass.
    pub fn shutdown(&mut self) {
        if self.running {
            klog_info!("gui: shutting down");
        }
        self.running = false;
    }

    // ── Input ───────────────────────────────────────────────────────────────

    pub fn feed_byte(&mut self, byte: Ps2Byte) {
        match byte {
            Ps2Byte::Mouse(b) => {
                self.mouse.feed(b, &mut self.queue);
            }
            Ps2Byte::Keyboard(b) => {
                self.keyboard.feed(b, &mut self.queue);
            }
        }
    }

    /// Decode whatever the controller has ready, up to the per-pass limit.
    /// Returns the number of bytes consumed.
    pub fn poll_input<C: Ps2Controller + ?Sized>(&mut self, ctrl: &mut C) -> usize {
        let mut consumed = 0;
        while consumed < self.config.max_poll_bytes {
            let Some(byte) = ps2::poll_byte(ctrl) else {
                break;
            };
            self.feed_byte(byte);
            consumed += 1;
        }
        consumed
    }

    /// Dispatch every queued event, including ones queued by handlers along
    /// the way. Returns how many were dispatched.
    pub fn drain_events(&mut self) -> usize {
        if let Some(shared) = self.shared {
            shared.drain_into(&mut self.queue);
        }
        let mut dispatched = 0;
        while let Some(event) = self.queue.pop() {
            self.dispatch(&event);
            dispatched += 1;
        }
        if self.wm.take_dirty() {
            self.needs_redraw = true;
        }
        dispatched
    }

    pub fn dispatch(&mut self, event: &Event) {
        match event {
            Event::Redraw => self.needs_redraw = true,
            Event::KeyDown(_) | Event::KeyUp(_) => self.dispatch_key(event),
            _ => self.dispatch_pointer(event),
        }
    }

    fn dispatch_key(&mut self, event: &Event) {
        if let Event::KeyDown(key) = event {
            if self.builtin_shortcut(key) || self.shortcuts.dispatch(key, &mut self.queue) {
                return;
            }
        }
        let mut ctx = EventContext::new(self.screen, &mut self.queue);
        self.wm.handle_key(event, &mut ctx);
    }

    fn builtin_shortcut(&mut self, key: &KeyEvent) -> bool {
        let active = self.wm.active();
        match key.scancode {
            KEY_F4 if key.modifiers.contains(Modifiers::ALT) => {
                if let Some(id) = active {
                    klog_debug!("gui: Alt+F4 closes {}", id);
                    self.wm.close(id, &mut self.queue);
                }
                true
            }
            KEY_F11 => {
                if let Some(id) = active {
                    self.wm.toggle_maximize(id);
                }
                true
            }
            _ => false,
        }
    }

    fn dispatch_pointer(&mut self, event: &Event) {
        let Some((x, y)) = event.position() else {
            return;
        };
        let left_click = matches!(
            event,
            Event::MouseClick {
                button: MouseButton::Left,
                ..
            }
        );

        // A window holding the grab sees the whole press, release and click.
        if self.wm.owns_pointer(event) {
            let mut ctx = EventContext::new(self.screen, &mut self.queue);
            self.wm.handle_pointer(event, &mut ctx);
            return;
        }

        if self.taskbar.is_menu_open() {
            if self.taskbar.menu_rect().contains(x, y) {
                let mut ctx = EventContext::new(self.screen, &mut self.queue);
                self.wm.pointer_left(event, &mut ctx);
                if left_click {
                    let action = self.taskbar.menu_click(x, y);
                    self.apply_taskbar(action);
                }
                return;
            }
            if event.is_left_down() && !self.taskbar.start_button_rect().contains(x, y) {
                self.taskbar.close_menu();
                self.needs_redraw = true;
            }
        }

        if self.taskbar.area().contains(x, y) {
            let mut ctx = EventContext::new(self.screen, &mut self.queue);
            self.wm.pointer_left(event, &mut ctx);
            if left_click {
                let action = self.taskbar.click(x, y, &mut self.wm);
                self.apply_taskbar(action);
            }
            return;
        }

        let mut ctx = EventContext::new(self.screen, &mut self.queue);
        // Nothing on the desktop itself reacts to the pointer.
        self.wm.handle_pointer(event, &mut ctx);
    }

    fn apply_taskbar(&mut self, action: TaskbarAction) {
        match action {
            TaskbarAction::Nothing => {}
            TaskbarAction::Repaint => self.needs_redraw = true,
            TaskbarAction::Launch(demo) => {
                self.launch(demo);
                self.needs_redraw = true;
            }
        }
    }

    pub fn launch(&mut self, demo: DemoWindow) {
        // `open` logs its own failures.
        let _ = demo.open(&mut self.wm);
    }

    // ── Output ──────────────────────────────────────────────────────────────

    /// Read the clock; a new minute forces a repaint.
    pub fn update_clock<K: Clock + ?Sized>(&mut self, clock: &mut K) {
        if self.taskbar.update_clock(clock.now()) {
            self.needs_redraw = true;
        }
    }

    /// Paint the whole desktop back to front.
    pub fn repaint(&mut self, canvas: &mut dyn Canvas) {
        let desktop = self.screen.desktop_area();
        canvas_ops::fill_rect(
            canvas,
            desktop.x,
            desktop.y,
            desktop.width,
            desktop.height,
            COLOR_DESKTOP,
        );

        self.wm.draw(canvas);
        self.taskbar.draw(canvas, &self.wm);
        self.taskbar.draw_menu(canvas);
        self.wm.take_dirty();
        self.needs_redraw = false;
    }

    pub fn draw_cursor(&self, canvas: &mut dyn Canvas) {
        let (x, y) = self.mouse.position();
        cursor::draw_cursor(canvas, x, y);
    }

    // ── Loop ────────────────────────────────────────────────────────────────

    /// One pass of the main loop.
    pub fn step<C, K, D>(
        &mut self,
        ctrl: &mut C,
        clock: &mut K,
        canvas: &mut dyn Canvas,
        delay: &mut D,
    ) where
        C: Ps2Controller + ?Sized,
        K: Clock + ?Sized,
        D: Delay + ?Sized,
    {
        self.poll_input(ctrl);
        self.drain_events();
        self.update_clock(clock);
        if self.needs_redraw {
            self.repaint(canvas);
        }
        self.draw_cursor(canvas);
        delay.delay();
    }

    /// Run until [`shutdown`](Self::shutdown) or `max_iterations` passes.
    /// Returns the number of passes made.
    pub fn run_bounded<C, K, D>(
        &mut self,
        ctrl: &mut C,
        clock: &mut K,
        canvas: &mut dyn Canvas,
        delay: &mut D,
        max_iterations: usize,
    ) -> usize
    where
        C: Ps2Controller + ?Sized,
        K: Clock + ?Sized,
        D: Delay + ?Sized,
    {
        let mut passes = 0;
        while self.running && passes < max_iterations {
            self.step(ctrl, clock, canvas, delay);
            passes += 1;
        }
        passes
    }

    pub fn run<C, K, D>(
        &mut self,
        ctrl: &mut C,
        clock: &mut K,
        canvas: &mut dyn Canvas,
        delay: &mut D,
    ) where
        C: Ps2Controller + ?Sized,
        K: Clock + ?Sized,
        D: Delay + ?Sized,
    {
        let passes = self.run_bounded(ctrl, clock, canvas, delay, usize::MAX);
        klog_info!("gui: main loop exited after {} passes", passes);
    }
}

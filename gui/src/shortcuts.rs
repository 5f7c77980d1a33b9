//! Key bindings checked before an event is routed anywhere else.

use alloc::boxed::Box;
use alloc::vec::Vec;

use flux_abi::input::{EventSink, KeyEvent, Modifiers};
use flux_lib::klog_warn;

pub const MAX_SHORTCUTS: usize = 32;

/// Scancode for F4, combined with Alt to close the active window.
pub const KEY_F4: u8 = flux_drivers::keyboard::KEY_F4;
/// Scancode for F11, toggles maximize on the active window.
pub const KEY_F11: u8 = flux_drivers::keyboard::KEY_F11;

pub type ShortcutHandler = Box<dyn FnMut(&mut dyn EventSink)>;

struct Shortcut {
    scancode: u8,
    ctrl: bool,
    handler: ShortcutHandler,
}

#[derive(Default)]
pub struct ShortcutRegistry {
    entries: Vec<Shortcut>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind `scancode`, pressed with or without Ctrl, to `handler`. Returns
    /// `false` once the table is full.
    pub fn register(
        &mut self,
        scancode: u8,
        ctrl: bool,
        handler: impl FnMut(&mut dyn EventSink) + 'static,
    ) -> bool {
        if self.entries.len() >= MAX_SHORTCUTS {
            klog_warn!("gui: shortcut table full, {:#04x} not bound", scancode);
            return false;
        }
        self.entries.push(Shortcut {
            scancode,
            ctrl,
            handler: Box::new(handler),
        });
        true
    }

    pub fn unregister(&mut self, scancode: u8, ctrl: bool) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|s| !(s.scancode == scancode && s.ctrl == ctrl));
        self.entries.len() != before
    }

    /// Run the first binding matching `key`. Returns whether one ran.
    pub fn dispatch(&mut self, key: &KeyEvent, sink: &mut dyn EventSink) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match self
            .entries
            .iter_mut()
            .find(|s| s.scancode == key.scancode && s.ctrl == ctrl)
        {
            Some(shortcut) => {
                (shortcut.handler)(sink);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_abi::input::Event;

    #[derive(Default)]
    struct Collect(Vec<Event>);

    impl EventSink for Collect {
        fn post(&mut self, event: Event) {
            self.0.push(event);
        }
    }

    fn key(scancode: u8, modifiers: Modifiers) -> KeyEvent {
        KeyEvent {
            scancode,
            ascii: 0,
            modifiers,
        }
    }

    #[test]
    fn test_ctrl_must_match() {
        let mut reg = ShortcutRegistry::new();
        assert!(reg.register(0x13, true, |sink| sink.post(Event::Redraw)));

        let mut sink = Collect::default();
        assert!(!reg.dispatch(&key(0x13, Modifiers::empty()), &mut sink));
        assert!(reg.dispatch(&key(0x13, Modifiers::CTRL | Modifiers::SHIFT), &mut sink));
        assert_eq!(sink.0, [Event::Redraw]);
    }

    #[test]
    fn test_table_is_bounded() {
        let mut reg = ShortcutRegistry::new();
        for code in 0..MAX_SHORTCUTS as u8 {
            assert!(reg.register(code, false, |_| {}));
        }
        assert!(!reg.register(0x50, false, |_| {}));
        assert_eq!(reg.len(), MAX_SHORTCUTS);

        assert!(reg.unregister(3, false));
        assert!(!reg.unregister(3, false));
        assert!(reg.register(0x50, false, |_| {}));
    }
}

//! Deterministic stand-ins for the hardware traits.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::delay::Delay;
use crate::ps2::{
    CMD_READ_CONFIG, CMD_WRITE_AUX, CMD_WRITE_CONFIG, DEV_ACK, Ps2Byte, Ps2Controller,
    STATUS_MOUSE_DATA, STATUS_OUTPUT_FULL,
};
use crate::rtc::{Clock, WallTime};

/// A controller fed from a byte script.
///
/// Queued bytes come out of the data port in order, flagged as mouse or
/// keyboard data in the status register. Writes are recorded. Bytes routed
/// to the mouse are answered with `mouse_reply` (ACK by default) and a
/// config read returns `config`.
pub struct ScriptedController {
    output: VecDeque<Ps2Byte>,
    pub commands: Vec<u8>,
    pub data_writes: Vec<u8>,
    pub aux_writes: Vec<u8>,
    pub config: u8,
    pub mouse_reply: Option<u8>,
    next_data: DataTarget,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DataTarget {
    Keyboard,
    Aux,
    Config,
}

impl Default for ScriptedController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedController {
    pub fn new() -> Self {
        Self {
            output: VecDeque::new(),
            commands: Vec::new(),
            data_writes: Vec::new(),
            aux_writes: Vec::new(),
            config: 0x47,
            mouse_reply: Some(DEV_ACK),
            next_data: DataTarget::Keyboard,
        }
    }

    pub fn push_mouse(&mut self, bytes: &[u8]) {
        self.output
            .extend(bytes.iter().map(|&b| Ps2Byte::Mouse(b)));
    }

    pub fn push_keyboard(&mut self, bytes: &[u8]) {
        self.output
            .extend(bytes.iter().map(|&b| Ps2Byte::Keyboard(b)));
    }

    pub fn pending(&self) -> usize {
        self.output.len()
    }
}

impl Ps2Controller for ScriptedController {
    fn read_status(&mut self) -> u8 {
        match self.output.front() {
            None => 0,
            Some(Ps2Byte::Keyboard(_)) => STATUS_OUTPUT_FULL,
            Some(Ps2Byte::Mouse(_)) => STATUS_OUTPUT_FULL | STATUS_MOUSE_DATA,
        }
    }

    fn read_data(&mut self) -> u8 {
        match self.output.pop_front() {
            Some(Ps2Byte::Keyboard(b)) | Some(Ps2Byte::Mouse(b)) => b,
            None => 0,
        }
    }

    fn write_command(&mut self, cmd: u8) {
        self.commands.push(cmd);
        match cmd {
            CMD_WRITE_AUX => self.next_data = DataTarget::Aux,
            CMD_WRITE_CONFIG => self.next_data = DataTarget::Config,
            CMD_READ_CONFIG => self.output.push_back(Ps2Byte::Keyboard(self.config)),
            _ => {}
        }
    }

    fn write_data(&mut self, data: u8) {
        match core::mem::replace(&mut self.next_data, DataTarget::Keyboard) {
            DataTarget::Aux => {
                self.aux_writes.push(data);
                if let Some(reply) = self.mouse_reply {
                    self.output.push_back(Ps2Byte::Mouse(reply));
                }
            }
            DataTarget::Config => self.config = data,
            DataTarget::Keyboard => self.data_writes.push(data),
        }
    }
}

/// Clock that reports whatever the test last set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    pub time: Option<WallTime>,
}

impl FixedClock {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            time: Some(WallTime {
                hour,
                minute,
                second: 0,
            }),
        }
    }
}

impl Clock for FixedClock {
    fn now(&mut self) -> Option<WallTime> {
        self.time
    }
}

/// Delay that only counts how often it was asked to wait.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub calls: usize,
}

impl Delay for CountingDelay {
    fn delay(&mut self) {
        self.calls += 1;
    }
}

//! Plain machine state, owned by a single `Machine`.

use crate::frame::Frame;
use crate::memory::{Memory, ADDR_MASK, PROGRAM_ADDR};
use crate::timer::Timer;

/// Number of return addresses the call stack holds
pub const STACK_DEPTH: usize = 16;
/// Index of the flag register
pub const VF: usize = 0xF;

/// Outcome of a stack operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StackAccess {
    /// Stayed within the stack
    Plain,
    /// A push overwrote a live frame, or a pop found no live frame
    Wrapped,
}

/// Fixed-depth return stack whose pointer wraps modulo `STACK_DEPTH`
///
/// `sp` is the index of the next free slot. `live` counts the frames that can
/// still be returned to, capped at the depth; only leaving that range aliases.
#[derive(Clone, Debug, Default)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: u8,
    live: u8,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: [0; STACK_DEPTH],
            sp: 0,
            live: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> StackAccess {
        self.slots[self.sp as usize] = addr;
        self.sp = (self.sp + 1) % STACK_DEPTH as u8;
        if self.live as usize == STACK_DEPTH {
            StackAccess::Wrapped
        } else {
            self.live += 1;
            StackAccess::Plain
        }
    }

    pub fn pop(&mut self) -> (u16, StackAccess) {
        let access = if self.live == 0 {
            StackAccess::Wrapped
        } else {
            self.live -= 1;
            StackAccess::Plain
        };
        self.sp = (self.sp + STACK_DEPTH as u8 - 1) % STACK_DEPTH as u8;
        (self.slots[self.sp as usize], access)
    }

    #[inline]
    pub fn pointer(&self) -> u8 {
        self.sp
    }

    /// Frames that can be returned to without aliasing
    #[inline]
    pub fn depth(&self) -> u8 {
        self.live
    }
}

/// Everything an instruction may read or write
#[derive(Clone)]
pub struct State {
    pub(crate) memory: Memory,
    pub(crate) v: [u8; 16],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: Stack,
    pub(crate) delay_timer: Timer,
    pub(crate) sound_timer: Timer,
    pub(crate) keys: [bool; 16],
    pub(crate) frame: Frame,
    /// Register waiting for the next key press
    pub(crate) waiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        Self {
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            stack: Stack::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            keys: [false; 16],
            frame: Frame::new(),
            waiting_key: None,
        }
    }

    /// Clear everything but memory and point `pc` at `entry`
    pub(crate) fn reset(&mut self, entry: u16) {
        let memory = core::mem::take(&mut self.memory);
        *self = Self {
            memory,
            pc: entry & ADDR_MASK,
            ..Self::new()
        };
    }

    #[inline]
    pub(crate) fn vx(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    #[inline]
    pub(crate) fn set_vx(&mut self, x: u8, value: u8) {
        self.v[(x & 0xF) as usize] = value;
    }

    #[inline]
    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.v[VF] = flag as u8;
    }

    /// Move `pc` by `offset` bytes within the address space
    #[inline]
    pub(crate) fn advance_pc(&mut self, offset: u16) {
        self.pc = self.pc.wrapping_add(offset) & ADDR_MASK;
    }

    #[inline]
    pub(crate) fn is_key_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest numbered key currently held down
    pub(crate) fn first_pressed_key(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|key| key as u8)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

use core::convert::{Infallible, TryFrom};

use log::{debug, info, trace, warn};
use nanorand::rand::pcg64::Pcg64 as Rng;

use crate::frame::FrameView;
use crate::hooks::Hooks;
use crate::memory::{ADDR_MASK, PROGRAM_ADDR};
use crate::opcode::{Fields, OpCode};
use crate::state::{State, StackAccess};
use crate::timer::TimerState;

/// Behaviours that differ between interpreters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// `ld [I], Vx` and `ld Vx, [I]` leave I pointing past the copied block
    pub load_store_increments_i: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            load_store_increments_i: true,
        }
    }
}

/// A CHIP-8 machine: state, random generator and the hooks observing it
///
/// Nothing here locks; share it between threads behind a `Mutex` or hand out
/// `FrameView::copy_frame` snapshots.
pub struct Machine<H: Hooks = ()> {
    pub(crate) state: State,
    pub(crate) rng: Rng,
    pub(crate) quirks: Quirks,
    pub(crate) hooks: H,
    entry: u16,
}

impl<H: Hooks> Machine<H> {
    /// Fresh machine with the font installed and `pc` at 0x200
    ///
    /// `seed` feeds the generator behind `rnd`; the same seed replays the same
    /// random sequence.
    pub fn new(seed: u128, hooks: H) -> Self {
        Self {
            state: State::new(),
            rng: Rng::new_seed(seed),
            quirks: Quirks::default(),
            hooks,
            entry: PROGRAM_ADDR,
        }
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Start executing at `entry` instead of 0x200, also used by `reset`
    pub fn with_entry(mut self, entry: u16) -> Self {
        self.entry = entry & ADDR_MASK;
        self.state.pc = self.entry;
        self
    }

    /// Copy a program image into memory starting at `offset`
    ///
    /// Addresses wrap past 0xFFF; the bytes are not interpreted.
    pub fn load(&mut self, offset: u16, program: &[u8]) {
        info!("loading {} bytes at {:#05X}", program.len(), offset & ADDR_MASK);
        self.state.memory.write_all(offset, program);
    }

    /// Execute a single instruction
    ///
    /// While waiting for a key, returns `WouldBlock` until one is pressed. The
    /// step that sees the key only stores it; fetching resumes on the next step.
    pub fn step(&mut self) -> nb::Result<(), Infallible> {
        if let Some(x) = self.state.waiting_key {
            let key = self
                .state
                .first_pressed_key()
                .ok_or(nb::Error::WouldBlock)?;
            debug!("key {:X} pressed, stored in V{:X}", key, x);
            self.state.set_vx(x, key);
            self.state.waiting_key = None;
            return Ok(());
        }

        let addr = self.state.pc;
        let raw = self.state.memory.read_word(addr);
        self.state.advance_pc(2);

        match OpCode::try_from(Fields::decode(raw)) {
            Ok(opcode) => {
                trace!("{:#05X}: {}", addr, opcode);
                self.execute(opcode);
            }
            Err(unknown) => {
                warn!("{} at {:#05X}, skipped", unknown, addr);
                self.hooks.on_unknown_opcode(addr, raw);
            }
        }
        Ok(())
    }

    /// Decrement both timers, meant to be called at 60Hz
    pub fn tick_timers(&mut self) {
        self.state.delay_timer.decrement();
        if let TimerState::Finished = self.state.sound_timer.decrement() {
            self.hooks.on_sound(false);
        }
    }

    /// Clear registers, stack, timers, keys, display and a pending key-wait
    ///
    /// Memory is kept, so the loaded program starts over.
    pub fn reset(&mut self) {
        info!("reset, entry at {:#05X}", self.entry);
        if self.state.sound_timer.is_active() {
            self.hooks.on_sound(false);
        }
        self.state.reset(self.entry);
    }

    /// Abort a pending `ld Vx, K` without touching anything else
    pub fn cancel_key_wait(&mut self) {
        if self.state.waiting_key.take().is_some() {
            debug!("key wait cancelled");
        }
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.state.keys[(key & 0xF) as usize] = pressed;
    }

    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.state.keys = keys;
    }

    pub fn keys(&self) -> &[bool; 16] {
        &self.state.keys
    }

    pub fn frame(&self) -> FrameView<'_> {
        self.state.frame.view()
    }

    /// Whether the tone should be playing
    pub fn is_sound_on(&self) -> bool {
        self.state.sound_timer.is_active()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.waiting_key.is_some()
    }

    pub fn v(&self, x: u8) -> u8 {
        self.state.vx(x)
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn sp(&self) -> u8 {
        self.state.stack.pointer()
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer.load()
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer.load()
    }

    /// Read a byte of memory, address masked
    pub fn peek(&self, addr: u16) -> u8 {
        self.state.memory.read(addr)
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub(crate) fn report_stack(&mut self, access: StackAccess) {
        if access == StackAccess::Wrapped {
            let sp = self.state.stack.pointer();
            debug!("stack pointer wrapped to {}", sp);
            self.hooks.on_stack_wrap(sp);
        }
    }
}

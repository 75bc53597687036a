//! Callbacks for events a host may want to observe.
//!
//! None of them influence execution. Every method has an empty default, so
//! implementors only override what they care about. `()` ignores everything.

use heapless::{consts::U16, Vec};

/// Trait aggregating observable machine events
pub trait Hooks {
    /// A fetched word matched no instruction and was skipped
    ///
    /// Called by `step` with the address the word was fetched from
    fn on_unknown_opcode(&mut self, _addr: u16, _raw: u16) {}
    /// A call or return moved the stack pointer around the end of the stack
    ///
    /// Called by `step` with the stack pointer after the access
    fn on_stack_wrap(&mut self, _sp: u8) {}
    /// Sound timer switched between zero and non-zero
    ///
    /// Called by `step` when the timer is loaded and by `tick_timers` when it runs out
    fn on_sound(&mut self, _on: bool) {}
}

impl Hooks for () {}

/// Counts anomalies and remembers the first unknown opcodes seen
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    pub unknown_opcodes: usize,
    pub stack_wraps: usize,
    /// `(address, raw word)` of the first unknown opcodes, oldest first
    pub first_unknown: Vec<(u16, u16), U16>,
    pub sound: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hooks for Diagnostics {
    fn on_unknown_opcode(&mut self, addr: u16, raw: u16) {
        self.unknown_opcodes += 1;
        // full means we already hold the first 16
        let _ = self.first_unknown.push((addr, raw));
    }

    fn on_stack_wrap(&mut self, _sp: u8) {
        self.stack_wraps += 1;
    }

    fn on_sound(&mut self, on: bool) {
        self.sound = on;
    }
}

impl<H: Hooks + ?Sized> Hooks for &mut H {
    fn on_unknown_opcode(&mut self, addr: u16, raw: u16) {
        (**self).on_unknown_opcode(addr, raw)
    }

    fn on_stack_wrap(&mut self, sp: u8) {
        (**self).on_stack_wrap(sp)
    }

    fn on_sound(&mut self, on: bool) {
        (**self).on_sound(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_keep_first_unknown() {
        let mut diag = Diagnostics::new();
        for n in 0..20u16 {
            diag.on_unknown_opcode(0x200 + 2 * n, 0xFFFF);
        }
        assert_eq!(diag.unknown_opcodes, 20);
        assert_eq!(diag.first_unknown.len(), 16);
        assert_eq!(diag.first_unknown[0], (0x200, 0xFFFF));
        assert_eq!(diag.first_unknown[15], (0x21E, 0xFFFF));
    }

    #[test]
    fn diagnostics_track_sound_and_wraps() {
        let mut diag = Diagnostics::new();
        diag.on_sound(true);
        assert!(diag.sound);
        diag.on_sound(false);
        assert!(!diag.sound);
        diag.on_stack_wrap(0);
        diag.on_stack_wrap(15);
        assert_eq!(diag.stack_wraps, 2);
    }

    #[test]
    fn borrowed_hooks_forward() {
        fn wrap_twice<H: Hooks>(mut hooks: H) {
            hooks.on_stack_wrap(0);
            hooks.on_stack_wrap(0);
        }

        let mut diag = Diagnostics::new();
        wrap_twice(&mut diag);
        assert_eq!(diag.stack_wraps, 2);
    }
}

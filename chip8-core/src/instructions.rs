//! Semantics of the 35 instructions.
//!
//! Instructions that produce a flag write the result register first and VF
//! last, so when the destination is VF itself the flag is what remains.

use log::debug;
use nanorand::RNG;

use crate::hooks::Hooks;
use crate::machine::Machine;
use crate::memory::{glyph_addr, ADDR_MASK};
use crate::opcode::OpCode;

// OpCodes impls
impl<H: Hooks> Machine<H> {
    /// Run an already decoded instruction; `pc` must already point past it
    #[rustfmt::skip]
    pub fn execute(&mut self, opcode: OpCode) {
        match opcode {
            OpCode::_0NNN { nnn }     => self.exec_ml_subroutine_at(nnn),
            OpCode::_00E0             => self.clear_screen(),
            OpCode::_00EE             => self.subroutine_return(),
            OpCode::_1NNN { nnn }     => self.jump_to(nnn),
            OpCode::_2NNN { nnn }     => self.exec_subroutine_at(nnn),
            OpCode::_3XKK { x, kk }   => self.skip_if_vx_eq_kk(x, kk),
            OpCode::_4XKK { x, kk }   => self.skip_if_vx_ne_kk(x, kk),
            OpCode::_5XY0 { x, y }    => self.skip_if_vx_eq_vy(x, y),
            OpCode::_6XKK { x, kk }   => self.assign_vx_kk(x, kk),
            OpCode::_7XKK { x, kk }   => self.assign_add_vx_kk(x, kk),
            OpCode::_8XY0 { x, y }    => self.assign_vx_vy(x, y),
            OpCode::_8XY1 { x, y }    => self.assign_or_vx_vy(x, y),
            OpCode::_8XY2 { x, y }    => self.assign_and_vx_vy(x, y),
            OpCode::_8XY3 { x, y }    => self.assign_xor_vx_vy(x, y),
            OpCode::_8XY4 { x, y }    => self.assign_add_vx_vy(x, y),
            OpCode::_8XY5 { x, y }    => self.assign_sub_vx_vy(x, y),
            OpCode::_8XY6 { x, y }    => self.assign_vx_vy_shifted_r(x, y),
            OpCode::_8XY7 { x, y }    => self.assign_vx_vy_sub_vx(x, y),
            OpCode::_8XYE { x, y }    => self.assign_vx_vy_shifted_l(x, y),
            OpCode::_9XY0 { x, y }    => self.skip_if_vx_ne_vy(x, y),
            OpCode::_ANNN { nnn }     => self.assign_i_nnn(nnn),
            OpCode::_BNNN { nnn }     => self.jump_to_nnn_add_v0(nnn),
            OpCode::_CXKK { x, kk }   => self.assign_vx_random_and_kk(x, kk),
            OpCode::_DXYN { x, y, n } => self.draw_n_at_vx_vy(x, y, n),
            OpCode::_EX9E { x }       => self.skip_if_vx_in_keys(x),
            OpCode::_EXA1 { x }       => self.skip_if_vx_not_in_keys(x),
            OpCode::_FX07 { x }       => self.assign_vx_delay_t(x),
            OpCode::_FX0A { x }       => self.assign_vx_wait_for_key(x),
            OpCode::_FX15 { x }       => self.assign_delay_t_vx(x),
            OpCode::_FX18 { x }       => self.assign_sound_t_vx(x),
            OpCode::_FX1E { x }       => self.assign_add_i_vx(x),
            OpCode::_FX29 { x }       => self.assign_i_addr_of_sprite_vx(x),
            OpCode::_FX33 { x }       => self.assign_mem_at_i_bcd_of_vx(x),
            OpCode::_FX55 { x }       => self.assign_mem_at_i_v0_to_vx(x),
            OpCode::_FX65 { x }       => self.assign_v0_to_vx_mem_at_i(x),
        }
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.state.advance_pc(2);
        }
    }

    /// 0NNN { nnn: u16 },
    fn exec_ml_subroutine_at(&mut self, nnn: u16) {
        debug!("machine code routine at {:#05X} ignored", nnn);
    }

    /// 00E0,
    fn clear_screen(&mut self) {
        self.state.frame.clear();
    }

    /// 00EE,
    fn subroutine_return(&mut self) {
        let (addr, access) = self.state.stack.pop();
        self.state.pc = addr & ADDR_MASK;
        self.report_stack(access);
    }

    /// 1NNN { nnn: u16 },
    fn jump_to(&mut self, nnn: u16) {
        self.state.pc = nnn;
    }

    /// 2NNN { nnn: u16 },
    fn exec_subroutine_at(&mut self, nnn: u16) {
        let access = self.state.stack.push(self.state.pc);
        self.state.pc = nnn;
        self.report_stack(access);
    }

    /// 3XKK { x: u8, kk: u8 },
    fn skip_if_vx_eq_kk(&mut self, x: u8, kk: u8) {
        self.skip_if(self.state.vx(x) == kk);
    }

    /// 4XKK { x: u8, kk: u8 },
    fn skip_if_vx_ne_kk(&mut self, x: u8, kk: u8) {
        self.skip_if(self.state.vx(x) != kk);
    }

    /// 5XY0 { x: u8, y: u8 },
    fn skip_if_vx_eq_vy(&mut self, x: u8, y: u8) {
        self.skip_if(self.state.vx(x) == self.state.vx(y));
    }

    /// 6XKK { x: u8, kk: u8 },
    fn assign_vx_kk(&mut self, x: u8, kk: u8) {
        self.state.set_vx(x, kk);
    }

    /// 7XKK { x: u8, kk: u8 }, VF untouched
    fn assign_add_vx_kk(&mut self, x: u8, kk: u8) {
        self.state.set_vx(x, self.state.vx(x).wrapping_add(kk));
    }

    /// 8XY0 { x: u8, y: u8 },
    fn assign_vx_vy(&mut self, x: u8, y: u8) {
        self.state.set_vx(x, self.state.vx(y));
    }

    /// 8XY1 { x: u8, y: u8 },
    fn assign_or_vx_vy(&mut self, x: u8, y: u8) {
        self.state.set_vx(x, self.state.vx(x) | self.state.vx(y));
    }

    /// 8XY2 { x: u8, y: u8 },
    fn assign_and_vx_vy(&mut self, x: u8, y: u8) {
        self.state.set_vx(x, self.state.vx(x) & self.state.vx(y));
    }

    /// 8XY3 { x: u8, y: u8 },
    fn assign_xor_vx_vy(&mut self, x: u8, y: u8) {
        self.state.set_vx(x, self.state.vx(x) ^ self.state.vx(y));
    }

    /// 8XY4 { x: u8, y: u8 },
    fn assign_add_vx_vy(&mut self, x: u8, y: u8) {
        let sum = self.state.vx(x) as u16 + self.state.vx(y) as u16;
        self.state.set_vx(x, sum as u8);
        self.state.set_flag(sum > 0xFF);
    }

    /// 8XY5 { x: u8, y: u8 },
    fn assign_sub_vx_vy(&mut self, x: u8, y: u8) {
        let (value, borrow) = self.state.vx(x).overflowing_sub(self.state.vx(y));
        self.state.set_vx(x, value);
        self.state.set_flag(!borrow);
    }

    /// 8XY6 { x: u8, y: u8 },
    fn assign_vx_vy_shifted_r(&mut self, x: u8, y: u8) {
        let source = self.state.vx(y);
        self.state.set_vx(x, source >> 1);
        self.state.set_flag(source & 0x01 != 0);
    }

    /// 8XY7 { x: u8, y: u8 },
    fn assign_vx_vy_sub_vx(&mut self, x: u8, y: u8) {
        let (value, borrow) = self.state.vx(y).overflowing_sub(self.state.vx(x));
        self.state.set_vx(x, value);
        self.state.set_flag(!borrow);
    }

    /// 8XYE { x: u8, y: u8 },
    fn assign_vx_vy_shifted_l(&mut self, x: u8, y: u8) {
        let source = self.state.vx(y);
        self.state.set_vx(x, source << 1);
        self.state.set_flag(source & 0x80 != 0);
    }

    /// 9XY0 { x: u8, y: u8 },
    fn skip_if_vx_ne_vy(&mut self, x: u8, y: u8) {
        self.skip_if(self.state.vx(x) != self.state.vx(y));
    }

    /// ANNN { nnn: u16 },
    fn assign_i_nnn(&mut self, nnn: u16) {
        self.state.i = nnn;
    }

    /// BNNN { nnn: u16 },
    fn jump_to_nnn_add_v0(&mut self, nnn: u16) {
        self.state.pc = (nnn + self.state.v[0] as u16) & ADDR_MASK;
    }

    /// CXKK { x: u8, kk: u8 },
    fn assign_vx_random_and_kk(&mut self, x: u8, kk: u8) {
        let random = self.rng.generate::<u8>();
        self.state.set_vx(x, random & kk);
    }

    /// DXYN { x: u8, y: u8, n: u8 },
    ///
    /// Every lit sprite bit flips its own pixel, wrapping both coordinates on
    /// its own, so a sprite crossing the right or bottom edge continues on the
    /// opposite side.
    fn draw_n_at_vx_vy(&mut self, x: u8, y: u8, n: u8) {
        let origin_x = self.state.vx(x) as usize;
        let origin_y = self.state.vx(y) as usize;
        let mut collision = false;
        for row in 0..n as u16 {
            let sprite = self.state.memory.read(self.state.i.wrapping_add(row));
            for col in 0..8usize {
                if sprite & (0x80 >> col) != 0 {
                    collision |= self
                        .state
                        .frame
                        .flip_bit(origin_x + col, origin_y + row as usize);
                }
            }
        }
        self.state.set_flag(collision);
    }

    /// EX9E { x: u8 },
    fn skip_if_vx_in_keys(&mut self, x: u8) {
        self.skip_if(self.state.is_key_pressed(self.state.vx(x)));
    }

    /// EXA1 { x: u8 },
    fn skip_if_vx_not_in_keys(&mut self, x: u8) {
        self.skip_if(!self.state.is_key_pressed(self.state.vx(x)));
    }

    /// FX07 { x: u8 },
    fn assign_vx_delay_t(&mut self, x: u8) {
        self.state.set_vx(x, self.state.delay_timer.load());
    }

    /// FX0A { x: u8 }, resolved by `step`
    fn assign_vx_wait_for_key(&mut self, x: u8) {
        debug!("waiting for key into V{:X}", x);
        self.state.waiting_key = Some(x);
    }

    /// FX15 { x: u8 },
    fn assign_delay_t_vx(&mut self, x: u8) {
        self.state.delay_timer.store(self.state.vx(x));
    }

    /// FX18 { x: u8 },
    fn assign_sound_t_vx(&mut self, x: u8) {
        let was_on = self.state.sound_timer.is_active();
        self.state.sound_timer.store(self.state.vx(x));
        let is_on = self.state.sound_timer.is_active();
        if was_on != is_on {
            self.hooks.on_sound(is_on);
        }
    }

    /// FX1E { x: u8 },
    fn assign_add_i_vx(&mut self, x: u8) {
        let sum = (self.state.i & ADDR_MASK) + self.state.vx(x) as u16;
        self.state.i = sum & ADDR_MASK;
        self.state.set_flag(sum > ADDR_MASK);
    }

    /// FX29 { x: u8 },
    fn assign_i_addr_of_sprite_vx(&mut self, x: u8) {
        self.state.i = glyph_addr(self.state.vx(x));
    }

    /// FX33 { x: u8 },
    fn assign_mem_at_i_bcd_of_vx(&mut self, x: u8) {
        let value = self.state.vx(x);
        let i = self.state.i;
        self.state.memory.write(i, value / 100);
        self.state.memory.write(i.wrapping_add(1), value / 10 % 10);
        self.state.memory.write(i.wrapping_add(2), value % 10);
    }

    /// FX55 { x: u8 },
    fn assign_mem_at_i_v0_to_vx(&mut self, x: u8) {
        let i = self.state.i;
        for idx in 0..=x {
            self.state
                .memory
                .write(i.wrapping_add(idx as u16), self.state.vx(idx));
        }
        self.advance_i_past_block(x);
    }

    /// FX65 { x: u8 },
    fn assign_v0_to_vx_mem_at_i(&mut self, x: u8) {
        let i = self.state.i;
        for idx in 0..=x {
            let value = self.state.memory.read(i.wrapping_add(idx as u16));
            self.state.set_vx(idx, value);
        }
        self.advance_i_past_block(x);
    }

    fn advance_i_past_block(&mut self, x: u8) {
        if self.quirks.load_store_increments_i {
            self.state.i = self.state.i.wrapping_add(x as u16 + 1) & ADDR_MASK;
        }
    }
}

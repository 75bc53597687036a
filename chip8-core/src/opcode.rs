//! Opcode decoding and dispatch.
//!
//! Decoding splits a raw word into `Fields` and never fails. Dispatch picks the
//! single `OpCode` whose guard matches those fields, or reports `UnknownOpCode`.

use core::convert::TryFrom;
use core::fmt;

/// Every field an instruction can take its operands from
///
/// Examples:
/// ```
/// use chip8_core::opcode::Fields;
///
/// let fields = Fields::decode(0xD12F);
/// assert_eq!((fields.u, fields.x, fields.y, fields.p), (0xD, 0x1, 0x2, 0xF));
/// assert_eq!((fields.kk, fields.nnn), (0x2F, 0x12F));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Fields {
    /// Instruction class, bits 12-15
    pub u: u8,
    /// First register operand, bits 8-11
    pub x: u8,
    /// Second register operand, bits 4-7
    pub y: u8,
    /// Sub-opcode, bits 0-3
    pub p: u8,
    /// Immediate byte, bits 0-7
    pub kk: u8,
    /// Immediate address, bits 0-11
    pub nnn: u16,
}

impl Fields {
    fn read_first(raw: u16) -> u8 {
        (raw >> 12 & 0x000Fu16) as u8
    }

    fn read_last(raw: u16) -> u8 {
        (raw & 0x000Fu16) as u8
    }

    fn read_x(raw: u16) -> u8 {
        (raw >> 8 & 0x000Fu16) as u8
    }

    fn read_y(raw: u16) -> u8 {
        (raw >> 4 & 0x000Fu16) as u8
    }

    fn read_kk(raw: u16) -> u8 {
        (raw & 0x00FFu16) as u8
    }

    fn read_nnn(raw: u16) -> u16 {
        raw & 0x0FFFu16
    }

    pub fn decode(raw: u16) -> Self {
        Self {
            u: Self::read_first(raw),
            x: Self::read_x(raw),
            y: Self::read_y(raw),
            p: Self::read_last(raw),
            kk: Self::read_kk(raw),
            nnn: Self::read_nnn(raw),
        }
    }

    /// Reassemble the raw word
    pub fn raw(&self) -> u16 {
        (self.u as u16) << 12 | self.nnn
    }
}

/// Raw word that matches no instruction
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UnknownOpCode(pub u16);

impl fmt::Display for UnknownOpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown opcode {:#06X}", self.0)
    }
}

/// An enum representing 35 possible opcodes of chip-8 architecture
///
/// Based on [chip8 mastering](http://mattmik.com/files/chip8/mastering/chip8.html)
///
/// Examples:
/// ```
/// use core::convert::TryFrom;
/// use chip8_core::opcode::OpCode;
///
/// assert_eq!(OpCode::try_from(0x0ABCu16), Ok(OpCode::_0NNN { nnn: 0x0ABC }));
/// assert!(OpCode::try_from(0x5AB1u16).is_err());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpCode {
    /// Execute machine language subroutine at address NNN, ignored
    _0NNN { nnn: u16 },
    /// Clear the screen
    _00E0,
    /// Return from a subroutine
    _00EE,
    /// Jump to address NNN
    _1NNN { nnn: u16 },
    /// Execute subroutine starting at address NNN
    _2NNN { nnn: u16 },
    /// Skip the following instruction if the value of register VX equals KK
    _3XKK { x: u8, kk: u8 },
    /// Skip the following instruction if the value of register VX is not equal to KK
    _4XKK { x: u8, kk: u8 },
    /// Skip the following instruction if the value of register VX is equal to the value of register VY
    _5XY0 { x: u8, y: u8 },
    /// Store number KK in register VX
    _6XKK { x: u8, kk: u8 },
    /// Add the value KK to register VX
    _7XKK { x: u8, kk: u8 },
    /// Store the value of register VY in register VX
    _8XY0 { x: u8, y: u8 },
    /// Set VX to VX OR VY
    _8XY1 { x: u8, y: u8 },
    /// Set VX to VX AND VY
    _8XY2 { x: u8, y: u8 },
    /// Set VX to VX XOR VY
    _8XY3 { x: u8, y: u8 },
    /// Add the value of register VY to register VX, Set VF to 01 if a carry occurs, Set VF to 00 if a carry does not occur
    _8XY4 { x: u8, y: u8 },
    /// Subtract the value of register VY from register VX, Set VF to 00 if a borrow occurs, Set VF to 01 if a borrow does not occur
    _8XY5 { x: u8, y: u8 },
    /// Store the value of register VY shifted right one bit in register VX, Set register VF to the least significant bit prior to the shift
    _8XY6 { x: u8, y: u8 },
    /// Set register VX to the value of VY minus VX, Set VF to 00 if a borrow occurs, Set VF to 01 if a borrow does not occur
    _8XY7 { x: u8, y: u8 },
    /// Store the value of register VY shifted left one bit in register VX, Set register VF to the most significant bit prior to the shift
    _8XYE { x: u8, y: u8 },
    /// Skip the following instruction if the value of register VX is not equal to the value of register VY
    _9XY0 { x: u8, y: u8 },
    /// Store memory address NNN in register I
    _ANNN { nnn: u16 },
    /// Jump to address NNN + V0
    _BNNN { nnn: u16 },
    /// Set VX to a random number with a mask of KK
    _CXKK { x: u8, kk: u8 },
    /// Draw a sprite at position VX, VY with N bytes of sprite data starting at the address stored in I, Set VF to 01 if any set pixels are changed to unset, and 00 otherwise
    _DXYN { x: u8, y: u8, n: u8 },
    /// Skip the following instruction if the key corresponding to the hex value currently stored in register VX is pressed
    _EX9E { x: u8 },
    /// Skip the following instruction if the key corresponding to the hex value currently stored in register VX is not pressed
    _EXA1 { x: u8 },
    /// Store the current value of the delay timer in register VX
    _FX07 { x: u8 },
    /// Wait for a keypress and store the result in register VX
    _FX0A { x: u8 },
    /// Set the delay timer to the value of register VX
    _FX15 { x: u8 },
    /// Set the sound timer to the value of register VX
    _FX18 { x: u8 },
    /// Add the value stored in register VX to register I, Set VF to 01 if I leaves the address space
    _FX1E { x: u8 },
    /// Set I to the memory address of the sprite data corresponding to the hexadecimal digit stored in register VX
    _FX29 { x: u8 },
    /// Store the binary-coded decimal equivalent of the value stored in register VX at addresses I, I+1, and I+2
    _FX33 { x: u8 },
    /// Store the values of registers V0 to VX inclusive in memory starting at address I
    _FX55 { x: u8 },
    /// Fill registers V0 to VX inclusive with the values stored in memory starting at address I
    _FX65 { x: u8 },
}

impl TryFrom<Fields> for OpCode {
    type Error = UnknownOpCode;

    /// Guards are checked class nibble first, then sub-opcode; the first match wins.
    fn try_from(f: Fields) -> Result<Self, Self::Error> {
        let Fields { u, x, y, p, kk, nnn } = f;
        let opcode = match (u, p) {
            (0x0, _) => match nnn {
                0x0E0 => OpCode::_00E0,
                0x0EE => OpCode::_00EE,
                nnn => OpCode::_0NNN { nnn },
            },
            (0x1, _) => OpCode::_1NNN { nnn },
            (0x2, _) => OpCode::_2NNN { nnn },
            (0x3, _) => OpCode::_3XKK { x, kk },
            (0x4, _) => OpCode::_4XKK { x, kk },
            (0x5, 0x0) => OpCode::_5XY0 { x, y },
            (0x6, _) => OpCode::_6XKK { x, kk },
            (0x7, _) => OpCode::_7XKK { x, kk },
            (0x8, 0x0) => OpCode::_8XY0 { x, y },
            (0x8, 0x1) => OpCode::_8XY1 { x, y },
            (0x8, 0x2) => OpCode::_8XY2 { x, y },
            (0x8, 0x3) => OpCode::_8XY3 { x, y },
            (0x8, 0x4) => OpCode::_8XY4 { x, y },
            (0x8, 0x5) => OpCode::_8XY5 { x, y },
            (0x8, 0x6) => OpCode::_8XY6 { x, y },
            (0x8, 0x7) => OpCode::_8XY7 { x, y },
            (0x8, 0xE) => OpCode::_8XYE { x, y },
            (0x9, 0x0) => OpCode::_9XY0 { x, y },
            (0xA, _) => OpCode::_ANNN { nnn },
            (0xB, _) => OpCode::_BNNN { nnn },
            (0xC, _) => OpCode::_CXKK { x, kk },
            (0xD, n) => OpCode::_DXYN { x, y, n },
            (0xE, _) => match kk {
                0x9E => OpCode::_EX9E { x },
                0xA1 => OpCode::_EXA1 { x },
                _ => return Err(UnknownOpCode(f.raw())),
            },
            (0xF, _) => match kk {
                0x07 => OpCode::_FX07 { x },
                0x0A => OpCode::_FX0A { x },
                0x15 => OpCode::_FX15 { x },
                0x18 => OpCode::_FX18 { x },
                0x1E => OpCode::_FX1E { x },
                0x29 => OpCode::_FX29 { x },
                0x33 => OpCode::_FX33 { x },
                0x55 => OpCode::_FX55 { x },
                0x65 => OpCode::_FX65 { x },
                _ => return Err(UnknownOpCode(f.raw())),
            },
            _ => return Err(UnknownOpCode(f.raw())),
        };
        Ok(opcode)
    }
}

impl TryFrom<u16> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        OpCode::try_from(Fields::decode(raw))
    }
}

impl fmt::Display for OpCode {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OpCode::_0NNN { nnn }     => write!(f, "sys {:#05X}", nnn),
            OpCode::_00E0             => write!(f, "cls"),
            OpCode::_00EE             => write!(f, "ret"),
            OpCode::_1NNN { nnn }     => write!(f, "jp {:#05X}", nnn),
            OpCode::_2NNN { nnn }     => write!(f, "call {:#05X}", nnn),
            OpCode::_3XKK { x, kk }   => write!(f, "se V{:X}, {:#04X}", x, kk),
            OpCode::_4XKK { x, kk }   => write!(f, "sne V{:X}, {:#04X}", x, kk),
            OpCode::_5XY0 { x, y }    => write!(f, "se V{:X}, V{:X}", x, y),
            OpCode::_6XKK { x, kk }   => write!(f, "ld V{:X}, {:#04X}", x, kk),
            OpCode::_7XKK { x, kk }   => write!(f, "add V{:X}, {:#04X}", x, kk),
            OpCode::_8XY0 { x, y }    => write!(f, "ld V{:X}, V{:X}", x, y),
            OpCode::_8XY1 { x, y }    => write!(f, "or V{:X}, V{:X}", x, y),
            OpCode::_8XY2 { x, y }    => write!(f, "and V{:X}, V{:X}", x, y),
            OpCode::_8XY3 { x, y }    => write!(f, "xor V{:X}, V{:X}", x, y),
            OpCode::_8XY4 { x, y }    => write!(f, "add V{:X}, V{:X}", x, y),
            OpCode::_8XY5 { x, y }    => write!(f, "sub V{:X}, V{:X}", x, y),
            OpCode::_8XY6 { x, y }    => write!(f, "shr V{:X}, V{:X}", x, y),
            OpCode::_8XY7 { x, y }    => write!(f, "subn V{:X}, V{:X}", x, y),
            OpCode::_8XYE { x, y }    => write!(f, "shl V{:X}, V{:X}", x, y),
            OpCode::_9XY0 { x, y }    => write!(f, "sne V{:X}, V{:X}", x, y),
            OpCode::_ANNN { nnn }     => write!(f, "ld I, {:#05X}", nnn),
            OpCode::_BNNN { nnn }     => write!(f, "jp V0, {:#05X}", nnn),
            OpCode::_CXKK { x, kk }   => write!(f, "rnd V{:X}, {:#04X}", x, kk),
            OpCode::_DXYN { x, y, n } => write!(f, "drw V{:X}, V{:X}, {}", x, y, n),
            OpCode::_EX9E { x }       => write!(f, "skp V{:X}", x),
            OpCode::_EXA1 { x }       => write!(f, "sknp V{:X}", x),
            OpCode::_FX07 { x }       => write!(f, "ld V{:X}, DT", x),
            OpCode::_FX0A { x }       => write!(f, "ld V{:X}, K", x),
            OpCode::_FX15 { x }       => write!(f, "ld DT, V{:X}", x),
            OpCode::_FX18 { x }       => write!(f, "ld ST, V{:X}", x),
            OpCode::_FX1E { x }       => write!(f, "add I, V{:X}", x),
            OpCode::_FX29 { x }       => write!(f, "ld F, V{:X}", x),
            OpCode::_FX33 { x }       => write!(f, "ld B, V{:X}", x),
            OpCode::_FX55 { x }       => write!(f, "ld [I], V{:X}", x),
            OpCode::_FX65 { x }       => write!(f, "ld V{:X}, [I]", x),
        }
    }
}

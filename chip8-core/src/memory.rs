//! The 4K address space of the machine.
//!
//! Every address handed to `Memory` is masked to 12 bits, so reads and writes
//! past `0xFFF` wrap around to the start instead of faulting.

/// How much RAM we have
pub const MEM_LENGTH: usize = 0x1000;
/// Mask applied to every address
pub const ADDR_MASK: u16 = 0x0FFF;
/// Where programs are conventionally loaded
pub const PROGRAM_ADDR: u16 = 0x0200;
/// Where the built-in hex font lives
pub const FONT_ADDR: u16 = 0x0050;
/// Bytes per font glyph
pub const GLYPH_LEN: u16 = 5;

pub const FONT: [u8; 16 * GLYPH_LEN as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for the low nibble of `digit`
#[inline]
pub fn glyph_addr(digit: u8) -> u16 {
    FONT_ADDR + (digit & 0x0F) as u16 * GLYPH_LEN
}

/// Byte-addressable RAM with wrapping 12-bit addressing
#[derive(Clone)]
pub struct Memory([u8; MEM_LENGTH]);

impl Memory {
    /// Zeroed memory with the font installed
    pub fn new() -> Self {
        let mut memory = Self([0; MEM_LENGTH]);
        memory.write_all(FONT_ADDR, &FONT);
        memory
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.0[(addr & ADDR_MASK) as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.0[(addr & ADDR_MASK) as usize] = value;
    }

    /// Big-endian word made of the bytes at `addr` and `addr + 1`, each masked
    /// on its own so a word at `0xFFF` takes its low byte from `0x000`.
    #[inline]
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Copy `data` starting at `addr`, wrapping past the end of memory
    pub fn write_all(&mut self, addr: u16, data: &[u8]) {
        data.iter()
            .enumerate()
            .for_each(|(offset, &byte)| self.write(addr.wrapping_add(offset as u16), byte));
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

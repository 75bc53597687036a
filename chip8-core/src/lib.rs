#![no_std]
pub mod builder;
pub mod frame;
pub mod hooks;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod state;
pub mod timer;
pub mod utils;

pub use builder::Builder;
pub use frame::{Frame, FrameView, HEIGHT, WIDTH};
pub use hooks::{Diagnostics, Hooks};
pub use machine::{Machine, Quirks};
pub use opcode::{Fields, OpCode, UnknownOpCode};

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;

use crate::hooks::Hooks;
use crate::machine::{Machine, Quirks};
use crate::memory::PROGRAM_ADDR;

/// Assembles a ready to run `Machine`
///
/// Program and seed are mandatory; hooks default to `()` and quirks to
/// `Quirks::default()`.
pub struct Builder<'a, H: Hooks> {
    hooks: H,
    program: Option<&'a [u8]>,
    seed: Option<u128>,
    quirks: Quirks,
    load_at: u16,
}

impl<'a> Builder<'a, ()> {
    pub fn new() -> Self {
        Self {
            hooks: (),
            program: None,
            seed: None,
            quirks: Quirks::default(),
            load_at: PROGRAM_ADDR,
        }
    }
}

impl<'a> Default for Builder<'a, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, H: Hooks> Builder<'a, H> {
    pub fn with_hooks<G: Hooks>(self, hooks: G) -> Builder<'a, G> {
        Builder {
            hooks,
            program: self.program,
            seed: self.seed,
            quirks: self.quirks,
            load_at: self.load_at,
        }
    }

    pub fn with_program(mut self, prog: &'a [u8]) -> Self {
        self.program = Some(prog);
        self
    }

    pub fn with_seed(mut self, seed: u128) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Load the program and start executing at `addr` instead of 0x200
    pub fn load_at(mut self, addr: u16) -> Self {
        self.load_at = addr;
        self
    }

    pub fn build(self) -> Result<Machine<H>, &'static str> {
        let program = self.program.ok_or("Program not provided")?;
        let seed = self.seed.ok_or("Seed not provided")?;
        let mut machine = Machine::new(seed, self.hooks)
            .with_quirks(self.quirks)
            .with_entry(self.load_at);
        machine.load(self.load_at, program);
        Ok(machine)
    }
}

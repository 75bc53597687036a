use std::thread;
use std::time::{Duration, Instant};

use chip8_core::{Hooks, Machine};
use log::{debug, info};

/// Rate of the delay and sound timers in emulated time
pub const TIMER_HZ: u64 = 60;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Why a run stopped
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stop {
    /// Executed the whole cycle budget
    Budget,
    /// Blocked on `ld Vx, K` with nobody to press a key
    WaitingForKey,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub cycles: u64,
    pub timer_ticks: u64,
    pub stop: Stop,
}

/// Interleaves instruction steps with 60Hz timer ticks
///
/// Timer ticks follow the number of executed steps, so runs are reproducible.
/// With `realtime` the loop additionally sleeps to match wall clock time.
pub struct Clock {
    ips: u64,
    realtime: bool,
}

impl Clock {
    pub fn new(ips: u64, realtime: bool) -> Self {
        Self {
            ips: ips.max(1),
            realtime,
        }
    }

    pub fn run<H: Hooks>(&self, machine: &mut Machine<H>, budget: u64) -> Report {
        info!("running {} cycles at {} ips", budget, self.ips);
        let started = Instant::now();
        let mut timer_ticks = 0;
        let mut cycles = 0;
        let mut stop = Stop::Budget;

        while cycles < budget {
            if let Err(nb::Error::WouldBlock) = machine.step() {
                debug!("blocked on key input after {} cycles", cycles);
                stop = Stop::WaitingForKey;
                break;
            }
            cycles += 1;

            let due = (cycles as u128 * TIMER_HZ as u128 / self.ips as u128) as u64;
            while timer_ticks < due {
                machine.tick_timers();
                timer_ticks += 1;
            }

            if self.realtime {
                if let Some(target) = started.checked_add(self.emulated(cycles)) {
                    let now = Instant::now();
                    if target > now {
                        thread::sleep(target - now);
                    }
                }
            }
        }

        Report {
            cycles,
            timer_ticks,
            stop,
        }
    }

    /// Wall clock time `cycles` instructions take at the configured rate
    fn emulated(&self, cycles: u64) -> Duration {
        let nanos = (cycles % self.ips) as u128 * NANOS_PER_SEC as u128 / self.ips as u128;
        Duration::from_secs(cycles / self.ips) + Duration::from_nanos(nanos as u64)
    }
}

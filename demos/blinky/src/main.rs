//! Host driver for the blinky machine.
//!
//! Dispatches `DO` every tick and prints each LED change.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::info;

use hsm_blinky::{blinky, BlinkyEvent, Platform, DEFAULT_PERIOD_MS};

#[derive(Parser, Debug)]
#[command(name = "hsm-blinky", version, about = "Blink a console LED with a hierarchical state machine")]
struct Args {
    /// Time spent in each LED state
    #[arg(short, long, default_value_t = DEFAULT_PERIOD_MS)]
    period_ms: u32,

    /// Stop after this many LED changes (0 runs forever)
    #[arg(short, long, default_value_t = 10)]
    toggles: u32,

    /// Interval between DO events
    #[arg(long, default_value_t = 1)]
    tick_ms: u64,
}

/// Console LED with a monotonic clock
struct HostPlatform {
    epoch: Instant,
}

impl Platform for HostPlatform {
    fn now_ms(&self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }

    fn set_led(&mut self, on: bool) {
        println!("[{:>8} ms] LED {}", self.now_ms(), if on { "ON" } else { "OFF" });
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let platform = HostPlatform {
        epoch: Instant::now(),
    };
    let mut sm = blinky(platform, args.period_ms);
    sm.start().context("starting blinky")?;
    info!("blinky started in {}, period {} ms", sm.state_name(), args.period_ms);

    let tick = Duration::from_millis(args.tick_ms);
    let mut toggles = 0;
    while args.toggles == 0 || toggles < args.toggles {
        let outcome = sm
            .dispatch_event(BlinkyEvent::Do)
            .context("dispatching DO")?;
        if outcome.is_transition() {
            toggles += 1;
        }
        thread::sleep(tick);
    }

    info!("blinky done after {} changes, in {}", toggles, sm.state_name());
    Ok(())
}

#![no_std]
#![forbid(unsafe_code)]

//! Blinky: the smallest useful machine.
//!
//! ```text
//! ROOT
//! ├── LED_OFF  --[DO, elapsed >= period]--> LED_ON
//! └── LED_ON   --[DO, elapsed >= period]--> LED_OFF
//! ```
//!
//! The chart knows nothing about the target: the clock and the LED come in
//! through [`Platform`], owned by the machine's vars.

use hsm_core::{define_events, define_states, transition, StateChart, StateReturn};
use hsm_engine::{Machine, MachineConfig};

/// Default time spent in each LED state
pub const DEFAULT_PERIOD_MS: u32 = 500;

define_states! {
    pub enum BlinkyState {
        Root => "ROOT",
        LedOff => "LED_OFF",
        LedOn => "LED_ON",
    }
}

define_events! {
    pub enum BlinkyEvent {
        Do => "DO",
    }
}

/// Target primitives the chart depends on
pub trait Platform {
    /// Free-running millisecond clock; may wrap
    fn now_ms(&self) -> u32;

    fn set_led(&mut self, on: bool);
}

/// User variables of the blinky machine
#[derive(Debug)]
pub struct BlinkyVars<P> {
    /// When the current LED state was entered
    pub timer_started_at_ms: u32,
    pub period_ms: u32,
    pub platform: P,
}

impl<P: Platform> BlinkyVars<P> {
    pub fn new(platform: P, period_ms: u32) -> Self {
        Self {
            timer_started_at_ms: 0,
            period_ms,
            platform,
        }
    }

    fn restart_timer(&mut self) {
        self.timer_started_at_ms = self.platform.now_ms();
    }

    fn period_elapsed(&self) -> bool {
        self.platform.now_ms().wrapping_sub(self.timer_started_at_ms) >= self.period_ms
    }
}

/// The blinky chart
pub struct Blinky<P>(core::marker::PhantomData<P>);

impl<P: Platform> StateChart for Blinky<P> {
    type State = BlinkyState;
    type Event = BlinkyEvent;
    type Vars = BlinkyVars<P>;

    fn parent(state: BlinkyState) -> Option<BlinkyState> {
        match state {
            BlinkyState::Root => None,
            BlinkyState::LedOff | BlinkyState::LedOn => Some(BlinkyState::Root),
        }
    }

    fn initial(state: BlinkyState) -> Option<BlinkyState> {
        match state {
            BlinkyState::Root => Some(BlinkyState::LedOff),
            _ => None,
        }
    }

    fn entry(state: BlinkyState, vars: &mut BlinkyVars<P>) {
        match state {
            BlinkyState::Root => {}
            BlinkyState::LedOff => {
                vars.platform.set_led(false);
                vars.restart_timer();
            }
            BlinkyState::LedOn => {
                vars.platform.set_led(true);
                vars.restart_timer();
            }
        }
    }

    fn handle(
        state: BlinkyState,
        event: BlinkyEvent,
        vars: &mut BlinkyVars<P>,
    ) -> StateReturn<BlinkyState, BlinkyVars<P>> {
        match (state, event) {
            (BlinkyState::LedOff, BlinkyEvent::Do) if vars.period_elapsed() => {
                transition(BlinkyState::LedOn)
            }
            (BlinkyState::LedOn, BlinkyEvent::Do) if vars.period_elapsed() => {
                transition(BlinkyState::LedOff)
            }
            _ => StateReturn::Super,
        }
    }
}

/// A blinky machine on platform `P`
pub type BlinkyMachine<P> = Machine<Blinky<P>>;

/// Construct an unstarted blinky machine
pub fn blinky<P: Platform>(platform: P, period_ms: u32) -> BlinkyMachine<P> {
    let config = MachineConfig::builder().name("blinky").spy_id(1).build();
    Machine::with_config(BlinkyVars::new(platform, period_ms), config)
}

// src/host.rs - What the tracker asks of the host application
use std::cell::Cell;

/// Host evaluation step. Only equality matters.
pub type ClockTick = i64;

pub trait HostClock {
    fn current_tick(&self) -> ClockTick;
}

/// Boolean node parameters, read fresh on every track call.
pub trait ParameterSource {
    fn evaluate(&self, name: &str) -> bool;
}

pub const PARM_HANDS: &str = "hands";
pub const PARM_ARMS: &str = "arms";

/// Clock the caller steps by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: Cell<ClockTick>,
}

impl ManualClock {
    pub fn new(start: ClockTick) -> Self {
        Self { tick: Cell::new(start) }
    }

    pub fn set(&self, tick: ClockTick) {
        self.tick.set(tick);
    }

    pub fn advance(&self) -> ClockTick {
        let next = self.tick.get() + 1;
        self.tick.set(next);
        next
    }
}

impl HostClock for ManualClock {
    fn current_tick(&self) -> ClockTick {
        self.tick.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleParams {
    pub hands: bool,
    pub arms: bool,
}

impl ParameterSource for ToggleParams {
    fn evaluate(&self, name: &str) -> bool {
        match name {
            PARM_HANDS => self.hands,
            PARM_ARMS => self.arms,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_steps() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.current_tick(), 10);
        assert_eq!(clock.advance(), 11);
        clock.set(3);
        assert_eq!(clock.current_tick(), 3);
    }

    #[test]
    fn test_toggle_params() {
        let params = ToggleParams { hands: true, arms: false };
        assert!(params.evaluate(PARM_HANDS));
        assert!(!params.evaluate(PARM_ARMS));
        assert!(!params.evaluate("tips"));
    }
}

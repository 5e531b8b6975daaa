//! Stand-ins for the hardware so the sampler can run on a development host.

use std::{thread, time::Duration};

use embedded_hal::delay::DelayNs;

use crate::{
    config::Resolution,
    gpio::{AnalogInError, AnalogSource},
};

/// Analog source replaying a fixed list of codes in a loop
pub struct SimulatedAdc {
    codes: Vec<u16>,
    next: usize,
}

impl SimulatedAdc {
    /// A source that replays `codes` in order, starting over after the last one.
    /// An empty list yields 0 on every read.
    pub fn from_codes(codes: Vec<u16>) -> Self {
        let codes = if codes.is_empty() { vec![0] } else { codes };
        Self { codes, next: 0 }
    }

    /// A sawtooth over the whole range of `resolution`, climbing `step` codes per read
    pub fn ramp(resolution: Resolution, step: u16) -> Self {
        let codes = (0..=resolution.full_scale())
            .step_by(step.max(1) as usize)
            .collect();
        Self::from_codes(codes)
    }
}

impl AnalogSource for SimulatedAdc {
    fn read_raw(&mut self) -> Result<u16, AnalogInError> {
        let code = self.codes[self.next];
        self.next = (self.next + 1) % self.codes.len();
        Ok(code)
    }
}

/// `DelayNs` implementation that puts the current thread to sleep
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64))
    }
}

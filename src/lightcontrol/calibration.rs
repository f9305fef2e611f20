/*
 * Deadband calibration.
 *
 * Each axis gets a window of (sample - tolerance, sample + tolerance) around
 * its power-on resting position. The sampling loop recomputes the window on
 * every pass, so the final sample on each axis is the one that defines its
 * deadband; samples are not averaged.
 */

use crate::ports::{Channel, PulseInput};

pub const CALIBRATION_SAMPLES: usize = 10;

pub const THROTTLE_TOLERANCE_US: i32 = 25;
pub const SWITCH_TOLERANCE_US: i32 = 50;

/// A contiguous pulse-width interval treated as "neutral". Bounds are signed:
/// a dead channel samples 0 and yields a window below zero, which keeps the
/// comparisons well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub low: i32,
    pub high: i32,
}

impl Window {
    pub const fn around(center: i32, tolerance: i32) -> Self {
        Window {
            low: center - tolerance,
            high: center + tolerance,
        }
    }

    pub const fn contains(&self, value: i32) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The windows derived at power-up. `garland` is present only when the build
/// polls a garland channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub throttle: Window,
    pub switch: Window,
    pub garland: Option<Window>,
}

pub(crate) fn sample_channels<P: PulseInput>(input: &mut P, garland_channel: bool) -> Calibration {
    let mut throttle = Window::around(0, THROTTLE_TOLERANCE_US);
    let mut switch = Window::around(0, SWITCH_TOLERANCE_US);
    let mut garland = None;

    for _ in 0..CALIBRATION_SAMPLES {
        let sample = input.read_pulse_width(Channel::Throttle) as i32;
        throttle = Window::around(sample, THROTTLE_TOLERANCE_US);

        let sample = input.read_pulse_width(Channel::Switch) as i32;
        switch = Window::around(sample, SWITCH_TOLERANCE_US);

        if garland_channel {
            let sample = input.read_pulse_width(Channel::Garland) as i32;
            garland = Some(Window::around(sample, SWITCH_TOLERANCE_US));
        }
    }

    Calibration {
        throttle,
        switch,
        garland,
    }
}

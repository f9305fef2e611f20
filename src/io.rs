/*
 * The I/O module for the light controller.
 *
 * This module is the only part of the program that is device-specific. It
 * measures receiver pulses by busy-waiting on the input pins, Arduino
 * pulseIn-style, and maps the logical lamps onto the output pins. Everything
 * above it works in plain microsecond and boolean terms through the port
 * traits.
 */

use embassy_stm32::gpio::{Input, Level, Output};
use embassy_time::{Duration, Instant};
use enum_ordinalize::Ordinalize;

use rc_light_control::ports::{Channel, Lamp, LampOutput, PulseInput};

/// Upper bound on one pulse measurement. A 50 Hz receiver frame is 20 ms, so
/// nothing arriving within this window means the channel is dead.
pub const PULSE_TIMEOUT: Duration = Duration::from_millis(30);

pub struct ReceiverPins<'d> {
    throttle: Input<'d>,
    switch: Input<'d>,
    garland: Option<Input<'d>>,
}

impl<'d> ReceiverPins<'d> {
    pub fn new(throttle: Input<'d>, switch: Input<'d>, garland: Option<Input<'d>>) -> Self {
        Self {
            throttle,
            switch,
            garland,
        }
    }
}

impl PulseInput for ReceiverPins<'_> {
    fn read_pulse_width(&mut self, channel: Channel) -> u32 {
        match channel {
            Channel::Throttle => measure_pulse(&self.throttle),
            Channel::Switch => measure_pulse(&self.switch),
            Channel::Garland => match &self.garland {
                Some(pin) => measure_pulse(pin),
                None => 0,
            },
        }
    }
}

// Wait out any pulse already in progress, then time the next active-high one.
fn measure_pulse(pin: &Input) -> u32 {
    let deadline = Instant::now() + PULSE_TIMEOUT;

    while pin.is_high() {
        if Instant::now() >= deadline {
            return 0;
        }
    }
    while pin.is_low() {
        if Instant::now() >= deadline {
            return 0;
        }
    }
    let rise = Instant::now();
    while pin.is_high() {
        if Instant::now() >= deadline {
            return 0;
        }
    }

    rise.elapsed().as_micros() as u32
}

pub struct LampPins<'d> {
    outputs: [Output<'d>; Lamp::VARIANT_COUNT],
}

impl<'d> LampPins<'d> {
    /// Outputs in `Lamp` declaration order.
    pub fn new(
        reverse: Output<'d>,
        stop: Output<'d>,
        running_left: Output<'d>,
        running_right: Output<'d>,
        headlight: Output<'d>,
        garland: Output<'d>,
    ) -> Self {
        Self {
            outputs: [reverse, stop, running_left, running_right, headlight, garland],
        }
    }
}

impl LampOutput for LampPins<'_> {
    fn set_level(&mut self, lamp: Lamp, on: bool) {
        self.outputs[lamp.ordinal()].set_level(level(on));
    }
}

// Deal with the bool-to-level mapping in one place, so that the control
// logic can just use easy to understand `true` for on logic.
fn level(on: bool) -> Level {
    if on { Level::High } else { Level::Low }
}

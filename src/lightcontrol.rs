pub mod calibration;

use enum_ordinalize::Ordinalize;

use crate::alarm::AlarmBlinker;
use crate::lightcontrol::calibration::{Calibration, Window};
use crate::ports::{Channel, Lamp, LampOutput, PulseInput};

// Fixed switch ranges for the three-channel build, in microseconds. Both
// ranges are exclusive; exactly 1600 falls through to the all-off branch.
const RUNNING_BAND_LOW_US: i32 = 1400;
const RUNNING_BAND_HIGH_US: i32 = 1600;
const HEADLIGHT_BAND_HIGH_US: i32 = 2100;

const _: () = assert!(RUNNING_BAND_LOW_US < RUNNING_BAND_HIGH_US);
const _: () = assert!(RUNNING_BAND_HIGH_US < HEADLIGHT_BAND_HIGH_US);

/// How the headlight switch channel is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPolicy {
    /// Any position outside the calibrated deadband turns the lights on.
    CalibratedWindow,
    /// Fixed literal pulse ranges select running lights or headlight.
    FixedRanges,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub switch_policy: SwitchPolicy,
    pub garland_channel: bool,
}

impl Config {
    /// Throttle plus one switch; the switch drives headlight and running
    /// lights together off its calibrated deadband.
    pub const fn two_channel() -> Self {
        Config {
            switch_policy: SwitchPolicy::CalibratedWindow,
            garland_channel: false,
        }
    }

    /// Throttle, a headlight switch on fixed ranges, and a garland switch on
    /// its calibrated deadband.
    pub const fn three_channel() -> Self {
        Config {
            switch_policy: SwitchPolicy::FixedRanges,
            garland_channel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    BootCheck,
    Calibrating,
    Running,
}

/// Owns every piece of controller state: the mode, the calibration windows
/// and the alarm pattern. Pin knowledge stays behind the two ports.
#[derive(Debug)]
pub struct LightController {
    config: Config,
    mode: Mode,
    calibration: Option<Calibration>,
    alarm: AlarmBlinker,
}

impl LightController {
    pub fn new(config: Config) -> Self {
        LightController {
            config,
            mode: Mode::BootCheck,
            calibration: None,
            alarm: AlarmBlinker::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// One pass of the control loop. Re-entered forever by the main loop;
    /// a single call takes a freshly powered controller all the way through
    /// boot check and calibration into its first evaluation when the
    /// receiver is already transmitting.
    pub fn poll<P: PulseInput, L: LampOutput>(
        &mut self,
        input: &mut P,
        lamps: &mut L,
        now_ms: u64,
    ) {
        if self.mode == Mode::BootCheck {
            let throttle = input.read_pulse_width(Channel::Throttle);
            let switch = input.read_pulse_width(Channel::Switch);
            if throttle == 0 && switch == 0 {
                // Receiver not bound or transmitter off. Blink until any
                // channel produces a pulse.
                if let Some(level) = self.alarm.tick(now_ms) {
                    lamps.set_level(Lamp::RunningLeft, level);
                    lamps.set_level(Lamp::RunningRight, level);
                }
                return;
            }
            self.mode = Mode::Calibrating;
        }

        if self.mode == Mode::Calibrating {
            self.calibrate(input, lamps);
            self.mode = Mode::Running;
        }

        let Some(calibration) = self.calibration else {
            return;
        };
        self.evaluate_throttle(input, lamps, calibration.throttle);
        self.evaluate_switch(input, lamps, &calibration);
    }

    /// Derive the deadband windows. Runs to completion before anything else
    /// gets the loop back, and only ever once: a second call is a no-op.
    /// Every lamp is driven HIGH while sampling as a visible indicator.
    pub fn calibrate<P: PulseInput, L: LampOutput>(&mut self, input: &mut P, lamps: &mut L) {
        if self.calibration.is_some() {
            return;
        }

        for lamp in Lamp::VARIANTS.iter().copied() {
            lamps.set_level(lamp, true);
        }

        let calibration = calibration::sample_channels(input, self.config.garland_channel);

        for lamp in Lamp::VARIANTS.iter().copied() {
            lamps.set_level(lamp, false);
        }

        self.calibration = Some(calibration);
    }

    fn evaluate_throttle<P: PulseInput, L: LampOutput>(
        &self,
        input: &mut P,
        lamps: &mut L,
        window: Window,
    ) {
        let value = input.read_pulse_width(Channel::Throttle) as i32;

        lamps.set_level(Lamp::Reverse, value < window.low);
        lamps.set_level(Lamp::Stop, window.contains(value));
    }

    fn evaluate_switch<P: PulseInput, L: LampOutput>(
        &self,
        input: &mut P,
        lamps: &mut L,
        calibration: &Calibration,
    ) {
        let value = input.read_pulse_width(Channel::Switch) as i32;

        match self.config.switch_policy {
            SwitchPolicy::CalibratedWindow => {
                let moved = !calibration.switch.contains(value);
                lamps.set_level(Lamp::Headlight, moved);
                lamps.set_level(Lamp::RunningLeft, moved);
                lamps.set_level(Lamp::RunningRight, moved);
            }
            SwitchPolicy::FixedRanges => {
                if value > RUNNING_BAND_LOW_US && value < RUNNING_BAND_HIGH_US {
                    lamps.set_level(Lamp::RunningLeft, true);
                    lamps.set_level(Lamp::RunningRight, true);
                    lamps.set_level(Lamp::Headlight, false);
                } else if value > RUNNING_BAND_HIGH_US && value < HEADLIGHT_BAND_HIGH_US {
                    // The running lights keep whatever level the previous
                    // range set; this branch only raises the headlight.
                    lamps.set_level(Lamp::Headlight, true);
                } else {
                    lamps.set_level(Lamp::Headlight, false);
                    lamps.set_level(Lamp::RunningLeft, false);
                    lamps.set_level(Lamp::RunningRight, false);
                }
            }
        }

        if let Some(window) = calibration.garland {
            let value = input.read_pulse_width(Channel::Garland) as i32;
            lamps.set_level(Lamp::Garland, !window.contains(value));
        }
    }
}

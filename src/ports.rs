/*
 * The port types between the control logic and the device.
 *
 * The receiver channels and the lamp outputs are the only things the
 * controller touches outside its own state. Both are behind small synchronous
 * traits so the device-specific module is the only part of the program that
 * knows about pins, and so the logic can be driven from tests with scripted
 * values instead of real pulse timing.
 */

use enum_ordinalize::Ordinalize;

/// A receiver channel, by what it controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Throttle,
    Switch,
    Garland,
}

/// A logical lamp. The ordinal maps the lamp onto the output array in the
/// device-specific module.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Lamp {
    Reverse,
    Stop,
    RunningLeft,
    RunningRight,
    Headlight,
    Garland,
}

/// Synchronous pulse measurement on one receiver channel.
pub trait PulseInput {
    /// Width in microseconds of the next active-high pulse, or 0 when no
    /// pulse is seen within the implementation's timeout.
    fn read_pulse_width(&mut self, channel: Channel) -> u32;
}

/// Fire-and-forget lamp level writes.
pub trait LampOutput {
    fn set_level(&mut self, lamp: Lamp, on: bool);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Receiver double fed from per-channel scripts. A channel with no script
    /// reads 0 (no pulse); an exhausted script repeats its last value.
    pub struct ScriptedReceiver {
        scripts: [Vec<u32>; 3],
        cursors: [usize; 3],
    }

    impl ScriptedReceiver {
        pub fn new() -> Self {
            Self {
                scripts: [Vec::new(), Vec::new(), Vec::new()],
                cursors: [0; 3],
            }
        }

        pub fn feed(&mut self, channel: Channel, values: &[u32]) {
            self.scripts[Self::index(channel)].extend_from_slice(values);
        }

        /// Replace the channel's script with a single value that repeats.
        pub fn set(&mut self, channel: Channel, value: u32) {
            let i = Self::index(channel);
            self.scripts[i] = vec![value];
            self.cursors[i] = 0;
        }

        fn index(channel: Channel) -> usize {
            match channel {
                Channel::Throttle => 0,
                Channel::Switch => 1,
                Channel::Garland => 2,
            }
        }
    }

    impl PulseInput for ScriptedReceiver {
        fn read_pulse_width(&mut self, channel: Channel) -> u32 {
            let i = Self::index(channel);
            if self.scripts[i].is_empty() {
                return 0;
            }
            let at = self.cursors[i].min(self.scripts[i].len() - 1);
            self.cursors[i] += 1;
            self.scripts[i][at]
        }
    }

    /// Lamp double that tracks current levels and the full write sequence.
    pub struct RecordingLamps {
        levels: [bool; Lamp::VARIANT_COUNT],
        pub writes: Vec<(Lamp, bool)>,
    }

    impl RecordingLamps {
        pub fn new() -> Self {
            Self {
                levels: [false; Lamp::VARIANT_COUNT],
                writes: Vec::new(),
            }
        }

        pub fn level(&self, lamp: Lamp) -> bool {
            self.levels[lamp.ordinal()]
        }
    }

    impl LampOutput for RecordingLamps {
        fn set_level(&mut self, lamp: Lamp, on: bool) {
            self.levels[lamp.ordinal()] = on;
            self.writes.push((lamp, on));
        }
    }
}

use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::snapshot::SensorSnapshot;

/// One of the three analog inputs on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum InputChannel {
    I1,
    I2,
    I3,
}

impl InputChannel {
    /// Percentage reported for this input in `snapshot`, if the device sent one.
    pub fn read(self, snapshot: &SensorSnapshot) -> Option<f64> {
        match self {
            InputChannel::I1 => snapshot.ax_percent,
            InputChannel::I2 => snapshot.ay_percent,
            InputChannel::I3 => snapshot.a1_percent,
        }
    }
}

/// One of the two motor/lamp outputs on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum OutputChannel {
    M1,
    M2,
}

impl OutputChannel {
    /// Index the device expects in a `setOutput` request.
    pub fn index(self) -> u8 {
        match self {
            OutputChannel::M1 => 0,
            OutputChannel::M2 => 1,
        }
    }

    /// Last percentage the device reported for this output.
    pub fn read(self, snapshot: &SensorSnapshot) -> Option<f64> {
        match self {
            OutputChannel::M1 => snapshot.m1_percent,
            OutputChannel::M2 => snapshot.m2_percent,
        }
    }
}

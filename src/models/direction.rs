use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Transition a button edge block waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Transition a light-barrier edge block waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LightBarrierState {
    Opens,
    Closes,
}

/// Rotation direction of a motor on an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MotorDirection {
    Forward,
    Backwards,
}

impl MotorDirection {
    /// Apply this direction to an unsigned magnitude.
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            MotorDirection::Forward => magnitude,
            MotorDirection::Backwards => -magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tokens() {
        assert_eq!(ButtonState::from_str("pressed").unwrap(), ButtonState::Pressed);
        assert_eq!(LightBarrierState::Closes.as_ref(), "closes");
        assert_eq!(MotorDirection::Backwards.to_string(), "backwards");
        assert!(MotorDirection::from_str("sideways").is_err());
    }

    #[test]
    fn test_signed() {
        assert_eq!(MotorDirection::Forward.signed(4f64), 4f64);
        assert_eq!(MotorDirection::Backwards.signed(4f64), -4f64);
    }
}

use std::fmt::Display;

/// Full-scale step count of the block-facing output magnitude (-8..=8).
pub const LOGICAL_STEPS: f64 = 8f64;

/// Full-scale device output percentage (-100..=100).
pub const PERCENT_SCALE: f64 = 100f64;

/// A signed output speed as the device expects it in `setOutput`.
/// Always a whole number in [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OutputPercent {
    value: i8,
}

impl OutputPercent {
    /// Round `percent` to the nearest integer (halves toward +inf) and clamp it
    /// into the device range. NaN becomes 0.
    pub fn saturating(percent: f64) -> Self {
        let rounded = round_half_up(percent).clamp(-PERCENT_SCALE, PERCENT_SCALE);
        Self {
            value: rounded as i8,
        }
    }

    pub fn value(&self) -> i8 {
        self.value
    }
}

impl Display for OutputPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}%)", self.value)
    }
}

/// Nearest integer, with halves going toward +inf: -37.5 becomes -37.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Scale a block-facing magnitude (-8..=8) to a device percentage.
pub fn logical_to_percent(value: f64) -> f64 {
    value * PERCENT_SCALE / LOGICAL_STEPS
}

/// Scale a device percentage back to the nearest block-facing magnitude.
pub fn percent_to_logical(percent: f64) -> i32 {
    round_half_up(percent / PERCENT_SCALE * LOGICAL_STEPS) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_rounds_and_clamps() {
        assert_eq!(OutputPercent::saturating(37.5).value(), 38);
        assert_eq!(OutputPercent::saturating(-37.5).value(), -37);
        assert_eq!(OutputPercent::saturating(-12.5).value(), -12);
        assert_eq!(OutputPercent::saturating(-0.5).value(), 0);
        assert_eq!(OutputPercent::saturating(-37.6).value(), -38);
        assert_eq!(OutputPercent::saturating(12.4).value(), 12);
        assert_eq!(OutputPercent::saturating(250f64).value(), 100);
        assert_eq!(OutputPercent::saturating(-250f64).value(), -100);
        assert_eq!(OutputPercent::saturating(f64::NAN).value(), 0);
    }

    #[test]
    fn test_logical_scaling() {
        assert_eq!(logical_to_percent(4f64), 50f64);
        assert_eq!(logical_to_percent(-8f64), -100f64);
        assert_eq!(logical_to_percent(1f64), 12.5f64);
        assert_eq!(percent_to_logical(50f64), 4);
        assert_eq!(percent_to_logical(-100f64), -8);
        assert_eq!(percent_to_logical(6.25), 1);
        assert_eq!(percent_to_logical(-6.25), 0);
    }

    #[test]
    fn test_every_step_survives_the_device_representation() {
        for step in -8..=8 {
            let sent = OutputPercent::saturating(logical_to_percent(step as f64));
            assert_eq!(percent_to_logical(sent.value() as f64), step);
        }
    }
}

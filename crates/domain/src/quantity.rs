use derive_more::{Display, Into};

/// Target or performed repetitions of a single set.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(1..1000).contains(&value) {
            return Err(RepsError::OutOfRange(value));
        }

        Ok(Self(value))
    }
}

impl Default for Reps {
    fn default() -> Self {
        Self(10)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 999 ({0})")]
    OutOfRange(u32),
}

/// Number of sets prescribed for an exercise within a plan division.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct SetCount(u32);

impl SetCount {
    pub fn new(value: u32) -> Result<Self, SetCountError> {
        if !(1..=20).contains(&value) {
            return Err(SetCountError::OutOfRange(value));
        }

        Ok(Self(value))
    }
}

impl Default for SetCount {
    fn default() -> Self {
        Self(3)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetCountError {
    #[error("Sets must be in the range 1 to 20 ({0})")]
    OutOfRange(u32),
}

/// A load in kilograms with a resolution of 0.1 kg. Zero marks a
/// body-weight exercise.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value * 10.0 % 1.0).abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
}

/// A duration in whole seconds, used for rest times.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Seconds(u32);

impl Seconds {
    pub fn new(value: u32) -> Result<Self, SecondsError> {
        if value > 3600 {
            return Err(SecondsError::OutOfRange(value));
        }

        Ok(Self(value))
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self(60)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SecondsError {
    #[error("Seconds must be 3600 or less ({0})")]
    OutOfRange(u32),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, Ok(Reps(1)))]
    #[case(999, Ok(Reps(999)))]
    #[case(0, Err(RepsError::OutOfRange(0)))]
    #[case(1000, Err(RepsError::OutOfRange(1000)))]
    fn test_reps_new(#[case] value: u32, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::new(value), expected);
    }

    #[test]
    fn test_reps_default() {
        assert_eq!(u32::from(Reps::default()), 10);
    }

    #[rstest]
    #[case(1, Ok(SetCount(1)))]
    #[case(20, Ok(SetCount(20)))]
    #[case(0, Err(SetCountError::OutOfRange(0)))]
    #[case(21, Err(SetCountError::OutOfRange(21)))]
    fn test_set_count_new(#[case] value: u32, #[case] expected: Result<SetCount, SetCountError>) {
        assert_eq!(SetCount::new(value), expected);
    }

    #[test]
    fn test_set_count_default() {
        assert_eq!(u32::from(SetCount::default()), 3);
    }

    #[rstest]
    #[case(0.0, Ok(Weight(0.0)))]
    #[case(82.5, Ok(Weight(82.5)))]
    #[case(120.5, Ok(Weight(120.5)))]
    #[case(-0.1, Err(WeightError::OutOfRange))]
    #[case(1000.0, Err(WeightError::OutOfRange))]
    #[case(20.05, Err(WeightError::InvalidResolution))]
    fn test_weight_new(#[case] value: f32, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::new(value), expected);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(20.0, false)]
    fn test_weight_is_zero(#[case] value: f32, #[case] expected: bool) {
        assert_eq!(Weight::new(value).unwrap().is_zero(), expected);
    }

    #[rstest]
    #[case(0, Ok(Seconds(0)))]
    #[case(3600, Ok(Seconds(3600)))]
    #[case(3601, Err(SecondsError::OutOfRange(3601)))]
    fn test_seconds_new(#[case] value: u32, #[case] expected: Result<Seconds, SecondsError>) {
        assert_eq!(Seconds::new(value), expected);
    }

    #[test]
    fn test_seconds_default() {
        assert_eq!(u32::from(Seconds::default()), 60);
    }
}

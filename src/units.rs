use std::{fmt::Display, time::Duration};

use crate::error::AppError;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Seconds(u8);
impl Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Seconds {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Seconds> for u64 {
    fn from(value: Seconds) -> Self {
        value.0 as u64
    }
}

impl From<Seconds> for Duration {
    fn from(value: Seconds) -> Self {
        Duration::from_secs(value.into())
    }
}

impl TryFrom<&str> for Seconds {
    type Error = AppError;

    /// Zero is rejected as it would disable the connection timeout entirely
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u8>() {
            Ok(secs) if secs > 0 => Ok(Self(secs)),
            _ => Err(AppError::InvalidTimeout(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10", Seconds(10))]
    #[case(" 3 ", Seconds(3))]
    #[case("255", Seconds(255))]
    fn seconds_from_str(#[case] input: &str, #[case] expected: Seconds) {
        let actual = Seconds::try_from(input).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("256")]
    #[case("ten")]
    fn seconds_rejected(#[case] input: &str) {
        assert!(matches!(
            Seconds::try_from(input),
            Err(AppError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn seconds_to_duration() {
        let actual: Duration = Seconds(10).into();
        assert_eq!(actual, Duration::from_secs(10));
    }
}

use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Lookback window, in whole minutes, for a price series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowMinutes(NonZeroU32);

impl WindowMinutes {
    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        NonZeroU32::new(minutes)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidMinutes {
                value: minutes.to_string(),
            })
    }

    /// Parse a query-string value. Only plain positive integers are accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidMinutes {
            value: input.to_owned(),
        };

        if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }

        trimmed
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for WindowMinutes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for WindowMinutes {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

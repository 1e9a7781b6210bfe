use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sampling temperature sent with a completion request.
///
/// Lower values make answers more focused and repeatable, which is what code
/// generation wants; the valid range is 0.0 to 2.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f32);

impl Temperature {
    pub fn new(value: f32) -> Result<Self, String> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(format!("temperature must be between 0.0 and 2.0, got {value}"))
        }
    }

    /// Builds a temperature from a constant known to be in range.
    pub const fn new_unchecked(value: f32) -> Self {
        Self(value)
    }

    pub fn is_valid(value: f32) -> bool {
        (0.0..=2.0).contains(&value)
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Deref for Temperature {
    type Target = f32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Temperature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f32(self.0)
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value = f32::deserialize(deserializer)?;
        Temperature::new(value).map_err(Error::custom)
    }
}

//! Deserialization utilities for optional durations
//!
//! Accepts an integer number of seconds or a string understood by
//! `utils::parse_duration` (`"30"`, `"30s"`, `"2m"`).
use std::{fmt, time::Duration};

use serde::{de, Deserializer};

use crate::utils::parse_duration;

#[derive(Debug)]
struct DurationVisitor;

impl<'de> de::Visitor<'de> for DurationVisitor {
    type Value = Option<Duration>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds or a duration string such as \"30s\"")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        parse_duration(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid duration: {}", value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(Duration::from_secs(value)))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value < 0 {
            Err(de::Error::custom("duration cannot be negative"))
        } else {
            Ok(Some(Duration::from_secs(value as u64)))
        }
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

pub fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(DurationVisitor)
}

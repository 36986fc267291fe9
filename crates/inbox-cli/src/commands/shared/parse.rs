use std::fmt::Display;
use std::str::FromStr;

/// Parse a domain enum, naming the offending flag on failure.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_opt<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

pub mod field;
pub mod machine;
pub mod resource;
pub mod warehouse;
pub mod worker;
pub mod worker_task;

pub use field::*;
pub use machine::*;
pub use resource::*;
pub use warehouse::*;
pub use worker::*;
pub use worker_task::*;

use serde::de::{Deserialize, Deserializer, Error};

/// Enums accept their names case-insensitively (plus the aliases their
/// `from_str` knows) when read from JSON or query strings.
pub(crate) fn deserialize_by_name<'de, D, T>(
    deserializer: D,
    parse: fn(&str) -> Option<T>,
    all: &'static [T],
    name: fn(&T) -> &'static str,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        let expected: Vec<&str> = all.iter().map(name).collect();
        D::Error::custom(format!(
            "unknown variant `{}`, expected one of {}",
            raw,
            expected.join(", ")
        ))
    })
}

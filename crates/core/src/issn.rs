//! ISSN normalization.
//!
//! Canonical form keeps decimal digits and the check character `X`,
//! uppercased, with every other character stripped. No checksum
//! validation is performed.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A normalized, non-empty ISSN key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Issn(String);

impl Issn {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Issn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Issn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Issn {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_issn(s)
            .ok_or_else(|| crate::CoreError::InvalidInput(format!("invalid ISSN: {s:?}")))
    }
}

impl<'de> Deserialize<'de> for Issn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        normalize_issn_value(&raw)
            .ok_or_else(|| D::Error::custom(format!("ISSN normalizes to empty: {raw}")))
    }
}

/// Normalize a textual ISSN. Returns `None` when nothing survives stripping.
#[must_use]
pub fn normalize_issn(raw: &str) -> Option<Issn> {
    let canonical: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'x' || *c == 'X')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if canonical.is_empty() { None } else { Some(Issn(canonical)) }
}

/// Normalize an untyped cell value: strings and numbers are coerced to text,
/// everything else (null, bool, arrays, objects) is invalid.
#[must_use]
pub fn normalize_issn_value(raw: &Value) -> Option<Issn> {
    match raw {
        Value::String(s) => normalize_issn(s),
        Value::Number(n) => {
            let text = if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f >= 0.0 => format!("{f:.0}"),
                    _ => n.to_string(),
                }
            };
            normalize_issn(&text)
        },
        _ => None,
    }
}

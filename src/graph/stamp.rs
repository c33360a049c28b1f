//! Dual timestamp forms for record metadata

use chrono::{DateTime, Local, Utc};

/// One captured instant, rendered in the two textual forms records carry.
///
/// The shared document stores preformatted strings rather than structured
/// datetimes; consuming clients expect these exact shapes. Node records use
/// the UTC form throughout, edge records use the local form for `begin` and
/// the UTC form for `lastModified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    utc: String,
    local: String,
}

impl Stamp {
    /// Capture the current instant.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Render both forms from a given instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            utc: instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            local: instant
                .with_timezone(&Local)
                .format("%Y/%m/%d %H:%M:%S")
                .to_string(),
        }
    }

    /// ISO-8601 UTC with millisecond precision and a trailing `Z`.
    pub fn utc(&self) -> &str {
        &self.utc
    }

    /// Local clock form, `YYYY/MM/DD HH:MM:SS`.
    pub fn local(&self) -> &str {
        &self.local
    }
}

//! Wire types of the HTTP API.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod health;
pub mod ranking;
pub mod validation;

/// RFC 3339 rendering of a record timestamp, e.g. `2024-05-01T10:20:30.123Z`.
fn format_system_time(time: SystemTime) -> String {
    let moment = OffsetDateTime::from(time);
    moment
        .format(&Rfc3339)
        .unwrap_or_else(|_| moment.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn formats_utc_timestamps() {
        let time = UNIX_EPOCH + Duration::from_millis(1_714_558_830_123);
        assert_eq!(format_system_time(time), "2024-05-01T10:20:30.123Z");
    }
}

//! Zone lookup for the local views
//!
//! Named IANA zones carry abbreviations (`CST`, `CEST`) that `%Z` prints.
//! The host zone is detected by name so it gets the same treatment.

use chrono_tz::Tz;
use epocha_core::{EpochError, EpochResult};
use tracing::warn;

/// Look up an IANA zone by name
pub fn named_zone(name: &str) -> EpochResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EpochError::InvalidConfig(format!("unknown time zone: {name}")))
}

/// The host's zone, or UTC when it cannot be detected or is not in the tz database
pub fn host_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(host) => host.parse::<Tz>().unwrap_or_else(|_| {
            warn!(zone = %host, "host zone not in the tz database, using UTC");
            Tz::UTC
        }),
        Err(err) => {
            warn!(error = %err, "cannot detect host zone, using UTC");
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_zone() {
        assert_eq!(named_zone("America/Chicago").unwrap(), Tz::America__Chicago);
        assert_eq!(named_zone(" Europe/Berlin ").unwrap(), Tz::Europe__Berlin);
        assert_eq!(named_zone("UTC").unwrap(), Tz::UTC);
    }

    #[test]
    fn test_unknown_zone_is_config_error() {
        let err = named_zone("Mars/Olympus").unwrap_err();
        assert!(matches!(err, EpochError::InvalidConfig(_)));
        assert!(!err.is_input_rejection());
    }

    #[test]
    fn test_host_zone_is_named() {
        // whatever the host reports, the result is a tz database entry
        let zone = host_zone();
        assert_eq!(named_zone(zone.name()).unwrap(), zone);
    }
}

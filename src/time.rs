use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::chart::{BirthInfo, Location};
use crate::error::{ChartError, Result};

pub type JulianDay = f64;

/// Resolves the civil UTC offset in force at a place and local time.
pub trait TimezoneLookup {
    fn utc_offset(&self, local: &NaiveDateTime, location: &Location) -> Result<FixedOffset>;
}

/// The same offset everywhere, e.g. an offset the caller already knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetLookup(pub FixedOffset);

impl FixedOffsetLookup {
    /// Offset east of Greenwich in whole minutes.
    pub fn from_minutes(minutes: i32) -> Result<Self> {
        FixedOffset::east_opt(minutes * 60)
            .map(FixedOffsetLookup)
            .ok_or_else(|| {
                ChartError::Timezone(format!("offset of {} minutes is out of range", minutes))
            })
    }

    /// Parses offsets written as `+04:00`, `-0530` or `Z`.
    pub fn parse(offset: &str) -> Result<Self> {
        let trimmed = offset.trim();
        if trimmed.eq_ignore_ascii_case("z") {
            return Self::from_minutes(0);
        }

        let (sign, digits) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(ChartError::Timezone(format!("invalid UTC offset `{}`", offset))),
        };
        let digits: String = digits.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChartError::Timezone(format!("invalid UTC offset `{}`", offset)));
        }
        let hours: i32 = digits[..2]
            .parse()
            .map_err(|_| ChartError::Timezone(format!("invalid UTC offset `{}`", offset)))?;
        let minutes: i32 = digits[2..]
            .parse()
            .map_err(|_| ChartError::Timezone(format!("invalid UTC offset `{}`", offset)))?;
        if minutes >= 60 {
            return Err(ChartError::Timezone(format!("invalid UTC offset `{}`", offset)));
        }
        Self::from_minutes(sign * (hours * 60 + minutes))
    }
}

impl TimezoneLookup for FixedOffsetLookup {
    fn utc_offset(&self, _local: &NaiveDateTime, _location: &Location) -> Result<FixedOffset> {
        Ok(self.0)
    }
}

/// An IANA zone such as `Europe/Moscow`, with its historical DST rules.
///
/// Local times that the zone skips or repeats (DST transitions) are
/// rejected rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedZoneLookup(pub Tz);

impl NamedZoneLookup {
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(NamedZoneLookup)
            .map_err(|e| ChartError::Timezone(format!("unknown time zone `{}`: {}", name, e)))
    }
}

impl TimezoneLookup for NamedZoneLookup {
    fn utc_offset(&self, local: &NaiveDateTime, _location: &Location) -> Result<FixedOffset> {
        match self.0.from_local_datetime(local) {
            LocalResult::Single(at) => Ok(at.offset().fix()),
            LocalResult::Ambiguous(earlier, later) => Err(ChartError::Timezone(format!(
                "{} is ambiguous in {} ({} or {})",
                local,
                self.0,
                earlier.offset().fix(),
                later.offset().fix()
            ))),
            LocalResult::None => Err(ChartError::Timezone(format!(
                "{} does not exist in {}",
                local, self.0
            ))),
        }
    }
}

/// Converts the local birth time to UT.
///
/// The offset is looked up for the birth hour with minutes zeroed, then
/// applied to the full local time. A lookup failure aborts the conversion.
pub fn to_universal_time(
    birth: &BirthInfo,
    timezone: &impl TimezoneLookup,
) -> Result<DateTime<Utc>> {
    let on_the_hour = birth
        .date_time
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| {
            ChartError::InvalidInput(format!("invalid birth time {}", birth.date_time))
        })?;

    let offset = timezone.utc_offset(&on_the_hour, &birth.location)?;
    let local = offset
        .from_local_datetime(&birth.date_time)
        .single()
        .ok_or_else(|| {
            ChartError::InvalidInput(format!("local time {} is out of range", birth.date_time))
        })?;

    let ut = local.with_timezone(&Utc);
    debug!(local = %birth.date_time, %offset, %ut, "resolved universal time");
    Ok(ut)
}

/// Julian day (UT) of a Gregorian calendar instant.
pub fn julian_day(date_time: DateTime<Utc>) -> JulianDay {
    let mut year = date_time.year() as f64;
    let mut month = date_time.month() as f64;
    let day = date_time.day() as f64;
    let hour = date_time.hour() as f64
        + date_time.minute() as f64 / 60.0
        + (date_time.second() as f64 + date_time.nanosecond() as f64 / 1_000_000_000.0) / 3600.0;

    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }

    let century = (year / 100.0).floor();
    let gregorian = 2.0 - century + (century / 4.0).floor();

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + gregorian
        - 1524.5
        + hour / 24.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn moscow_birth() -> BirthInfo {
        let date_time = NaiveDate::from_ymd_opt(1986, 8, 13)
            .and_then(|d| d.and_hms_opt(19, 40, 0))
            .unwrap();
        BirthInfo::new(date_time, Location::moscow())
    }

    #[test]
    fn j2000_epoch() {
        let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_relative_eq!(julian_day(noon), 2451545.0);
    }

    #[test]
    fn january_and_february_use_previous_year() {
        let date = Utc.with_ymd_and_hms(1987, 1, 27, 0, 0, 0).unwrap();
        assert_relative_eq!(julian_day(date), 2446822.5);
        let leap = Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap();
        assert_relative_eq!(julian_day(leap), 2460370.25);
    }

    #[test]
    fn moscow_summer_time_to_ut() {
        let lookup = FixedOffsetLookup::parse("+04:00").unwrap();
        let ut = to_universal_time(&moscow_birth(), &lookup).unwrap();
        assert_eq!(ut, Utc.with_ymd_and_hms(1986, 8, 13, 15, 40, 0).unwrap());
        assert_relative_eq!(julian_day(ut), 2446656.152777778, epsilon = 1e-8);
    }

    #[test]
    fn lookup_sees_the_hour_without_minutes() {
        struct Recording;
        impl TimezoneLookup for Recording {
            fn utc_offset(&self, local: &NaiveDateTime, _: &Location) -> Result<FixedOffset> {
                assert_eq!(local.minute(), 0);
                assert_eq!(local.hour(), 19);
                Ok(FixedOffset::east_opt(3 * 3600).unwrap())
            }
        }
        let ut = to_universal_time(&moscow_birth(), &Recording).unwrap();
        assert_eq!(ut.hour(), 16);
        assert_eq!(ut.minute(), 40);
    }

    #[test]
    fn lookup_failure_aborts() {
        struct Nowhere;
        impl TimezoneLookup for Nowhere {
            fn utc_offset(&self, _: &NaiveDateTime, _: &Location) -> Result<FixedOffset> {
                Err(ChartError::Timezone(
                    "Could not determine the timezone for the given location.".into(),
                ))
            }
        }
        let err = to_universal_time(&moscow_birth(), &Nowhere).unwrap_err();
        assert!(matches!(err, ChartError::Timezone(_)));
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(
            FixedOffsetLookup::parse("+04:00").unwrap().0.local_minus_utc(),
            4 * 3600
        );
        assert_eq!(
            FixedOffsetLookup::parse("-0530").unwrap().0.local_minus_utc(),
            -(5 * 3600 + 1800)
        );
        assert_eq!(FixedOffsetLookup::parse("Z").unwrap().0.local_minus_utc(), 0);
        assert!(FixedOffsetLookup::parse("4").is_err());
        assert!(FixedOffsetLookup::parse("+04:75").is_err());
        assert!(FixedOffsetLookup::parse("+99:00").is_err());
    }

    fn new_york(y: i32, m: u32, d: u32, h: u32, min: u32) -> BirthInfo {
        let date_time = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, min, 0))
            .unwrap();
        BirthInfo::new(date_time, Location::new_york())
    }

    #[test]
    fn moscow_zone_applies_1986_summer_time() {
        let zone = NamedZoneLookup::parse("Europe/Moscow").unwrap();
        let ut = to_universal_time(&moscow_birth(), &zone).unwrap();
        assert_eq!(ut, Utc.with_ymd_and_hms(1986, 8, 13, 15, 40, 0).unwrap());
    }

    #[test]
    fn moscow_zone_in_winter() {
        let zone = NamedZoneLookup::parse("Europe/Moscow").unwrap();
        let date_time = NaiveDate::from_ymd_opt(1986, 1, 13)
            .and_then(|d| d.and_hms_opt(19, 40, 0))
            .unwrap();
        let ut = to_universal_time(&BirthInfo::new(date_time, Location::moscow()), &zone).unwrap();
        assert_eq!(ut, Utc.with_ymd_and_hms(1986, 1, 13, 16, 40, 0).unwrap());
    }

    #[test]
    fn skipped_spring_forward_hour_is_rejected() {
        let zone = NamedZoneLookup::parse("America/New_York").unwrap();
        let err = to_universal_time(&new_york(2021, 3, 14, 2, 30), &zone).unwrap_err();
        assert!(matches!(err, ChartError::Timezone(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn repeated_fall_back_hour_is_rejected() {
        let zone = NamedZoneLookup::parse("America/New_York").unwrap();
        let err = to_universal_time(&new_york(2021, 11, 7, 1, 30), &zone).unwrap_err();
        assert!(matches!(err, ChartError::Timezone(_)));
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn hour_after_the_transition_resolves() {
        let zone = NamedZoneLookup::parse("America/New_York").unwrap();
        let ut = to_universal_time(&new_york(2021, 3, 14, 3, 30), &zone).unwrap();
        assert_eq!(ut, Utc.with_ymd_and_hms(2021, 3, 14, 7, 30, 0).unwrap());
    }

    #[test]
    fn unknown_zone_name() {
        let err = NamedZoneLookup::parse("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, ChartError::Timezone(_)));
    }
}

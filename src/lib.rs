//! Natal chart core: zodiac sign classification, house resolution over
//! circular cusps, and aspect detection between bodies.
//!
//! Longitudes come from an [`Ephemeris`]. [`FixedEphemeris`] serves pinned
//! values; the Swiss Ephemeris backend is behind the `swisseph` feature.

pub mod aspects;
pub mod bodies;
pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod houses;
#[cfg(feature = "swisseph")]
pub mod swisseph;
pub mod time;
pub mod zodiac;

pub use aspects::{
    angular_separation, detect_aspects, detect_aspects_with, AspectDefinition, AspectKind,
    AspectMatch, AspectPoint, MAJOR_ASPECTS,
};
pub use bodies::{CelestialBody, PlanetPositions};
pub use chart::{BirthInfo, CuspPlacement, Location, NatalChart, PlanetPlacement};
pub use config::ChartConfig;
pub use ephemeris::{Ephemeris, FixedEphemeris, HouseFrame, HouseSystem};
pub use error::{CalculationError, ChartError, Result};
pub use houses::{house_of, House, HouseCusps};
#[cfg(feature = "swisseph")]
pub use swisseph::SwissEph;
pub use time::{
    julian_day, to_universal_time, FixedOffsetLookup, JulianDay, NamedZoneLookup, TimezoneLookup,
};
pub use zodiac::{classify_sign, normalize_longitude, SignPosition, ZodiacSign};

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bodies::{CelestialBody, PlanetPositions};
use crate::chart::Location;
use crate::error::{ChartError, Result};
use crate::houses::HouseCusps;
use crate::time::JulianDay;

/// Tolerance when matching a requested instant against pinned data, in days.
const JULIAN_DAY_TOLERANCE: f64 = 1e-6;

// ---------------------------
// ## House systems
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HouseSystem {
    #[default]
    Placidus,
    WholeSign,
    Koch,
    Regiomontanus,
    Equal,
    Campanus,
}

impl HouseSystem {
    /// The single-letter code the Swiss Ephemeris uses for this system.
    pub fn code(&self) -> char {
        match self {
            HouseSystem::Placidus => 'P',
            HouseSystem::WholeSign => 'W',
            HouseSystem::Koch => 'K',
            HouseSystem::Regiomontanus => 'R',
            HouseSystem::Equal => 'E',
            HouseSystem::Campanus => 'C',
        }
    }

    pub fn from_code(code: char) -> Option<HouseSystem> {
        match code.to_ascii_uppercase() {
            'P' => Some(HouseSystem::Placidus),
            'W' => Some(HouseSystem::WholeSign),
            'K' => Some(HouseSystem::Koch),
            'R' => Some(HouseSystem::Regiomontanus),
            'E' => Some(HouseSystem::Equal),
            'C' => Some(HouseSystem::Campanus),
            _ => None,
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::WholeSign => "Whole Sign",
            HouseSystem::Koch => "Koch",
            HouseSystem::Regiomontanus => "Regiomontanus",
            HouseSystem::Equal => "Equal",
            HouseSystem::Campanus => "Campanus",
        };
        write!(f, "{}", name)
    }
}

/// House cusps plus the two angles an ephemeris reports alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseFrame {
    pub cusps: HouseCusps,
    pub ascendant: f64,
    pub midheaven: f64,
}

// ---------------------------
// ## Ephemeris seam
// ---------------------------

/// Source of longitudes for a chart.
///
/// Implementations must report failures instead of substituting defaults:
/// chart assembly aborts on the first error.
pub trait Ephemeris {
    fn house_frame(
        &self,
        julian_day: JulianDay,
        location: &Location,
        system: HouseSystem,
    ) -> Result<HouseFrame>;

    fn body_longitude(&self, julian_day: JulianDay, body: CelestialBody) -> Result<f64>;
}

/// Longitudes pinned to a single instant and place.
///
/// Useful when positions come from elsewhere (a saved chart, another
/// program) and as a deterministic stand-in for a live ephemeris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedEphemeris {
    pub julian_day: JulianDay,
    #[serde(default)]
    pub house_system: HouseSystem,
    pub houses: HouseFrame,
    pub bodies: PlanetPositions,
}

impl FixedEphemeris {
    pub fn new(julian_day: JulianDay, houses: HouseFrame, bodies: PlanetPositions) -> Self {
        FixedEphemeris {
            julian_day,
            house_system: HouseSystem::default(),
            houses,
            bodies,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading pinned positions");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn check_instant(&self, julian_day: JulianDay) -> Result<()> {
        if (julian_day - self.julian_day).abs() > JULIAN_DAY_TOLERANCE {
            return Err(ChartError::Ephemeris(format!(
                "positions are pinned to JD {:.6}, requested JD {:.6}",
                self.julian_day, julian_day
            )));
        }
        Ok(())
    }
}

impl Ephemeris for FixedEphemeris {
    fn house_frame(
        &self,
        julian_day: JulianDay,
        _location: &Location,
        system: HouseSystem,
    ) -> Result<HouseFrame> {
        self.check_instant(julian_day)?;
        if system != self.house_system {
            return Err(ChartError::Ephemeris(format!(
                "positions carry {} cusps, {} requested",
                self.house_system, system
            )));
        }
        Ok(self.houses)
    }

    fn body_longitude(&self, julian_day: JulianDay, body: CelestialBody) -> Result<f64> {
        self.check_instant(julian_day)?;
        self.bodies
            .get(body)
            .ok_or_else(|| ChartError::Ephemeris(format!("no position pinned for {}", body)))
    }
}

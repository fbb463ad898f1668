use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aspects::{detect_aspects_with, AspectDefinition, AspectMatch};
use crate::bodies::{CelestialBody, PlanetPositions};
use crate::config::ChartConfig;
use crate::ephemeris::{Ephemeris, HouseFrame};
use crate::error::Result;
use crate::houses::{house_of, House};
use crate::time::{julian_day, to_universal_time, JulianDay, TimezoneLookup};
use crate::zodiac::{classify_sign, normalize_longitude, SignPosition};

// ---------------------------
// ## Inputs
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location { latitude, longitude }
    }

    pub fn moscow() -> Self { Location { latitude: 55.7558, longitude: 37.6173 } }
    pub fn london() -> Self { Location { latitude: 51.5074, longitude: -0.1278 } }
    pub fn new_york() -> Self { Location { latitude: 40.7128, longitude: -74.0060 } }
    pub fn delhi() -> Self { Location { latitude: 28.6139, longitude: 77.2090 } }
    pub fn kochi() -> Self { Location { latitude: 9.9312, longitude: 76.2673 } }
}

/// Birth moment as civil local time, plus where it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub date_time: NaiveDateTime,
    pub location: Location,
}

impl BirthInfo {
    pub fn new(date_time: NaiveDateTime, location: Location) -> Self {
        BirthInfo { date_time, location }
    }
}

// ---------------------------
// ## Placements
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPlacement {
    pub body: CelestialBody,
    pub longitude: f64,
    pub position: Option<SignPosition>,
    pub house: Option<House>,
}

impl fmt::Display for PlanetPlacement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{}", position)?,
            None => write!(f, "Unknown")?,
        }
        match self.house {
            Some(house) => write!(f, ", House: {}", house),
            None => write!(f, ", House: UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuspPlacement {
    pub house: House,
    pub longitude: f64,
    pub position: Option<SignPosition>,
}

impl fmt::Display for CuspPlacement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{}", position),
            None => write!(f, "Unknown"),
        }
    }
}

// ---------------------------
// ## Chart
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub julian_day: JulianDay,
    pub ascendant: Option<SignPosition>,
    pub midheaven: Option<SignPosition>,
    pub planets: Vec<PlanetPlacement>,
    pub houses: Vec<CuspPlacement>,
    pub aspects: Vec<AspectMatch>,
}

impl NatalChart {
    /// Computes a chart for a birth moment.
    ///
    /// Time and ephemeris inputs are resolved first; any failure there aborts
    /// the chart before classification starts.
    pub fn calculate(
        birth: &BirthInfo,
        ephemeris: &impl Ephemeris,
        timezone: &impl TimezoneLookup,
        config: &ChartConfig,
    ) -> Result<Self> {
        let ut = to_universal_time(birth, timezone)?;
        let jd = julian_day(ut);
        debug!(julian_day = jd, house_system = %config.house_system, "computing chart");

        let frame = ephemeris.house_frame(jd, &birth.location, config.house_system)?;

        let mut positions = PlanetPositions::new();
        for body in CelestialBody::iter() {
            let longitude = ephemeris.body_longitude(jd, body)?;
            positions.insert(body, normalize_longitude(longitude));
        }

        Ok(Self::from_positions(jd, frame, &positions, &config.aspects))
    }

    /// Assembles a chart from already-computed longitudes.
    pub fn from_positions(
        julian_day: JulianDay,
        frame: HouseFrame,
        positions: &PlanetPositions,
        aspects: &[AspectDefinition],
    ) -> Self {
        let cusps = frame.cusps;

        let planets: Vec<PlanetPlacement> = positions
            .iter()
            .map(|(body, longitude)| {
                let placement = PlanetPlacement {
                    body,
                    longitude,
                    position: classify_sign(longitude),
                    house: house_of(longitude, &cusps),
                };
                if placement.position.is_none() || placement.house.is_none() {
                    warn!(%body, longitude, "placement left unresolved");
                }
                placement
            })
            .collect();

        let houses = cusps
            .iter()
            .map(|(house, longitude)| CuspPlacement {
                house,
                longitude,
                position: classify_sign(longitude),
            })
            .collect();

        let aspects = detect_aspects_with(positions, &cusps, aspects);
        debug!(planets = planets.len(), aspects = aspects.len(), "chart assembled");

        NatalChart {
            julian_day,
            ascendant: classify_sign(frame.ascendant),
            midheaven: classify_sign(frame.midheaven),
            planets,
            houses,
            aspects,
        }
    }

    pub fn planet(&self, body: CelestialBody) -> Option<&PlanetPlacement> {
        self.planets.iter().find(|p| p.body == body)
    }

    pub fn cusp(&self, house: House) -> Option<&CuspPlacement> {
        self.houses.iter().find(|c| c.house == house)
    }

    /// Aspect descriptions in detection order.
    pub fn aspect_descriptions(&self) -> Vec<String> {
        self.aspects.iter().map(|a| a.to_string()).collect()
    }
}

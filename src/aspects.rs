use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bodies::{CelestialBody, PlanetPositions};
use crate::houses::{house_of, House, HouseCusps};
use crate::zodiac::{classify_sign, ZodiacSign};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
}

impl AspectKind {
    pub fn name(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "Conjunction",
            AspectKind::Opposition => "Opposition",
            AspectKind::Trine => "Trine",
            AspectKind::Square => "Square",
            AspectKind::Sextile => "Sextile",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An exact angle with its tolerance ("orb"), both in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    pub angle: f64,
    pub orb: f64,
}

impl AspectDefinition {
    pub const fn new(kind: AspectKind, angle: f64, orb: f64) -> Self {
        AspectDefinition { kind, angle, orb }
    }

    /// Inclusive on both edges of the window.
    pub fn matches(&self, separation: f64) -> bool {
        (separation - self.angle).abs() <= self.orb
    }
}

/// The major aspects, in the order they are tested.
pub const MAJOR_ASPECTS: [AspectDefinition; 5] = [
    AspectDefinition::new(AspectKind::Conjunction, 0.0, 8.0),
    AspectDefinition::new(AspectKind::Opposition, 180.0, 8.0),
    AspectDefinition::new(AspectKind::Trine, 120.0, 6.0),
    AspectDefinition::new(AspectKind::Square, 90.0, 6.0),
    AspectDefinition::new(AspectKind::Sextile, 60.0, 4.0),
];

/// One side of an aspect as seen at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPoint {
    pub body: CelestialBody,
    pub longitude: f64,
    pub house: Option<House>,
    pub sign: Option<ZodiacSign>,
}

impl AspectPoint {
    fn resolve(body: CelestialBody, longitude: f64, cusps: &HouseCusps) -> Self {
        AspectPoint {
            body,
            longitude,
            house: house_of(longitude, cusps),
            sign: classify_sign(longitude).map(|pos| pos.sign),
        }
    }
}

impl fmt::Display for AspectPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} in House ", self.body)?;
        match self.house {
            Some(house) => write!(f, "{}", house)?,
            None => write!(f, "UNKNOWN")?,
        }
        match self.sign {
            Some(sign) => write!(f, " and {}", sign),
            None => write!(f, " and Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub first: AspectPoint,
    pub second: AspectPoint,
    pub kind: AspectKind,
    pub separation: f64,
}

impl fmt::Display for AspectMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({:.2}°)",
            self.first, self.kind, self.second, self.separation
        )
    }
}

/// Smallest angle between two longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let separation = (a - b).abs();
    if separation > 180.0 {
        360.0 - separation
    } else {
        separation
    }
}

/// Detects the major aspects between every pair of bodies.
pub fn detect_aspects(positions: &PlanetPositions, cusps: &HouseCusps) -> Vec<AspectMatch> {
    detect_aspects_with(positions, cusps, &MAJOR_ASPECTS)
}

/// Detects aspects from `definitions` between every unordered pair of bodies.
///
/// Pairs follow the iteration order of `positions` and definitions are tested
/// in table order. Every matching definition is reported, so a pair whose
/// separation sits inside two overlapping windows appears twice.
pub fn detect_aspects_with(
    positions: &PlanetPositions,
    cusps: &HouseCusps,
    definitions: &[AspectDefinition],
) -> Vec<AspectMatch> {
    let bodies: Vec<(CelestialBody, f64)> = positions.iter().collect();
    let mut matches = Vec::new();

    for (i, &(first, first_lon)) in bodies.iter().enumerate() {
        for &(second, second_lon) in &bodies[i + 1..] {
            let separation = angular_separation(first_lon, second_lon);

            for definition in definitions.iter().filter(|d| d.matches(separation)) {
                matches.push(AspectMatch {
                    first: AspectPoint::resolve(first, first_lon, cusps),
                    second: AspectPoint::resolve(second, second_lon, cusps),
                    kind: definition.kind,
                    separation,
                });
            }
        }
    }

    matches
}

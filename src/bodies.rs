use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// The bodies placed on a natal chart. Discriminants are the Swiss
/// Ephemeris body numbers; the lunar node is the mean node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum CelestialBody {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    NorthNode = 10,
}

impl CelestialBody {
    /// Chart order. Aspect output follows it.
    pub const ALL: [CelestialBody; 11] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::NorthNode,
    ];

    pub fn iter() -> impl Iterator<Item = CelestialBody> {
        CelestialBody::ALL.iter().copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::NorthNode => "North Node",
        }
    }

    pub fn swisseph_id(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Body longitudes in insertion order, at most one entry per body.
///
/// A `Vec` rather than a map: pair enumeration order is part of the aspect
/// output, so iteration must follow the order positions were added in.
/// Deserialized lists that name a body twice are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(CelestialBody, f64)>",
    into = "Vec<(CelestialBody, f64)>"
)]
pub struct PlanetPositions(Vec<(CelestialBody, f64)>);

impl PlanetPositions {
    pub fn new() -> Self {
        PlanetPositions(Vec::new())
    }

    /// Sets the longitude of `body`. A body already present keeps its slot.
    pub fn insert(&mut self, body: CelestialBody, longitude: f64) {
        match self.0.iter_mut().find(|(b, _)| *b == body) {
            Some(entry) => entry.1 = longitude,
            None => self.0.push((body, longitude)),
        }
    }

    pub fn get(&self, body: CelestialBody) -> Option<f64> {
        self.0
            .iter()
            .find(|(b, _)| *b == body)
            .map(|&(_, longitude)| longitude)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CelestialBody, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<(CelestialBody, f64)>> for PlanetPositions {
    type Error = ChartError;

    fn try_from(entries: Vec<(CelestialBody, f64)>) -> Result<Self, Self::Error> {
        for (i, (body, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == body) {
                return Err(ChartError::InvalidInput(format!(
                    "{} appears more than once in the position list",
                    body
                )));
            }
        }
        Ok(PlanetPositions(entries))
    }
}

impl From<PlanetPositions> for Vec<(CelestialBody, f64)> {
    fn from(positions: PlanetPositions) -> Self {
        positions.0
    }
}

impl FromIterator<(CelestialBody, f64)> for PlanetPositions {
    fn from_iter<I: IntoIterator<Item = (CelestialBody, f64)>>(iter: I) -> Self {
        let mut positions = PlanetPositions::new();
        for (body, longitude) in iter {
            positions.insert(body, longitude);
        }
        positions
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum House {
    First = 1,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl House {
    pub fn from_index(index: usize) -> Option<House> {
        match index {
            1 => Some(House::First),
            2 => Some(House::Second),
            3 => Some(House::Third),
            4 => Some(House::Fourth),
            5 => Some(House::Fifth),
            6 => Some(House::Sixth),
            7 => Some(House::Seventh),
            8 => Some(House::Eighth),
            9 => Some(House::Ninth),
            10 => Some(House::Tenth),
            11 => Some(House::Eleventh),
            12 => Some(House::Twelfth),
            _ => None,
        }
    }

    pub fn number(&self) -> usize {
        *self as usize
    }

    pub fn all() -> impl Iterator<Item = House> {
        (1..=12).filter_map(House::from_index)
    }

    /// The house whose span follows this one; the twelfth wraps to the first.
    pub fn next(&self) -> House {
        match self {
            House::Twelfth => House::First,
            _ => House::from_index(self.number() + 1).unwrap_or(House::First),
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// The twelve cusp longitudes of a chart, indexed by house.
///
/// Values are raw degrees in [0, 360) and are not assumed to be sorted: the
/// sequence starts at the ascendant, so it usually crosses 0° somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseCusps([f64; 12]);

impl HouseCusps {
    pub fn new(cusps: [f64; 12]) -> Self {
        HouseCusps(cusps)
    }

    pub fn from_slice(cusps: &[f64]) -> Result<Self> {
        let cusps: [f64; 12] = cusps.try_into().map_err(|_| {
            ChartError::InvalidInput(format!("expected 12 house cusps, got {}", cusps.len()))
        })?;
        Ok(HouseCusps(cusps))
    }

    pub fn cusp(&self, house: House) -> f64 {
        self.0[house.number() - 1]
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.0
    }

    /// Cusps paired with their house, in house order.
    pub fn iter(&self) -> impl Iterator<Item = (House, f64)> + '_ {
        House::all().map(move |house| (house, self.cusp(house)))
    }

    pub fn house_of(&self, longitude: f64) -> Option<House> {
        house_of(longitude, self)
    }
}

/// Resolves the house holding `longitude`.
///
/// House `i` spans `[cusp(i), cusp(i + 1))`, with the twelfth closing on the
/// first. A span whose end is numerically below its start crosses 0° and
/// matches on either side of the seam. Houses are scanned 1 to 12 and the
/// first hit wins. A cusp set that does not partition the circle can leave a
/// longitude unmatched, which yields `None` rather than a default house.
pub fn house_of(longitude: f64, cusps: &HouseCusps) -> Option<House> {
    House::all().find(|&house| {
        let start = cusps.cusp(house);
        let end = cusps.cusp(house.next());

        if start <= longitude && longitude < end {
            return true;
        }

        end < start && (longitude >= start || longitude < end)
    })
}

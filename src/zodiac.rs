use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of every zodiac sector, in degrees.
pub const SIGN_WIDTH: f64 = 30.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Signs in canonical order, starting at 0° Aries.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Inclusive start of the sector.
    pub fn start(&self) -> f64 {
        *self as u8 as f64 * SIGN_WIDTH
    }

    /// Exclusive end of the sector.
    pub fn end(&self) -> f64 {
        self.start() + SIGN_WIDTH
    }

    pub fn contains(&self, longitude: f64) -> bool {
        self.start() <= longitude && longitude < self.end()
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A longitude expressed as a sign plus whole degrees and minutes inside it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignPosition {
    pub sign: ZodiacSign,
    pub degree: u32,
    pub minute: u32,
}

impl fmt::Display for SignPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}°{}′", self.sign, self.degree, self.minute)
    }
}

/// Maps a longitude in [0, 360) to its sign and sign-relative degree/minute.
///
/// The input is not normalized here; see [`normalize_longitude`]. Degrees
/// and minutes are truncated, so 359.999° reads as Pisces 29°59′. Returns
/// `None` when no sector contains the value (negative, NaN or >= 360).
pub fn classify_sign(longitude: f64) -> Option<SignPosition> {
    ZodiacSign::ALL
        .iter()
        .find(|sign| sign.contains(longitude))
        .map(|&sign| {
            let offset = longitude - sign.start();
            let degree = offset.floor();
            let minute = ((offset - degree) * 60.0).floor().min(59.0);
            SignPosition {
                sign,
                degree: degree as u32,
                minute: minute as u32,
            }
        })
}

/// Reduces any finite longitude into [0, 360).
pub fn normalize_longitude(longitude: f64) -> f64 {
    let normalized = longitude.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn position(sign: ZodiacSign, degree: u32, minute: u32) -> Option<SignPosition> {
        Some(SignPosition {
            sign,
            degree,
            minute,
        })
    }

    #[test]
    fn classifies_sign_boundaries() {
        assert_eq!(classify_sign(10.0), position(ZodiacSign::Aries, 10, 0));
        assert_eq!(classify_sign(120.0), position(ZodiacSign::Leo, 0, 0));
        assert_eq!(classify_sign(0.0), position(ZodiacSign::Aries, 0, 0));
        assert_eq!(classify_sign(30.0), position(ZodiacSign::Taurus, 0, 0));
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(classify_sign(359.0), position(ZodiacSign::Pisces, 29, 0));
        assert_eq!(classify_sign(359.999), position(ZodiacSign::Pisces, 29, 59));
        assert_eq!(classify_sign(29.9999), position(ZodiacSign::Aries, 29, 59));
    }

    #[test]
    fn display_uses_degree_and_prime() {
        let pos = classify_sign(140.8052).unwrap();
        assert_eq!(pos.to_string(), "Leo 20°48′");
    }

    #[test]
    fn out_of_range_is_unclassified() {
        assert_eq!(classify_sign(360.0), None);
        assert_eq!(classify_sign(-0.5), None);
        assert_eq!(classify_sign(f64::NAN), None);
    }

    #[test]
    fn normalize_wraps_into_circle() {
        assert_eq!(normalize_longitude(370.0), 10.0);
        assert_eq!(normalize_longitude(-10.0), 350.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
        assert!(normalize_longitude(-1e-20) < 360.0);
    }

    proptest! {
        #[test]
        fn every_normalized_longitude_has_a_sign(x in -1.0e6f64..1.0e6) {
            let lon = normalize_longitude(x);
            let pos = classify_sign(lon);
            prop_assert!(pos.is_some());
            let pos = pos.unwrap();
            prop_assert!(pos.degree < 30);
            prop_assert!(pos.minute < 60);
            prop_assert!(pos.sign.contains(lon));
        }
    }
}

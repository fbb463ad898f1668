//! Swiss Ephemeris backend, available with the `swisseph` feature.
//!
//! The C library keeps its ephemeris path and file handles in process-wide
//! state, so every call goes through one mutex.

use std::ffi::{CStr, CString};
use std::fs;
use std::os::raw::{c_char, c_double, c_int};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::bodies::CelestialBody;
use crate::chart::Location;
use crate::ephemeris::{Ephemeris, HouseFrame, HouseSystem};
use crate::error::{CalculationError, ChartError, Result};
use crate::houses::HouseCusps;
use crate::time::JulianDay;

// ---------------------------
// ## FFI Bindings for Swiss Ephemeris
// ---------------------------

mod bindings {
    use super::*;

    extern "C" {
        pub fn swe_set_ephe_path(path: *const c_char);

        pub fn swe_calc_ut(
            tjd_ut: c_double,
            ipl: c_int,
            iflag: c_int,
            xx: *mut c_double,
            serr: *mut c_char,
        ) -> c_int;

        pub fn swe_houses_ex(
            tjd_ut: c_double,
            iflag: c_int,
            geolat: c_double,
            geolon: c_double,
            hsys: c_int,
            cusps: *mut c_double,
            ascmc: *mut c_double,
        ) -> c_int;
    }
}

use bindings::*;

pub const SEFLG_SWIEPH: c_int = 2;
pub const SEFLG_SPEED: c_int = 256;

const SE_ASCMC_ASC: usize = 0;
const SE_ASCMC_MC: usize = 1;
const SERR_LEN: usize = 256;

static SWE_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> Result<std::sync::MutexGuard<'static, ()>> {
    SWE_LOCK
        .lock()
        .map_err(|_| ChartError::Ephemeris("Swiss Ephemeris lock poisoned".to_string()))
}

fn error_text(serr: &[c_char; SERR_LEN]) -> String {
    unsafe { CStr::from_ptr(serr.as_ptr()) }
        .to_string_lossy()
        .trim()
        .to_string()
}

/// Planet and house calculations through the Swiss Ephemeris C library.
///
/// Without data files the library falls back to its built-in Moshier
/// ephemeris, which is accurate to well under a degree for charting.
pub struct SwissEph {
    ephe_path: Option<PathBuf>,
    _staged: Option<TempDir>,
}

impl SwissEph {
    pub fn new(ephe_path: Option<&Path>) -> Result<Self> {
        let c_path = match ephe_path {
            Some(path) => Some(
                CString::new(path.to_string_lossy().as_bytes()).map_err(|_| {
                    ChartError::InvalidInput(format!("bad ephemeris path {}", path.display()))
                })?,
            ),
            None => None,
        };

        {
            let _guard = lock()?;
            unsafe {
                swe_set_ephe_path(c_path.as_ref().map_or(std::ptr::null(), |p| p.as_ptr()));
            }
        }
        debug!(path = ?ephe_path, "Swiss Ephemeris path set");

        Ok(SwissEph {
            ephe_path: ephe_path.map(Path::to_path_buf),
            _staged: None,
        })
    }

    /// Stages an embedded data file (e.g. `sepl_18.se1`) in a temporary
    /// directory and points the library at it. The directory lives as long
    /// as the returned value.
    pub fn with_ephemeris_file(file_name: &str, data: &[u8]) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(file_name), data)?;
        let mut eph = Self::new(Some(dir.path()))?;
        eph._staged = Some(dir);
        Ok(eph)
    }

    pub fn ephe_path(&self) -> Option<&Path> {
        self.ephe_path.as_deref()
    }
}

impl Ephemeris for SwissEph {
    fn house_frame(
        &self,
        julian_day: JulianDay,
        location: &Location,
        system: HouseSystem,
    ) -> Result<HouseFrame> {
        let mut cusps: [c_double; 13] = [0.0; 13];
        let mut ascmc: [c_double; 10] = [0.0; 10];

        let calc_result = {
            let _guard = lock()?;
            unsafe {
                swe_houses_ex(
                    julian_day,
                    0,
                    location.latitude,
                    location.longitude,
                    system.code() as c_int,
                    cusps.as_mut_ptr(),
                    ascmc.as_mut_ptr(),
                )
            }
        };

        if calc_result < 0 {
            return Err(CalculationError::new(
                calc_result,
                format!("Error calculating {} houses", system),
            )
            .into());
        }

        let cusps = HouseCusps::from_slice(&cusps[1..])?;
        Ok(HouseFrame {
            cusps,
            ascendant: ascmc[SE_ASCMC_ASC],
            midheaven: ascmc[SE_ASCMC_MC],
        })
    }

    fn body_longitude(&self, julian_day: JulianDay, body: CelestialBody) -> Result<f64> {
        let mut results: [c_double; 6] = [0.0; 6];
        let mut serr: [c_char; SERR_LEN] = [0; SERR_LEN];

        let calc_result = {
            let _guard = lock()?;
            unsafe {
                swe_calc_ut(
                    julian_day,
                    body.swisseph_id(),
                    SEFLG_SWIEPH | SEFLG_SPEED,
                    results.as_mut_ptr(),
                    serr.as_mut_ptr(),
                )
            }
        };

        if calc_result < 0 {
            return Err(CalculationError::new(calc_result, error_text(&serr)).into());
        }

        let message = error_text(&serr);
        if !message.is_empty() {
            warn!(%body, %message, "Swiss Ephemeris warning");
        }

        Ok(results[0])
    }
}

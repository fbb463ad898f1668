use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgGroup, Parser};
use natal_core::{
    BirthInfo, ChartConfig, Ephemeris, FixedEphemeris, FixedOffsetLookup, Location,
    NamedZoneLookup, NatalChart, Result, TimezoneLookup,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "natal_chart", about = "Compute a natal chart: signs, houses and aspects")]
#[command(group(ArgGroup::new("zone").required(true).args(["utc_offset", "tz"])))]
struct Cli {
    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,

    /// Local birth time, HH:MM or HH:MM:SS
    #[arg(long, value_parser = parse_time)]
    time: NaiveTime,

    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// UTC offset in force at the birth place, e.g. +04:00
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// IANA time zone of the birth place, e.g. Europe/Moscow
    #[arg(long)]
    tz: Option<String>,

    /// JSON file with pinned positions instead of a live ephemeris
    #[arg(long)]
    positions: Option<PathBuf>,

    /// JSON chart config (house system, aspect orbs, ephemeris path)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the chart as JSON
    #[arg(long)]
    json: bool,
}

/// Either way of giving the birth place's civil time.
enum Zone {
    Offset(FixedOffsetLookup),
    Named(NamedZoneLookup),
}

impl Zone {
    fn from_cli(cli: &Cli) -> Result<Self> {
        match (&cli.tz, &cli.utc_offset) {
            (Some(name), _) => Ok(Zone::Named(NamedZoneLookup::parse(name)?)),
            (None, Some(offset)) => Ok(Zone::Offset(FixedOffsetLookup::parse(offset)?)),
            (None, None) => Err(natal_core::ChartError::InvalidInput(
                "one of --utc-offset or --tz is required".to_string(),
            )),
        }
    }
}

impl TimezoneLookup for Zone {
    fn utc_offset(&self, local: &NaiveDateTime, location: &Location) -> Result<FixedOffset> {
        match self {
            Zone::Offset(lookup) => lookup.utc_offset(local, location),
            Zone::Named(lookup) => lookup.utc_offset(local, location),
        }
    }
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("invalid time `{}`: {}", s, e))
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("NATAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ChartConfig::from_file(path)?,
        None => ChartConfig::default(),
    }
    .with_env();

    let birth = BirthInfo::new(cli.date.and_time(cli.time), Location::new(cli.lat, cli.lon));
    let timezone = Zone::from_cli(cli)?;

    let chart = match &cli.positions {
        Some(path) => {
            let ephemeris = FixedEphemeris::from_file(path)?;
            chart_with(&birth, &ephemeris, &timezone, &config)?
        }
        None => live_chart(&birth, &timezone, &config)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        print_chart(&chart);
    }
    Ok(())
}

fn chart_with(
    birth: &BirthInfo,
    ephemeris: &impl Ephemeris,
    timezone: &Zone,
    config: &ChartConfig,
) -> Result<NatalChart> {
    NatalChart::calculate(birth, ephemeris, timezone, config)
}

#[cfg(feature = "swisseph")]
fn live_chart(
    birth: &BirthInfo,
    timezone: &Zone,
    config: &ChartConfig,
) -> Result<NatalChart> {
    let ephemeris = natal_core::SwissEph::new(config.ephemeris_path.as_deref())?;
    chart_with(birth, &ephemeris, timezone, config)
}

#[cfg(not(feature = "swisseph"))]
fn live_chart(
    _birth: &BirthInfo,
    _timezone: &Zone,
    _config: &ChartConfig,
) -> Result<NatalChart> {
    Err(natal_core::ChartError::InvalidInput(
        "built without the swisseph feature; pass --positions".to_string(),
    ))
}

fn print_chart(chart: &NatalChart) {
    println!("Julian Day: {:.6}", chart.julian_day);
    if let Some(asc) = chart.ascendant {
        println!("Ascendant: {}", asc);
    }
    if let Some(mc) = chart.midheaven {
        println!("Midheaven: {}", mc);
    }

    println!("\nHouse Cusps:");
    for cusp in &chart.houses {
        println!("House {}: {}", cusp.house, cusp);
    }

    println!("\nPlanetary Positions:");
    for planet in &chart.planets {
        println!("{}: {}", planet.body, planet);
    }

    println!("\nAspects:");
    for aspect in chart.aspect_descriptions() {
        println!("{}", aspect);
    }
}

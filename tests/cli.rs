use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/moscow_1986.json")
}

fn natal_chart(zone: &[&str], extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_natal_chart"))
        .args(["--date", "1986-08-13", "--time", "19:40"])
        .args(["--lat", "55.7558", "--lon", "37.6173"])
        .args(zone)
        .arg("--positions")
        .arg(fixture())
        .args(extra)
        .output()
        .expect("failed to run natal_chart")
}

#[test]
fn prints_the_three_sections() {
    let output = natal_chart(&["--utc-offset", "+04:00"], &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let cusps = stdout.find("House Cusps:").unwrap();
    let planets = stdout.find("Planetary Positions:").unwrap();
    let aspects = stdout.find("Aspects:").unwrap();
    assert!(cusps < planets && planets < aspects);

    assert!(stdout.contains("Ascendant: Capricorn 25°24′"));
    assert!(stdout.contains("House 1: Capricorn 25°24′"));
    assert!(stdout.contains("House 12: Sagittarius 27°56′"));
    assert!(stdout.contains("Sun: Leo 20°48′, House: 7"));
    assert!(stdout.contains("North Node: Aries 23°33′, House: 2"));

    let aspect_lines: Vec<&str> = stdout[aspects..].lines().skip(1).collect();
    assert_eq!(aspect_lines.len(), 12);
    assert_eq!(
        aspect_lines[0],
        "Sun in House 7 and Leo Trine Uranus in House 11 and Sagittarius (117.23°)"
    );
    assert_eq!(
        aspect_lines[11],
        "Neptune in House 12 and Capricorn Sextile Pluto in House 9 and Scorpio (58.45°)"
    );
}

#[test]
fn named_zone_and_json_output() {
    let output = natal_chart(&["--tz", "Europe/Moscow"], &["--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let chart: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chart["planets"].as_array().map(Vec::len), Some(11));
    assert_eq!(chart["houses"].as_array().map(Vec::len), Some(12));
    assert_eq!(chart["aspects"].as_array().map(Vec::len), Some(12));
}

#[test]
fn wrong_offset_exits_with_an_error() {
    let output = natal_chart(&["--utc-offset", "+03:00"], &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ephemeris Error"), "{}", stderr);
}

#[test]
fn a_zone_is_required() {
    let output = natal_chart(&[], &[]);
    assert!(!output.status.success());
}

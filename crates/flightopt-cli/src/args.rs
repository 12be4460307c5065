//! Argument parsing helpers shared by the binaries.

use clap::ValueEnum;
use flightopt_core::{HeuristicMode, Point};

/// Parse `"LAT,LON"` in decimal degrees.
pub fn parse_point(value: &str) -> Result<Point, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got `{value}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude `{}`", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude `{}`", lon.trim()))?;
    Point::new(lat, lon).map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    /// Admissible bound using the strongest sampled wind
    WindBounded,
    /// Plain cruise speed; may overestimate under tailwinds
    CruiseSpeed,
}

impl From<HeuristicArg> for HeuristicMode {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::WindBounded => HeuristicMode::WindBounded,
            HeuristicArg::CruiseSpeed => HeuristicMode::CruiseSpeed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_accepts_signed_degrees() {
        let point = parse_point("40.6413,-73.7781").unwrap();
        assert_eq!(point.lat, 40.6413);
        assert_eq!(point.lon, -73.7781);

        let point = parse_point(" -33.9399 , 151.1753 ").unwrap();
        assert_eq!(point.lat, -33.9399);
    }

    #[test]
    fn test_parse_point_rejects_garbage() {
        assert!(parse_point("40.6").is_err());
        assert!(parse_point("north,west").is_err());
        assert!(parse_point("95.0,10.0").is_err());
    }

    #[test]
    fn test_heuristic_arg_maps_to_mode() {
        assert_eq!(
            HeuristicMode::from(HeuristicArg::CruiseSpeed),
            HeuristicMode::CruiseSpeed
        );
        assert_eq!(
            HeuristicArg::from_str("wind-bounded", false).map(HeuristicMode::from),
            Ok(HeuristicMode::WindBounded)
        );
    }
}

//! # Units and Coordinate Systems
//!
//! Closed vocabularies for the `Type` and `Units` attributes that AES69 attaches
//! to every position-bearing variable (and the `Units` attribute of frequency and
//! sampling-rate variables).
//!
//! Both vocabularies are process-wide immutable tables. Lookups are exact and
//! case-sensitive: a name that is not in the table is an error, never a default.
//!
//! ## Reference
//! - AES69-2022, Annex "Coordinate systems"
//! - https://www.sofaconventions.org

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name that did not match any entry of the units table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

/// Name that did not match any entry of the coordinate system table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown coordinate system: '{0}'")]
pub struct UnknownCoordinateSystem(pub String);

/// Coordinate system of a position, view or up vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSystem {
    /// x, y, z in metres
    Cartesian,
    /// azimuth, elevation in degrees, radius in metres
    Spherical,
    /// Spherical harmonic expansion (AES69-2020 and later)
    SphericalHarmonics,
}

const COORDINATE_NAMES: &[(CoordinateSystem, &str)] = &[
    (CoordinateSystem::Cartesian, "cartesian"),
    (CoordinateSystem::Spherical, "spherical"),
    (CoordinateSystem::SphericalHarmonics, "spherical harmonics"),
];

impl CoordinateSystem {
    /// Every coordinate system, in table order
    pub const ALL: [CoordinateSystem; 3] = [
        CoordinateSystem::Cartesian,
        CoordinateSystem::Spherical,
        CoordinateSystem::SphericalHarmonics,
    ];

    /// Canonical attribute spelling
    pub fn name(self) -> &'static str {
        COORDINATE_NAMES
            .iter()
            .find(|(cs, _)| *cs == self)
            .map(|(_, name)| *name)
            .unwrap_or("cartesian")
    }

    /// Look up a coordinate system by its attribute spelling
    pub fn from_name(name: &str) -> Result<Self, UnknownCoordinateSystem> {
        COORDINATE_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(cs, _)| *cs)
            .ok_or_else(|| UnknownCoordinateSystem(name.to_string()))
    }

    /// The units a position expressed in this system must carry
    pub fn expected_units(self) -> Units {
        match self {
            CoordinateSystem::Cartesian => Units::Metre,
            CoordinateSystem::Spherical | CoordinateSystem::SphericalHarmonics => {
                Units::SphericalUnits
            }
        }
    }

    /// Whether `units` is a legal pairing for this coordinate system
    pub fn accepts(self, units: Units) -> bool {
        self.expected_units() == units
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordinateSystem {
    type Err = UnknownCoordinateSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Physical units used by SOFA attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Units {
    /// metre
    Metre,
    /// cubic metre (room volume)
    CubicMetre,
    /// degree (single angle)
    Degree,
    /// "degree, degree, metre" - spherical triplets
    SphericalUnits,
    /// hertz (sampling rate, frequency axis)
    Hertz,
    /// samples (delays)
    Samples,
    /// second
    Second,
    /// kelvin (room temperature)
    Kelvin,
}

/// Canonical spellings, one per unit
const UNIT_NAMES: &[(Units, &str)] = &[
    (Units::Metre, "metre"),
    (Units::CubicMetre, "cubic metre"),
    (Units::Degree, "degree"),
    (Units::SphericalUnits, "degree, degree, metre"),
    (Units::Hertz, "hertz"),
    (Units::Samples, "samples"),
    (Units::Second, "second"),
    (Units::Kelvin, "kelvin"),
];

/// Spellings found in published files that map onto a canonical unit
const UNIT_ALIASES: &[(Units, &str)] = &[
    (Units::Metre, "meter"),
    (Units::Metre, "metres"),
    (Units::Metre, "meters"),
    (Units::CubicMetre, "cubic meter"),
    (Units::CubicMetre, "cubic metres"),
    (Units::Degree, "degrees"),
    (Units::SphericalUnits, "degree, degree, meter"),
    (Units::Second, "s"),
];

impl Units {
    /// Every unit, in table order
    pub const ALL: [Units; 8] = [
        Units::Metre,
        Units::CubicMetre,
        Units::Degree,
        Units::SphericalUnits,
        Units::Hertz,
        Units::Samples,
        Units::Second,
        Units::Kelvin,
    ];

    /// Canonical attribute spelling
    pub fn name(self) -> &'static str {
        UNIT_NAMES
            .iter()
            .find(|(u, _)| *u == self)
            .map(|(_, name)| *name)
            .unwrap_or("metre")
    }

    /// Look up a unit by its exact attribute spelling (canonical names and known aliases)
    pub fn from_name(name: &str) -> Result<Self, UnknownUnit> {
        UNIT_NAMES
            .iter()
            .chain(UNIT_ALIASES.iter())
            .find(|(_, n)| *n == name)
            .map(|(u, _)| *u)
            .ok_or_else(|| UnknownUnit(name.to_string()))
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Units {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_round_trip_names() {
        for units in Units::ALL {
            assert_eq!(Units::from_name(units.name()), Ok(units));
        }
        for cs in CoordinateSystem::ALL {
            assert_eq!(CoordinateSystem::from_name(cs.name()), Ok(cs));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(
            Units::from_name("Metre"),
            Err(UnknownUnit("Metre".to_string()))
        );
        assert!(CoordinateSystem::from_name("Cartesian").is_err());
        assert!(Units::from_name("").is_err());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Units::from_name("meter"), Ok(Units::Metre));
        assert_eq!(
            Units::from_name("degree, degree, meter"),
            Ok(Units::SphericalUnits)
        );
        // aliases never become the canonical spelling
        assert_eq!(Units::Metre.name(), "metre");
    }

    #[test]
    fn test_coordinate_unit_pairing() {
        assert!(CoordinateSystem::Cartesian.accepts(Units::Metre));
        assert!(!CoordinateSystem::Cartesian.accepts(Units::SphericalUnits));
        assert!(CoordinateSystem::Spherical.accepts(Units::SphericalUnits));
        assert!(CoordinateSystem::SphericalHarmonics.accepts(Units::SphericalUnits));
    }

    #[test]
    fn test_parse_via_from_str() {
        let cs: CoordinateSystem = "spherical harmonics".parse().unwrap();
        assert_eq!(cs, CoordinateSystem::SphericalHarmonics);
        let err = "hz".parse::<Units>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown unit: 'hz'");
    }
}

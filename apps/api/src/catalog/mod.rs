//! Static campus catalog: campuses, their study spots and quick locations.
//!
//! The catalog is built once from literal data and never mutated. Every
//! surface (browse routes, prompt builder, recommendation resolver) reads the
//! same instance through `Catalog::builtin()`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

mod data;
pub mod distance;
pub mod filter;
pub mod handlers;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseLevel {
    Quiet,
    Moderate,
    Lively,
}

impl NoiseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseLevel::Quiet => "quiet",
            NoiseLevel::Moderate => "moderate",
            NoiseLevel::Lively => "lively",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capacity {
    #[serde(rename = "solo")]
    Solo,
    #[serde(rename = "2-5 people")]
    SmallGroup,
    #[serde(rename = "6+ people")]
    LargeGroup,
}

impl Capacity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capacity::Solo => "solo",
            Capacity::SmallGroup => "2-5 people",
            Capacity::LargeGroup => "6+ people",
        }
    }
}

/// Amenity tags attached to a spot. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Amenity {
    Wifi,
    Quiet,
    Outlets,
    NaturalLight,
    GroupRooms,
    Cafe,
    StudyCarrels,
    GroupWork,
    Collaborative,
    FoodNearby,
    Comfortable,
    Social,
    SpecialCollections,
}

impl Amenity {
    pub const ALL: [Amenity; 13] = [
        Amenity::Wifi,
        Amenity::Quiet,
        Amenity::Outlets,
        Amenity::NaturalLight,
        Amenity::GroupRooms,
        Amenity::Cafe,
        Amenity::StudyCarrels,
        Amenity::GroupWork,
        Amenity::Collaborative,
        Amenity::FoodNearby,
        Amenity::Comfortable,
        Amenity::Social,
        Amenity::SpecialCollections,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Quiet => "quiet",
            Amenity::Outlets => "outlets",
            Amenity::NaturalLight => "natural-light",
            Amenity::GroupRooms => "group-rooms",
            Amenity::Cafe => "cafe",
            Amenity::StudyCarrels => "study-carrels",
            Amenity::GroupWork => "group-work",
            Amenity::Collaborative => "collaborative",
            Amenity::FoodNearby => "food-nearby",
            Amenity::Comfortable => "comfortable",
            Amenity::Social => "social",
            Amenity::SpecialCollections => "special-collections",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for NoiseLevel {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(NoiseLevel::Quiet),
            "moderate" => Ok(NoiseLevel::Moderate),
            "lively" => Ok(NoiseLevel::Lively),
            _ => Err(UnknownTag {
                kind: "noise level",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Amenity {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.to_ascii_lowercase();
        Amenity::ALL
            .into_iter()
            .find(|a| a.as_str() == needle)
            .ok_or_else(|| UnknownTag {
                kind: "amenity",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudySpot {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub coordinate: Coordinate,
    pub noise: NoiseLevel,
    pub capacity: Capacity,
    pub hours: String,
    pub amenities: Vec<Amenity>,
}

impl StudySpot {
    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        self.amenities.contains(&amenity)
    }
}

/// A named landmark a user can pick instead of sharing their position.
#[derive(Debug, Clone, Serialize)]
pub struct QuickLocation {
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Serialize)]
pub struct Campus {
    pub id: String,
    pub name: String,
    pub location: String,
    pub center: Coordinate,
    pub spots: Vec<StudySpot>,
    pub quick_locations: Vec<QuickLocation>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    campuses: Vec<Campus>,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    pub fn new(campuses: Vec<Campus>) -> Self {
        Self { campuses }
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| Catalog::new(data::campuses()))
    }

    pub fn campuses(&self) -> &[Campus] {
        &self.campuses
    }

    pub fn campus(&self, id: &str) -> Option<&Campus> {
        self.campuses.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn all_spots(&self) -> impl Iterator<Item = &StudySpot> {
        self.campuses.iter().flat_map(|c| c.spots.iter())
    }

    pub fn spot(&self, id: u32) -> Option<&StudySpot> {
        self.all_spots().find(|s| s.id == id)
    }

    pub fn spot_ids(&self) -> Vec<u32> {
        self.all_spots().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_spot_ids_are_unique() {
        let ids = Catalog::builtin().spot_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn test_every_campus_has_spots_and_quick_locations() {
        for campus in Catalog::builtin().campuses() {
            assert!(!campus.spots.is_empty(), "{} has no spots", campus.id);
            assert!(!campus.quick_locations.is_empty(), "{} has no quick locations", campus.id);
        }
    }

    #[test]
    fn test_campus_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.campus("UW").unwrap().name, "University of Washington");
        assert!(catalog.campus("mit").is_none());
    }

    #[test]
    fn test_spot_lookup_crosses_campuses() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.spot(2).unwrap().name, "Odegaard Library");
        assert_eq!(catalog.spot(7).unwrap().name, "Hornbake Library");
        assert!(catalog.spot(99).is_none());
    }

    #[test]
    fn test_tags_serialize_as_wire_strings() {
        assert_eq!(serde_json::to_string(&Amenity::NaturalLight).unwrap(), r#""natural-light""#);
        assert_eq!(serde_json::to_string(&NoiseLevel::Lively).unwrap(), r#""lively""#);
        assert_eq!(serde_json::to_string(&Capacity::LargeGroup).unwrap(), r#""6+ people""#);
    }

    #[test]
    fn test_tag_parsing_round_trips_every_amenity() {
        for amenity in Amenity::ALL {
            assert_eq!(amenity.as_str().parse::<Amenity>().unwrap(), amenity);
        }
        assert_eq!("QUIET".parse::<NoiseLevel>().unwrap(), NoiseLevel::Quiet);
        let err = "loud".parse::<NoiseLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown noise level 'loud'");
    }
}

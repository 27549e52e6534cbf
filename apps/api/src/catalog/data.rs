use super::Amenity::*;
use super::{Amenity, Campus, Capacity, Coordinate, NoiseLevel, QuickLocation, StudySpot};

#[allow(clippy::too_many_arguments)]
fn spot(
    id: u32,
    name: &str,
    description: &str,
    coordinate: (f64, f64),
    noise: NoiseLevel,
    capacity: Capacity,
    hours: &str,
    amenities: &[Amenity],
) -> StudySpot {
    StudySpot {
        id,
        name: name.to_string(),
        description: description.to_string(),
        coordinate: Coordinate::new(coordinate.0, coordinate.1),
        noise,
        capacity,
        hours: hours.to_string(),
        amenities: amenities.to_vec(),
    }
}

fn quick(name: &str, latitude: f64, longitude: f64) -> QuickLocation {
    QuickLocation {
        name: name.to_string(),
        coordinate: Coordinate::new(latitude, longitude),
    }
}

pub(super) fn campuses() -> Vec<Campus> {
    vec![
        Campus {
            id: "uw".to_string(),
            name: "University of Washington".to_string(),
            location: "Seattle, WA".to_string(),
            center: Coordinate::new(47.6553, -122.3080),
            spots: vec![
                spot(
                    1,
                    "Suzzallo Library - Reading Room",
                    "Gothic-style reading room with high ceilings and natural light. Perfect for focused studying.",
                    (47.6563, -122.3085),
                    NoiseLevel::Quiet,
                    Capacity::LargeGroup,
                    "7 AM - 2 AM",
                    &[Wifi, Quiet, Outlets, NaturalLight],
                ),
                spot(
                    2,
                    "Odegaard Library",
                    "Modern study spaces with group rooms and collaborative areas. Great for group work.",
                    (47.6565, -122.3095),
                    NoiseLevel::Moderate,
                    Capacity::LargeGroup,
                    "24/7",
                    &[Wifi, GroupRooms, Outlets, Cafe],
                ),
                spot(
                    3,
                    "Allen Library",
                    "Quiet floors with individual study carrels and modern facilities.",
                    (47.6555, -122.3075),
                    NoiseLevel::Quiet,
                    Capacity::LargeGroup,
                    "7 AM - 12 AM",
                    &[Wifi, Quiet, Outlets, StudyCarrels],
                ),
                spot(
                    4,
                    "Communications Building",
                    "Open study areas with collaborative spaces and good wifi.",
                    (47.6548, -122.3088),
                    NoiseLevel::Moderate,
                    Capacity::LargeGroup,
                    "7 AM - 10 PM",
                    &[Wifi, GroupWork, Outlets, Collaborative],
                ),
                spot(
                    5,
                    "HUB Study Lounge",
                    "Casual study space with comfortable seating and nearby food options.",
                    (47.6557, -122.3068),
                    NoiseLevel::Lively,
                    Capacity::LargeGroup,
                    "7 AM - 11 PM",
                    &[Wifi, FoodNearby, Comfortable, Social],
                ),
            ],
            quick_locations: vec![
                quick("Red Square", 47.6553, -122.3080),
                quick("The Ave", 47.6615, -122.3130),
                quick("Burke Museum", 47.6560, -122.3110),
                quick("Drumheller Fountain", 47.6533, -122.3050),
            ],
        },
        Campus {
            id: "umd".to_string(),
            name: "University of Maryland".to_string(),
            location: "College Park, MD".to_string(),
            center: Coordinate::new(38.9869, -76.9426),
            spots: vec![
                spot(
                    6,
                    "McKeldin Library",
                    "Main library with multiple floors and collaborative study areas.",
                    (38.9859, -76.9450),
                    NoiseLevel::Moderate,
                    Capacity::LargeGroup,
                    "24/7",
                    &[Wifi, GroupRooms, Outlets, Cafe],
                ),
                spot(
                    7,
                    "Hornbake Library",
                    "Specialized collections with quiet study spaces.",
                    (38.9876, -76.9436),
                    NoiseLevel::Quiet,
                    Capacity::LargeGroup,
                    "8 AM - 12 AM",
                    &[Wifi, Quiet, Outlets, SpecialCollections],
                ),
            ],
            quick_locations: vec![
                quick("Testudo Statue", 38.9869, -76.9426),
                quick("Memorial Chapel", 38.9881, -76.9412),
            ],
        },
    ]
}

use serde::Serialize;

use super::{Coordinate, StudySpot};

/// Earth's radius in metres
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Average walking pace (~4.8 km/h).
const WALKING_SPEED_M_PER_MIN: f64 = 80.0;

/// Great-circle distance between two points in metres (haversine).
#[inline]
pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Whole minutes on foot, rounded up. Zero only for the same point.
#[inline]
pub fn walking_minutes(distance_m: f64) -> u32 {
    (distance_m / WALKING_SPEED_M_PER_MIN).ceil() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotDistance<'a> {
    pub spot: &'a StudySpot,
    pub distance_m: f64,
    pub walking_minutes: u32,
}

/// Spots ordered by distance from `origin`, nearest first. Ties keep catalog order.
pub fn nearest_spots<'a>(
    spots: impl IntoIterator<Item = &'a StudySpot>,
    origin: Coordinate,
) -> Vec<SpotDistance<'a>> {
    let mut ranked: Vec<SpotDistance<'a>> = spots
        .into_iter()
        .map(|spot| {
            let distance_m = haversine_m(origin, spot.coordinate);
            SpotDistance {
                spot,
                distance_m,
                walking_minutes: walking_minutes(distance_m),
            }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_suzzallo_to_odegaard_is_a_short_walk() {
        let catalog = Catalog::builtin();
        let suzzallo = catalog.spot(1).unwrap().coordinate;
        let odegaard = catalog.spot(2).unwrap().coordinate;

        let metres = haversine_m(suzzallo, odegaard);
        assert!((75.0..82.0).contains(&metres), "got {metres} m");
        assert!((haversine_m(odegaard, suzzallo) - metres).abs() < 1e-9);
        assert_eq!(walking_minutes(metres), 1);
    }

    #[test]
    fn test_same_point_is_zero() {
        let red_square = Coordinate::new(47.6553, -122.3080);
        assert_eq!(haversine_m(red_square, red_square), 0.0);
        assert_eq!(walking_minutes(0.0), 0);
    }

    #[test]
    fn test_walking_minutes_rounds_up() {
        assert_eq!(walking_minutes(1.0), 1);
        assert_eq!(walking_minutes(80.0), 1);
        assert_eq!(walking_minutes(81.0), 2);
    }

    #[test]
    fn test_nearest_spots_from_red_square() {
        let uw = Catalog::builtin().campus("uw").unwrap();
        let ranked = nearest_spots(&uw.spots, Coordinate::new(47.6553, -122.3080));
        assert_eq!(ranked.len(), uw.spots.len());
        // Allen Library sits right next to Red Square
        assert_eq!(ranked[0].spot.name, "Allen Library");
        assert!(ranked
            .windows(2)
            .all(|w| w[0].distance_m <= w[1].distance_m));
    }
}

use super::{Amenity, NoiseLevel, StudySpot};

/// Predicates for narrowing a spot list. Every field that is set must match.
#[derive(Debug, Clone, Default)]
pub struct SpotFilter {
    pub noise: Option<NoiseLevel>,
    pub amenity: Option<Amenity>,
    /// Case-insensitive substring over name and description.
    pub query: Option<String>,
}

impl SpotFilter {
    pub fn matches(&self, spot: &StudySpot) -> bool {
        if let Some(noise) = self.noise {
            if spot.noise != noise {
                return false;
            }
        }

        if let Some(amenity) = self.amenity {
            if !spot.has_amenity(amenity) {
                return false;
            }
        }

        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            if !spot.name.to_lowercase().contains(&needle)
                && !spot.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }
}

/// Single pass over `spots`, preserving catalog order. Zero matches is an empty Vec.
pub fn filter_spots<'a>(spots: &'a [StudySpot], filter: &SpotFilter) -> Vec<&'a StudySpot> {
    spots.iter().filter(|s| filter.matches(s)).collect()
}

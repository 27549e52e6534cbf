//! Axum route handlers for browsing the catalog.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::distance::{nearest_spots, SpotDistance};
use crate::catalog::filter::{filter_spots, SpotFilter};
use crate::catalog::{Amenity, Campus, Catalog, Coordinate, NoiseLevel, StudySpot};
use crate::errors::AppError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CampusSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub location: &'a str,
    pub center: Coordinate,
    pub spot_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SpotQuery {
    pub noise: Option<String>,
    pub amenity: Option<String>,
    pub q: Option<String>,
}

impl SpotQuery {
    fn into_filter(self) -> Result<SpotFilter, AppError> {
        let noise = self
            .noise
            .filter(|n| !n.is_empty() && n != "all")
            .map(|n| n.parse::<NoiseLevel>())
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let amenity = self
            .amenity
            .filter(|a| !a.is_empty())
            .map(|a| a.parse::<Amenity>())
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(SpotFilter {
            noise,
            amenity,
            query: self.q,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SpotListResponse<'a> {
    pub campus_id: &'a str,
    pub total: usize,
    pub spots: Vec<&'a StudySpot>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse<'a> {
    pub origin: Coordinate,
    pub spots: Vec<SpotDistance<'a>>,
}

fn campus_or_404(catalog: &'static Catalog, campus_id: &str) -> Result<&'static Campus, AppError> {
    catalog
        .campus(campus_id)
        .ok_or_else(|| AppError::NotFound(format!("Campus {campus_id} not found")))
}

/// GET /api/v1/campuses
pub async fn handle_list_campuses(State(state): State<AppState>) -> Json<Vec<CampusSummary<'static>>> {
    let catalog: &'static Catalog = state.catalog;
    Json(
        catalog
            .campuses()
            .iter()
            .map(|c| CampusSummary {
                id: &c.id,
                name: &c.name,
                location: &c.location,
                center: c.center,
                spot_count: c.spots.len(),
            })
            .collect(),
    )
}

/// GET /api/v1/campuses/:campus_id
pub async fn handle_get_campus(
    State(state): State<AppState>,
    ApiPath(campus_id): ApiPath<String>,
) -> Result<Json<&'static Campus>, AppError> {
    campus_or_404(state.catalog, &campus_id).map(Json)
}

/// GET /api/v1/campuses/:campus_id/spots?noise=&amenity=&q=
///
/// Zero matches is a 200 with an empty list.
pub async fn handle_list_spots(
    State(state): State<AppState>,
    ApiPath(campus_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<SpotQuery>,
) -> Result<Json<SpotListResponse<'static>>, AppError> {
    let campus = campus_or_404(state.catalog, &campus_id)?;
    let filter = query.into_filter()?;
    Ok(Json(SpotListResponse {
        campus_id: &campus.id,
        total: campus.spots.len(),
        spots: filter_spots(&campus.spots, &filter),
    }))
}

/// GET /api/v1/campuses/:campus_id/nearby?lat=&lng=
pub async fn handle_nearby_spots(
    State(state): State<AppState>,
    ApiPath(campus_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Result<Json<NearbyResponse<'static>>, AppError> {
    let campus = campus_or_404(state.catalog, &campus_id)?;
    let origin = Coordinate::new(query.lat, query.lng);
    Ok(Json(NearbyResponse {
        origin,
        spots: nearest_spots(&campus.spots, origin),
    }))
}

/// GET /api/v1/spots/:spot_id
pub async fn handle_get_spot(
    State(state): State<AppState>,
    ApiPath(spot_id): ApiPath<u32>,
) -> Result<Json<StudySpot>, AppError> {
    state
        .catalog
        .spot(spot_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Spot {spot_id} not found")))
}

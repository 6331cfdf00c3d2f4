use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::serializer::{
    serialize_restaurant_detail, serialize_restaurant_summary, ErrorResponse, RestaurantDetail,
    RestaurantSummary,
};

use super::{run_store, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

// Path ids that are not integers cannot name a restaurant.
fn parse_restaurant_id(id: &str) -> Result<i32, ApiError> {
    id.parse().map_err(|_| ApiError::NotFound("Restaurant"))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = Vec<RestaurantSummary>),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let restaurants = run_store(&state, |store| store.list_restaurants()).await?;

    Ok(Json(
        restaurants.iter().map(serialize_restaurant_summary).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = ErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    let id = parse_restaurant_id(&id)?;

    let details = run_store(&state, move |store| store.find_restaurant(id))
        .await?
        .ok_or(ApiError::NotFound("Restaurant"))?;

    Ok(Json(serialize_restaurant_detail(&details)))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizza prices deleted"),
        (status = 404, description = "Restaurant not found", body = ErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_restaurant_id(&id)?;

    let deleted = run_store(&state, move |store| store.delete_restaurant(id)).await?;
    if !deleted {
        warn!(id, "delete requested for unknown restaurant");
        return Err(ApiError::NotFound("Restaurant"));
    }

    info!(id, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}

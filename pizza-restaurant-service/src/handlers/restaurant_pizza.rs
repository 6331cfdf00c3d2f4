use axum::{
    body::Bytes, extract::State, http::StatusCode, response::Json, routing::post, Router,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::serializer::{
    serialize_restaurant_pizza_detail, CreateRestaurantPizzaRequest, ErrorsResponse,
    RestaurantPizzaDetail,
};

use super::{run_store, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizzaDetail),
        (status = 400, description = "Request rejected", body = ErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state, body))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RestaurantPizzaDetail>), ApiError> {
    let restaurant_pizza = CreateRestaurantPizzaRequest::from_slice(&body)
        .and_then(|request| request.validate())
        .inspect_err(|e| warn!(error = %e, "rejected restaurant pizza"))?;

    let details = run_store(&state, move |store| {
        store.create_restaurant_pizza(restaurant_pizza)
    })
    .await
    .inspect_err(|e| warn!(error = %e, "failed to create restaurant pizza"))?;

    info!(
        id = details.restaurant_pizza.id,
        restaurant_id = details.restaurant.id,
        pizza_id = details.pizza.id,
        "restaurant pizza created"
    );

    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza_detail(&details)),
    ))
}

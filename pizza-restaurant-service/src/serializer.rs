use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{
    self, NewRestaurantPizza, RestaurantDetails, RestaurantPizzaDetails, PRICE_RANGE,
};

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PizzaSummary {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

/// Pricing relationship as listed under its restaurant.
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RestaurantPizzaEntry {
    pub id: i32,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaEntry>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RestaurantPizzaDetail {
    pub id: i32,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
    pub restaurant: RestaurantSummary,
}

/// Body of a 404 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a 400 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorsResponse {
    pub errors: Vec<String>,
}

// Whole prices go out as JSON integers, so a stored `10.0` reads back as `10`.
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && price.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza_summary(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_detail(details: &RestaurantDetails) -> RestaurantDetail {
    RestaurantDetail {
        id: details.restaurant.id,
        name: details.restaurant.name.clone(),
        address: details.restaurant.address.clone(),
        restaurant_pizzas: details
            .restaurant_pizzas
            .iter()
            .map(|(restaurant_pizza, pizza)| RestaurantPizzaEntry {
                id: restaurant_pizza.id,
                price: restaurant_pizza.price,
                pizza_id: restaurant_pizza.pizza_id,
                restaurant_id: restaurant_pizza.restaurant_id,
                pizza: serialize_pizza_summary(pizza),
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza_detail(
    details: &RestaurantPizzaDetails,
) -> RestaurantPizzaDetail {
    RestaurantPizzaDetail {
        id: details.restaurant_pizza.id,
        price: details.restaurant_pizza.price,
        pizza_id: details.restaurant_pizza.pizza_id,
        restaurant_id: details.restaurant_pizza.restaurant_id,
        pizza: serialize_pizza_summary(&details.pizza),
        restaurant: serialize_restaurant_summary(&details.restaurant),
    }
}

/// Body of `POST /restaurant_pizzas`.
///
/// Fields stay raw so that a missing key and a malformed value can be told
/// apart; `null` counts as missing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    #[serde(default)]
    #[schema(value_type = i32)]
    pub restaurant_id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = i32)]
    pub pizza_id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = f64, minimum = 1, maximum = 30)]
    pub price: Option<Value>,
}

impl CreateRestaurantPizzaRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        if !value.is_object() {
            return Err(ApiError::MalformedBody(
                "Request body must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ApiError::MalformedBody(e.to_string()))
    }

    pub fn validate(&self) -> Result<NewRestaurantPizza, ApiError> {
        let restaurant_id = self
            .restaurant_id
            .as_ref()
            .ok_or(ApiError::MissingKey("restaurant_id"))?;
        let pizza_id = self
            .pizza_id
            .as_ref()
            .ok_or(ApiError::MissingKey("pizza_id"))?;
        let price = self.price.as_ref().ok_or(ApiError::MissingKey("price"))?;

        let price = price
            .as_f64()
            .filter(|price| price.is_finite() && PRICE_RANGE.contains(price))
            .ok_or(ApiError::Validation)?;

        Ok(NewRestaurantPizza {
            price,
            restaurant_id: as_i32(restaurant_id).ok_or(ApiError::Validation)?,
            pizza_id: as_i32(pizza_id).ok_or(ApiError::Validation)?,
        })
    }
}

// Ids must be integral JSON numbers; `3.0` passes, `3.5` does not.
fn as_i32(value: &Value) -> Option<i32> {
    let number = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })?;
    i32::try_from(number).ok()
}

use diesel::{insert_into, prelude::*};
use thiserror::Error;

use crate::establish_connection;
use crate::models::{
    NewRestaurantPizza, Pizza, Restaurant, RestaurantDetails, RestaurantPizza,
    RestaurantPizzaDetails,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("{0}")]
    Query(#[from] diesel::result::Error),
}

/// Data access used by the HTTP handlers.
///
/// Every call runs in its own transaction; a failed call leaves the store
/// as it was. Writes take the database lock up front.
pub trait Store: Send + Sync {
    fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError>;

    fn find_restaurant(&self, id: i32) -> Result<Option<RestaurantDetails>, StoreError>;

    /// Deletes the restaurant and every pricing relationship that references it.
    /// Returns `false` when no such restaurant exists.
    fn delete_restaurant(&self, id: i32) -> Result<bool, StoreError>;

    fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError>;

    fn find_restaurant_pizza(&self, id: i32) -> Result<Option<RestaurantPizza>, StoreError>;

    fn create_restaurant_pizza(
        &self,
        restaurant_pizza: NewRestaurantPizza,
    ) -> Result<RestaurantPizzaDetails, StoreError>;
}

/// SQLite backed [`Store`]. A connection is opened for each call and closed
/// when the call returns.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    pub fn connect(&self) -> Result<SqliteConnection, StoreError> {
        establish_connection(&self.database_url)
    }
}

impl Store for SqliteStore {
    fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let conn = &mut self.connect()?;
        let results = restaurants::table
            .select(Restaurant::as_select())
            .order_by(restaurants::id.asc())
            .load(conn)?;
        Ok(results)
    }

    fn find_restaurant(&self, id: i32) -> Result<Option<RestaurantDetails>, StoreError> {
        let conn = &mut self.connect()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let Some(restaurant) = restaurants::table
                .find(id)
                .select(Restaurant::as_select())
                .first::<Restaurant>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            let restaurant_pizzas = RestaurantPizza::belonging_to(&restaurant)
                .inner_join(pizzas::table)
                .select((RestaurantPizza::as_select(), Pizza::as_select()))
                .order_by(restaurant_pizzas::id.asc())
                .load::<(RestaurantPizza, Pizza)>(conn)?;

            Ok(Some(RestaurantDetails {
                restaurant,
                restaurant_pizzas,
            }))
        })
    }

    fn delete_restaurant(&self, id: i32) -> Result<bool, StoreError> {
        let conn = &mut self.connect()?;
        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            diesel::delete(
                restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(id)),
            )
            .execute(conn)?;
            let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        let conn = &mut self.connect()?;
        let results = pizzas::table
            .select(Pizza::as_select())
            .order_by(pizzas::id.asc())
            .load(conn)?;
        Ok(results)
    }

    fn find_restaurant_pizza(&self, id: i32) -> Result<Option<RestaurantPizza>, StoreError> {
        let conn = &mut self.connect()?;
        let result = restaurant_pizzas::table
            .find(id)
            .select(RestaurantPizza::as_select())
            .first(conn)
            .optional()?;
        Ok(result)
    }

    fn create_restaurant_pizza(
        &self,
        new_restaurant_pizza: NewRestaurantPizza,
    ) -> Result<RestaurantPizzaDetails, StoreError> {
        let conn = &mut self.connect()?;
        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let restaurant_pizza: RestaurantPizza = insert_into(restaurant_pizzas::table)
                .values(&new_restaurant_pizza)
                .returning(RestaurantPizza::as_returning())
                .get_result(conn)?;
            let restaurant: Restaurant = restaurants::table
                .find(restaurant_pizza.restaurant_id)
                .select(Restaurant::as_select())
                .first(conn)?;
            let pizza: Pizza = pizzas::table
                .find(restaurant_pizza.pizza_id)
                .select(Pizza::as_select())
                .first(conn)?;

            Ok(RestaurantPizzaDetails {
                restaurant_pizza,
                restaurant,
                pizza,
            })
        })
    }
}

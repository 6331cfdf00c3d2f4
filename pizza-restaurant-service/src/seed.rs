use diesel::{insert_into, prelude::*};

use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::store::StoreError;

fn restaurant(id: i32, name: &str, address: &str) -> Restaurant {
    Restaurant {
        id,
        name: name.to_string(),
        address: address.to_string(),
    }
}

fn pizza(id: i32, name: &str, ingredients: &str) -> Pizza {
    Pizza {
        id,
        name: name.to_string(),
        ingredients: ingredients.to_string(),
    }
}

/// Replaces everything in the database with a small sample data set.
pub fn run(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let restaurants = vec![
        restaurant(1, "Karen's Pizza Shack", "address1"),
        restaurant(2, "Sanjay's Pizza", "address2"),
        restaurant(3, "Kiki's Pizza", "address3"),
    ];
    let pizzas = vec![
        pizza(1, "Emma", "Dough, Tomato Sauce, Cheese"),
        pizza(2, "Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
        pizza(3, "Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
    ];
    let restaurant_pizzas = vec![
        RestaurantPizza {
            id: 1,
            price: 1.0,
            restaurant_id: 1,
            pizza_id: 1,
        },
        RestaurantPizza {
            id: 2,
            price: 4.0,
            restaurant_id: 2,
            pizza_id: 2,
        },
        RestaurantPizza {
            id: 3,
            price: 5.0,
            restaurant_id: 3,
            pizza_id: 3,
        },
    ];

    conn.transaction::<_, StoreError, _>(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;

        insert_into(restaurants::table)
            .values(&restaurants)
            .execute(conn)?;
        insert_into(pizzas::table).values(&pizzas).execute(conn)?;
        insert_into(restaurant_pizzas::table)
            .values(&restaurant_pizzas)
            .execute(conn)?;
        Ok(())
    })
}

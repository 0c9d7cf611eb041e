//! Trolley Domain Concerns

pub mod carts;
pub mod health;
pub mod products;
pub mod users;

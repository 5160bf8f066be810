//! Domain types and the ports the application layer depends on.

pub mod cart;
pub mod money;
pub mod payment;
pub mod ports;
pub mod product;
pub mod user;

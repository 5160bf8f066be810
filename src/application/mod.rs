//! Application layer containing the storefront services.
//!
//! Every service reaches storage through a [`Repository`](repository::Repository)
//! built on an injected key-value port, and payment verification through an
//! injected status checker. Nothing here owns process-wide state.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod ids;
pub mod poller;
pub mod repository;

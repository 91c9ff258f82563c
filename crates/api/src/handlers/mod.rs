//! Request handlers.
//!
//! Handlers orchestrate repositories from `webaction_db` and pure logic from
//! `webaction_core`, and map failures via [`crate::error::AppError`].

pub mod admin_campaigns;
pub mod admin_orders;
pub mod cart;
pub mod shop;

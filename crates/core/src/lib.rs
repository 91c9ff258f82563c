//! Domain logic for the WebAction promotional-campaign ordering platform.
//!
//! Everything in this crate is pure: types, validation, quota arithmetic,
//! cart rules, and the legacy ERP export encoding. No I/O, no database
//! access -- those live in `webaction-db` and `webaction-api`.

pub mod campaign;
pub mod cart;
pub mod error;
pub mod export;
pub mod order;
pub mod quota;
pub mod types;

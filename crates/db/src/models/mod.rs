//! Row structs and request DTOs.
//!
//! Row structs derive `FromRow` + `Serialize`; `Create*`/`Update*` DTOs
//! derive `Deserialize` (and `Validate` where field-level constraints apply).
//! Cross-field invariants are validated in `webaction_core`.

pub mod campaign;
pub mod customer;
pub mod item;
pub mod order;

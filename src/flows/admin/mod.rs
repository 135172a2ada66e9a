//! Admin-only flows
//!
//! Catalog management wizards and the broadcast flow. The dispatcher gates
//! entry on the admin identity; handlers assume the caller is the admin.

pub mod add_service;
pub mod broadcast;
pub mod delete_service;
pub mod edit_service;
pub mod fields;

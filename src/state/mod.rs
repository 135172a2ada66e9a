//! Dialog state management
//!
//! Typed flow definitions and the per-user dialog store.

pub mod flow;
pub mod memory;
pub mod store;

pub use flow::{
    AddServiceStep, DeleteStep, DialogState, EditField, EditStep, FieldAddStep, FieldDraft, Flow,
};
pub use memory::InMemoryDialogStore;
pub use store::{DialogStore, RedisDialogStore};

//! Core document model and editing rules for the guest gazette: the
//! newsletter document schema, merge semantics, section editor operations,
//! and the promotional widget scheduler.

pub mod document;
pub mod editor;
pub mod events;
pub mod widget;

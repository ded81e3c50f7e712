//! NetForge - device modeling and configuration rendering.
//!
//! Form submissions arrive as a flat key -> list-of-values mapping
//! ([`form::FormData`]), are normalized into a structured
//! [`models::DeviceDocument`], persisted one YAML file per hostname
//! ([`store::DocumentStore`]), and later rendered against a vendor template
//! ([`render`]). Live running configurations are captured over SSH
//! ([`retrieve`]) and archived with timestamped filenames
//! ([`store::GoldenStore`]).

pub mod config;
pub mod form;
pub mod models;
pub mod render;
pub mod retrieve;
pub mod store;

pub use form::{normalize, FormData};
pub use models::DeviceDocument;

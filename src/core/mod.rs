//! Core business logic.

pub mod thermal;

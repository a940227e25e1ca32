//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`].

pub mod google_cse;

pub use google_cse::CustomSearchEngine;

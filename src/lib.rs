//! Core of the VC investment search client: response normalization,
//! filtering, aggregation, favorites and export, independent of the GUI.

pub mod api;
pub mod config;
pub mod data;
pub mod debounce;
pub mod error;
pub mod export;
pub mod favorites;
pub mod state;
pub mod worker;

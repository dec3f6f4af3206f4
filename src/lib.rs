//! Terminal map of the Czech school register.
//!
//! Schools are loaded from a `#`-delimited export, filtered by region,
//! operating authority and school type, and drawn as colored Braille markers
//! with an optional regional boundary overlay.

pub mod app;
pub mod braille;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod geo;
pub mod logging;
pub mod map;
pub mod session;
pub mod ui;
pub mod viewport;

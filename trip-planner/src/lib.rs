//! City trip-planning widget core.
//!
//! Sits between a mapping provider and a UI: turns raw, mode-specific
//! routing plans into one ordered itinerary, and manages the lazily
//! initialized subway overlay and its station/line queries.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod itinerary;
pub mod mock;
pub mod panel;
pub mod plan;
pub mod provider;
pub mod route;
pub mod subway;
pub mod web;

//! Train journey monitor.
//!
//! Watches upcoming (and optionally last-of-day) train journeys between
//! two configured stop areas, polled from the SNCF journeys API, and
//! exposes the cached results plus a manual-refresh service.

pub mod cache;
pub mod coordinator;
pub mod domain;
pub mod entry;
pub mod integration;
pub mod platform;
pub mod registry;
pub mod services;
pub mod sncf;
pub mod web;

//! SNCF journeys API client (the connection manager).
//!
//! This module provides an HTTP client for a Navitia-style journeys API,
//! which answers "journeys from stop A to stop B around time T" queries.
//!
//! Key characteristics of the API:
//! - authentication is HTTP Basic with the API key as username and an
//!   empty password
//! - queries are scoped to a coverage region (a path segment)
//! - datetimes are compact `YYYYMMDDTHHMMSS` strings in region-local time
//! - `datetime_represents` selects whether the query time bounds the
//!   departure or the arrival, which is how "last journey of the day"
//!   queries are expressed

mod api;
mod client;
mod convert;
mod error;
pub mod mock;
mod types;

pub use api::JourneyApi;
pub use client::{ApiConnectionManager, ConnectionConfig};
pub use convert::{ConversionError, convert_journey, convert_response};
pub use error::ApiError;
pub use types::{DisplayInformationDto, JourneyDto, JourneysResponse, PlaceDto, SectionDto};

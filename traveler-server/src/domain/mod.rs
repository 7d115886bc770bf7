//! Domain types for journey monitoring.
//!
//! This module contains the core domain model types that represent
//! validated transit data. All types enforce their invariants at
//! construction time, so code that receives these types can trust
//! their validity.

mod error;
mod journey;
mod stop;
mod time;

pub use error::DomainError;
pub use journey::{DisruptionStatus, Journey, Section, SectionKind};
pub use stop::{InvalidStopArea, StopArea};
pub use time::{TimeError, format_compact, parse_compact};

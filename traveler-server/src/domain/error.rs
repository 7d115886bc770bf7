//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from API/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Journey has no sections
    #[error("journey must have at least one section")]
    EmptyJourney,

    /// A section arrives before it departs
    #[error("section arrives before it departs: {0}")]
    ArrivalBeforeDeparture(String),

    /// Consecutive sections are not ordered by time
    #[error("sections out of order at index {0}")]
    SectionsOutOfOrder(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyJourney;
        assert_eq!(err.to_string(), "journey must have at least one section");

        let err = DomainError::SectionsOutOfOrder(2);
        assert_eq!(err.to_string(), "sections out of order at index 2");

        let err = DomainError::ArrivalBeforeDeparture("Paris -> Lyon".into());
        assert!(err.to_string().contains("Paris -> Lyon"));
    }
}

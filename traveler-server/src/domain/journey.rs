//! Journey types.
//!
//! A `Journey` represents one trip from origin to destination as returned
//! by the journeys API: an ordered list of sections (trains, transfers,
//! waits) plus overall disruption status.

use chrono::{Duration, NaiveDateTime};

use super::DomainError;

/// What a section of a journey consists of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// A ride on a public transport service.
    PublicTransport {
        /// Line or route label (e.g. "TER 17412")
        line: String,
        /// Direction / headsign shown on the vehicle
        direction: Option<String>,
    },
    /// A transfer between stops or platforms.
    Transfer,
    /// Waiting at a stop between sections.
    Waiting,
}

impl SectionKind {
    /// Returns true for a public transport ride.
    pub fn is_public_transport(&self) -> bool {
        matches!(self, SectionKind::PublicTransport { .. })
    }
}

/// One section of a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The kind of section.
    pub kind: SectionKind,
    /// Display name of the place the section starts from.
    pub from: String,
    /// Display name of the place the section ends at.
    pub to: String,
    /// Local departure time of this section.
    pub departure: NaiveDateTime,
    /// Local arrival time of this section.
    pub arrival: NaiveDateTime,
}

impl Section {
    /// Returns the duration of this section.
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }
}

/// Disruption status reported for a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisruptionStatus {
    /// No reported disruption.
    #[default]
    Normal,
    /// The service does not run (cancelled).
    NoService,
    /// The journey is affected by a significant delay.
    SignificantDelay,
    /// Part of the journey is cancelled or detoured.
    Disrupted,
}

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one section
/// - Each section arrives no earlier than it departs
/// - Sections are ordered by departure time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    sections: Vec<Section>,
    status: DisruptionStatus,
}

impl Journey {
    /// Constructs a journey from sections, validating the invariants.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the section list is empty, a section arrives
    /// before it departs, or sections are not ordered by departure time.
    pub fn new(sections: Vec<Section>, status: DisruptionStatus) -> Result<Self, DomainError> {
        if sections.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for section in &sections {
            if section.arrival < section.departure {
                return Err(DomainError::ArrivalBeforeDeparture(format!(
                    "{} -> {}",
                    section.from, section.to
                )));
            }
        }

        for (i, window) in sections.windows(2).enumerate() {
            if window[1].departure < window[0].departure {
                return Err(DomainError::SectionsOutOfOrder(i + 1));
            }
        }

        Ok(Journey { sections, status })
    }

    /// Returns all sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the disruption status.
    pub fn status(&self) -> DisruptionStatus {
        self.status
    }

    /// Returns the display name of the origin.
    pub fn origin(&self) -> &str {
        // Safe: validated non-empty at construction
        &self.sections.first().unwrap().from
    }

    /// Returns the display name of the destination.
    pub fn destination(&self) -> &str {
        // Safe: validated non-empty at construction
        &self.sections.last().unwrap().to
    }

    /// Returns the overall departure time.
    pub fn departure(&self) -> NaiveDateTime {
        self.sections.first().unwrap().departure
    }

    /// Returns the overall arrival time.
    pub fn arrival(&self) -> NaiveDateTime {
        self.sections.last().unwrap().arrival
    }

    /// Returns the total journey duration.
    pub fn duration(&self) -> Duration {
        self.arrival() - self.departure()
    }

    /// Returns the number of public transport rides.
    pub fn ride_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.kind.is_public_transport())
            .count()
    }

    /// Returns the number of transfers (rides - 1, or 0 for direct).
    pub fn transfer_count(&self) -> usize {
        self.ride_count().saturating_sub(1)
    }

    /// Returns true if this is a direct journey (single ride).
    pub fn is_direct(&self) -> bool {
        self.ride_count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn ride(from: &str, to: &str, dep: NaiveDateTime, arr: NaiveDateTime) -> Section {
        Section {
            kind: SectionKind::PublicTransport {
                line: "TER 17412".into(),
                direction: Some(to.to_string()),
            },
            from: from.into(),
            to: to.into(),
            departure: dep,
            arrival: arr,
        }
    }

    #[test]
    fn direct_journey() {
        let journey = Journey::new(
            vec![ride("Paris Gare de Lyon", "Lyon Part-Dieu", dt(10, 0), dt(12, 0))],
            DisruptionStatus::Normal,
        )
        .unwrap();

        assert!(journey.is_direct());
        assert_eq!(journey.ride_count(), 1);
        assert_eq!(journey.transfer_count(), 0);
        assert_eq!(journey.origin(), "Paris Gare de Lyon");
        assert_eq!(journey.destination(), "Lyon Part-Dieu");
        assert_eq!(journey.departure(), dt(10, 0));
        assert_eq!(journey.arrival(), dt(12, 0));
        assert_eq!(journey.duration(), Duration::hours(2));
    }

    #[test]
    fn journey_with_transfer() {
        let journey = Journey::new(
            vec![
                ride("Paris", "Dijon", dt(10, 0), dt(11, 30)),
                Section {
                    kind: SectionKind::Transfer,
                    from: "Dijon".into(),
                    to: "Dijon".into(),
                    departure: dt(11, 30),
                    arrival: dt(11, 40),
                },
                Section {
                    kind: SectionKind::Waiting,
                    from: "Dijon".into(),
                    to: "Dijon".into(),
                    departure: dt(11, 40),
                    arrival: dt(11, 55),
                },
                ride("Dijon", "Besançon", dt(11, 55), dt(12, 50)),
            ],
            DisruptionStatus::Normal,
        )
        .unwrap();

        assert!(!journey.is_direct());
        assert_eq!(journey.ride_count(), 2);
        assert_eq!(journey.transfer_count(), 1);
        assert_eq!(journey.destination(), "Besançon");
        assert_eq!(journey.duration(), Duration::minutes(170));
    }

    #[test]
    fn empty_sections_rejected() {
        let result = Journey::new(vec![], DisruptionStatus::Normal);
        assert!(matches!(result, Err(DomainError::EmptyJourney)));
    }

    #[test]
    fn arrival_before_departure_rejected() {
        let result = Journey::new(
            vec![ride("Paris", "Lyon", dt(12, 0), dt(10, 0))],
            DisruptionStatus::Normal,
        );
        assert!(matches!(
            result,
            Err(DomainError::ArrivalBeforeDeparture(_))
        ));
    }

    #[test]
    fn out_of_order_sections_rejected() {
        let result = Journey::new(
            vec![
                ride("Dijon", "Besançon", dt(11, 55), dt(12, 50)),
                ride("Paris", "Dijon", dt(10, 0), dt(11, 30)),
            ],
            DisruptionStatus::Normal,
        );
        assert!(matches!(result, Err(DomainError::SectionsOutOfOrder(1))));
    }

    #[test]
    fn section_duration() {
        let s = ride("Paris", "Lyon", dt(10, 0), dt(12, 15));
        assert_eq!(s.duration(), Duration::minutes(135));
    }

    #[test]
    fn disruption_status_kept() {
        let journey = Journey::new(
            vec![ride("Paris", "Lyon", dt(10, 0), dt(12, 0))],
            DisruptionStatus::SignificantDelay,
        )
        .unwrap();
        assert_eq!(journey.status(), DisruptionStatus::SignificantDelay);
    }
}

//! JSON DTOs for the web layer.

use serde::Serialize;

use crate::coordinator::JourneySnapshot;
use crate::domain::{DisruptionStatus, Journey, Section, SectionKind};

/// Snapshot of one coordinator, as served over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    /// Whether the most recent refresh succeeded.
    pub available: bool,

    /// RFC 3339 timestamp of the last successful refresh.
    pub last_success: Option<String>,

    /// Error message from the most recent failed refresh.
    pub last_error: Option<String>,

    /// The cached journeys.
    pub journeys: Vec<JourneyView>,
}

impl From<&JourneySnapshot> for SnapshotView {
    fn from(snapshot: &JourneySnapshot) -> Self {
        Self {
            available: snapshot.available,
            last_success: snapshot.last_success.map(|t| t.to_rfc3339()),
            last_error: snapshot.last_error.clone(),
            journeys: snapshot.journeys.iter().map(JourneyView::from).collect(),
        }
    }
}

/// One journey, flattened for display.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyView {
    pub origin: String,
    pub destination: String,
    pub departure: String,
    pub arrival: String,
    pub duration_mins: i64,
    pub transfers: usize,
    pub status: String,
    pub sections: Vec<SectionView>,
}

impl From<&Journey> for JourneyView {
    fn from(journey: &Journey) -> Self {
        Self {
            origin: journey.origin().to_string(),
            destination: journey.destination().to_string(),
            departure: journey.departure().to_string(),
            arrival: journey.arrival().to_string(),
            duration_mins: journey.duration().num_minutes(),
            transfers: journey.transfer_count(),
            status: status_str(journey.status()).to_string(),
            sections: journey.sections().iter().map(SectionView::from).collect(),
        }
    }
}

/// One section of a journey.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub kind: String,
    pub line: Option<String>,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        let (kind, line) = match &section.kind {
            SectionKind::PublicTransport { line, .. } => {
                ("public_transport", Some(line.clone()))
            }
            SectionKind::Transfer => ("transfer", None),
            SectionKind::Waiting => ("waiting", None),
        };

        Self {
            kind: kind.to_string(),
            line,
            from: section.from.clone(),
            to: section.to.clone(),
            departure: section.departure.to_string(),
            arrival: section.arrival.to_string(),
        }
    }
}

fn status_str(status: DisruptionStatus) -> &'static str {
    match status {
        DisruptionStatus::Normal => "normal",
        DisruptionStatus::NoService => "no_service",
        DisruptionStatus::SignificantDelay => "significant_delay",
        DisruptionStatus::Disrupted => "disrupted",
    }
}

/// Response for `GET /entries/{id}/journeys`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryJourneysResponse {
    pub entry_id: String,
    pub next_journey: SnapshotView,
    pub last_journey: Option<SnapshotView>,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncf::mock::fixture_journey;

    #[test]
    fn journey_view_from_domain() {
        let journey = fixture_journey(10, 0);
        let view = JourneyView::from(&journey);

        assert_eq!(view.origin, "Paris Gare de Lyon");
        assert_eq!(view.destination, "Lyon Part-Dieu");
        assert_eq!(view.duration_mins, 120);
        assert_eq!(view.transfers, 0);
        assert_eq!(view.status, "normal");
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].kind, "public_transport");
        assert_eq!(view.sections[0].line.as_deref(), Some("TER 17412"));
    }

    #[test]
    fn snapshot_view_serializes() {
        let snapshot = JourneySnapshot {
            journeys: vec![fixture_journey(10, 0)],
            last_success: None,
            last_error: Some("boom".into()),
            available: false,
        };

        let view = SnapshotView::from(&snapshot);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["available"], false);
        assert_eq!(json["last_error"], "boom");
        assert_eq!(json["journeys"].as_array().unwrap().len(), 1);
    }
}

//! Journeys API response DTOs.
//!
//! These types map directly to the Navitia-style JSON responses. They use
//! `Option` liberally because the API omits fields rather than sending
//! null in many cases.

use serde::Deserialize;

/// Response from the `/journeys` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneysResponse {
    /// Matched journeys, best first. Absent when nothing matched.
    pub journeys: Option<Vec<JourneyDto>>,
}

/// One journey in a `/journeys` response.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyDto {
    /// Overall departure, compact local datetime.
    pub departure_date_time: String,

    /// Overall arrival, compact local datetime.
    pub arrival_date_time: String,

    /// Total duration in seconds.
    pub duration: Option<i64>,

    /// Number of transfers.
    pub nb_transfers: Option<u32>,

    /// Disruption status: empty, "SIGNIFICANT_DELAYS", "NO_SERVICE", ...
    pub status: Option<String>,

    /// The sections making up the journey.
    pub sections: Option<Vec<SectionDto>>,
}

/// One section of a journey.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionDto {
    /// Section type: "public_transport", "transfer", "waiting",
    /// "street_network", "crow_fly", ...
    #[serde(rename = "type")]
    pub section_type: String,

    /// Section departure, compact local datetime.
    pub departure_date_time: Option<String>,

    /// Section arrival, compact local datetime.
    pub arrival_date_time: Option<String>,

    /// Where the section starts.
    pub from: Option<PlaceDto>,

    /// Where the section ends.
    pub to: Option<PlaceDto>,

    /// Display information for public transport sections.
    pub display_informations: Option<DisplayInformationDto>,
}

/// A place reference in a section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDto {
    /// Human-readable place name.
    pub name: Option<String>,

    /// Navitia object id (e.g. a stop point id).
    pub id: Option<String>,
}

/// Line/vehicle display information.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayInformationDto {
    /// Commercial mode, e.g. "TER", "TGV INOUI".
    pub commercial_mode: Option<String>,

    /// Line code or train number.
    pub code: Option<String>,

    /// Headsign / trip number displayed on the vehicle.
    pub headsign: Option<String>,

    /// Direction shown on the vehicle.
    pub direction: Option<String>,
}

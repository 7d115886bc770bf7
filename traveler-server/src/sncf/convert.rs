//! Conversion from journeys API DTOs to domain types.
//!
//! Handles the transformation of raw journey responses into validated
//! domain types. Journeys that fail to convert are skipped with a warning
//! rather than failing the whole response.

use crate::domain::{DisruptionStatus, Journey, Section, SectionKind, parse_compact};

use super::types::{JourneyDto, JourneysResponse, SectionDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a compact datetime
    #[error("invalid datetime: {0}")]
    InvalidDateTime(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Journey structure was invalid
    #[error("invalid journey: {0}")]
    InvalidJourney(String),
}

/// Convert a full journeys response to domain journeys.
///
/// Individual journeys that fail to convert are skipped.
pub fn convert_response(response: &JourneysResponse) -> Vec<Journey> {
    let dtos = response.journeys.as_deref().unwrap_or(&[]);

    let mut journeys = Vec::with_capacity(dtos.len());
    for dto in dtos {
        match convert_journey(dto) {
            Ok(journey) => journeys.push(journey),
            Err(e) => {
                tracing::warn!(error = %e, "skipping journey that failed to convert");
            }
        }
    }
    journeys
}

/// Convert a single journey DTO to a domain journey.
pub fn convert_journey(dto: &JourneyDto) -> Result<Journey, ConversionError> {
    let section_dtos = dto
        .sections
        .as_deref()
        .ok_or(ConversionError::MissingField("sections"))?;

    let mut sections = Vec::with_capacity(section_dtos.len());
    for section in section_dtos {
        if let Some(converted) = convert_section(section)? {
            sections.push(converted);
        }
    }

    let status = parse_status(dto.status.as_deref());

    Journey::new(sections, status).map_err(|e| ConversionError::InvalidJourney(e.to_string()))
}

/// Convert one section. Returns `Ok(None)` for section types that carry
/// no schedule information worth keeping (e.g. zero-length crow_fly).
fn convert_section(dto: &SectionDto) -> Result<Option<Section>, ConversionError> {
    let departure_str = dto
        .departure_date_time
        .as_deref()
        .ok_or(ConversionError::MissingField("departure_date_time"))?;
    let arrival_str = dto
        .arrival_date_time
        .as_deref()
        .ok_or(ConversionError::MissingField("arrival_date_time"))?;

    let departure = parse_compact(departure_str)
        .map_err(|_| ConversionError::InvalidDateTime(departure_str.to_string()))?;
    let arrival = parse_compact(arrival_str)
        .map_err(|_| ConversionError::InvalidDateTime(arrival_str.to_string()))?;

    let kind = match dto.section_type.as_str() {
        "public_transport" => {
            let di = dto.display_informations.as_ref();
            let line = di
                .map(|d| {
                    let mode = d.commercial_mode.as_deref().unwrap_or("");
                    let code = d
                        .code
                        .as_deref()
                        .or(d.headsign.as_deref())
                        .unwrap_or("");
                    match (mode.is_empty(), code.is_empty()) {
                        (false, false) => format!("{mode} {code}"),
                        (false, true) => mode.to_string(),
                        (true, false) => code.to_string(),
                        (true, true) => String::new(),
                    }
                })
                .unwrap_or_default();
            SectionKind::PublicTransport {
                line,
                direction: di.and_then(|d| d.direction.clone()),
            }
        }
        "waiting" => SectionKind::Waiting,
        // transfer, street_network, crow_fly and friends all amount to
        // "get yourself from A to B"
        _ => {
            if departure == arrival {
                return Ok(None);
            }
            SectionKind::Transfer
        }
    };

    let from = dto
        .from
        .as_ref()
        .and_then(|p| p.name.clone())
        .unwrap_or_default();
    let to = dto
        .to
        .as_ref()
        .and_then(|p| p.name.clone())
        .unwrap_or_default();

    Ok(Some(Section {
        kind,
        from,
        to,
        departure,
        arrival,
    }))
}

fn parse_status(status: Option<&str>) -> DisruptionStatus {
    match status {
        Some("SIGNIFICANT_DELAYS") => DisruptionStatus::SignificantDelay,
        Some("NO_SERVICE") => DisruptionStatus::NoService,
        Some("REDUCED_SERVICE") | Some("DETOUR") | Some("MODIFIED_SERVICE") => {
            DisruptionStatus::Disrupted
        }
        _ => DisruptionStatus::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncf::types::{DisplayInformationDto, PlaceDto};

    fn place(name: &str) -> Option<PlaceDto> {
        Some(PlaceDto {
            name: Some(name.to_string()),
            id: None,
        })
    }

    fn pt_section(from: &str, to: &str, dep: &str, arr: &str) -> SectionDto {
        SectionDto {
            section_type: "public_transport".into(),
            departure_date_time: Some(dep.into()),
            arrival_date_time: Some(arr.into()),
            from: place(from),
            to: place(to),
            display_informations: Some(DisplayInformationDto {
                commercial_mode: Some("TER".into()),
                code: Some("17412".into()),
                headsign: None,
                direction: Some(to.to_string()),
            }),
        }
    }

    fn journey_dto(sections: Vec<SectionDto>) -> JourneyDto {
        JourneyDto {
            departure_date_time: "20260829T100000".into(),
            arrival_date_time: "20260829T120000".into(),
            duration: Some(7200),
            nb_transfers: Some(0),
            status: Some(String::new()),
            sections: Some(sections),
        }
    }

    #[test]
    fn convert_direct_journey() {
        let dto = journey_dto(vec![pt_section(
            "Paris",
            "Lyon",
            "20260829T100000",
            "20260829T120000",
        )]);

        let journey = convert_journey(&dto).unwrap();
        assert!(journey.is_direct());
        assert_eq!(journey.origin(), "Paris");
        assert_eq!(journey.destination(), "Lyon");

        let SectionKind::PublicTransport { line, direction } = &journey.sections()[0].kind else {
            panic!("expected public transport section");
        };
        assert_eq!(line, "TER 17412");
        assert_eq!(direction.as_deref(), Some("Lyon"));
    }

    #[test]
    fn zero_length_access_sections_dropped() {
        let mut crow_fly = pt_section("Paris", "Paris", "20260829T100000", "20260829T100000");
        crow_fly.section_type = "crow_fly".into();
        crow_fly.display_informations = None;

        let dto = journey_dto(vec![
            crow_fly,
            pt_section("Paris", "Lyon", "20260829T100000", "20260829T120000"),
        ]);

        let journey = convert_journey(&dto).unwrap();
        assert_eq!(journey.sections().len(), 1);
    }

    #[test]
    fn transfer_sections_kept() {
        let mut transfer = pt_section("Dijon", "Dijon", "20260829T113000", "20260829T114000");
        transfer.section_type = "transfer".into();
        transfer.display_informations = None;

        let dto = journey_dto(vec![
            pt_section("Paris", "Dijon", "20260829T100000", "20260829T113000"),
            transfer,
            pt_section("Dijon", "Besançon", "20260829T114000", "20260829T123000"),
        ]);

        let journey = convert_journey(&dto).unwrap();
        assert_eq!(journey.sections().len(), 3);
        assert_eq!(journey.transfer_count(), 1);
    }

    #[test]
    fn missing_sections_is_error() {
        let mut dto = journey_dto(vec![]);
        dto.sections = None;
        assert!(matches!(
            convert_journey(&dto),
            Err(ConversionError::MissingField("sections"))
        ));
    }

    #[test]
    fn bad_datetime_is_error() {
        let dto = journey_dto(vec![pt_section(
            "Paris",
            "Lyon",
            "2026-08-29T10:00:00",
            "20260829T120000",
        )]);
        assert!(matches!(
            convert_journey(&dto),
            Err(ConversionError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(parse_status(None), DisruptionStatus::Normal);
        assert_eq!(parse_status(Some("")), DisruptionStatus::Normal);
        assert_eq!(
            parse_status(Some("SIGNIFICANT_DELAYS")),
            DisruptionStatus::SignificantDelay
        );
        assert_eq!(parse_status(Some("NO_SERVICE")), DisruptionStatus::NoService);
        assert_eq!(
            parse_status(Some("REDUCED_SERVICE")),
            DisruptionStatus::Disrupted
        );
    }

    #[test]
    fn convert_response_skips_bad_journeys() {
        let good = journey_dto(vec![pt_section(
            "Paris",
            "Lyon",
            "20260829T100000",
            "20260829T120000",
        )]);
        let mut bad = journey_dto(vec![]);
        bad.sections = None;

        let response = JourneysResponse {
            journeys: Some(vec![bad, good]),
        };

        let journeys = convert_response(&response);
        assert_eq!(journeys.len(), 1);
        assert_eq!(journeys[0].origin(), "Paris");
    }
}

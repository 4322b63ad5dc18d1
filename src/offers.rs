//! Purchase offers: input validation, the click-tracking URL, and the
//! WhatsApp hand-off the tracking endpoint redirects to.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferError {
    #[error("Por favor ingresa una oferta válida")]
    InvalidAmount,
    #[error("Error: No se pudo identificar el vehículo")]
    MissingVehicle,
}

/// Body of the offer dialog submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferForm {
    pub vehicle_id: Option<String>,
    pub offer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferSubmission {
    pub vehicle_id: u32,
    pub amount: i64,
}

impl OfferSubmission {
    /// The amount is checked before the vehicle, matching the order users see the messages in.
    pub fn validate(form: &OfferForm) -> Result<Self, OfferError> {
        let amount = form
            .offer
            .as_deref()
            .map(sanitize_offer_input)
            .and_then(|digits| digits.parse::<i64>().ok())
            .filter(|amount| *amount > 0)
            .ok_or(OfferError::InvalidAmount)?;

        let vehicle_id = form
            .vehicle_id
            .as_deref()
            .map(str::trim)
            .and_then(|id| id.parse::<u32>().ok())
            .ok_or(OfferError::MissingVehicle)?;

        Ok(Self { vehicle_id, amount })
    }

    pub fn track_url(&self) -> String {
        track_url(self.vehicle_id, self.amount)
    }
}

/// Keeps only the digits typed into the offer box.
pub fn sanitize_offer_input(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn track_url(vehicle_id: u32, amount: i64) -> String {
    format!("/track_click/{}/offer?offer={}", vehicle_id, amount)
}

/// Offer amount as received by the tracking endpoint; thousands separators
/// are tolerated and anything unparseable counts as zero.
pub fn parse_tracked_offer(raw: Option<&str>) -> i64 {
    raw.map(|s| s.replace(['.', ','], ""))
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

pub fn whatsapp_url(number: &str, message: &str) -> Result<Url, url::ParseError> {
    let number = number.replace('+', "");
    Url::parse_with_params(&format!("https://wa.me/{}", number.trim()), &[("text", message)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(vehicle_id: Option<&str>, offer: Option<&str>) -> OfferForm {
        OfferForm {
            vehicle_id: vehicle_id.map(String::from),
            offer: offer.map(String::from),
        }
    }

    #[test]
    fn valid_offer_builds_track_url() {
        let submission = OfferSubmission::validate(&form(Some("12"), Some("1.500.000"))).unwrap();
        assert_eq!(submission, OfferSubmission { vehicle_id: 12, amount: 1_500_000 });
        assert_eq!(submission.track_url(), "/track_click/12/offer?offer=1500000");
    }

    #[test]
    fn rejects_zero_empty_and_garbage_amounts() {
        for offer in [None, Some(""), Some("0"), Some("abc")] {
            assert_eq!(
                OfferSubmission::validate(&form(Some("1"), offer)),
                Err(OfferError::InvalidAmount)
            );
        }
    }

    #[test]
    fn amount_checked_before_vehicle() {
        assert_eq!(
            OfferSubmission::validate(&form(None, None)),
            Err(OfferError::InvalidAmount)
        );
        assert_eq!(
            OfferSubmission::validate(&form(Some(""), Some("100"))),
            Err(OfferError::MissingVehicle)
        );
    }

    #[test]
    fn sanitizes_non_digits() {
        assert_eq!(sanitize_offer_input("$ 1.200.000,-"), "1200000");
    }

    #[test]
    fn tracked_offer_parsing_is_lenient() {
        assert_eq!(parse_tracked_offer(Some("1.250.000")), 1_250_000);
        assert_eq!(parse_tracked_offer(Some("9,999")), 9999);
        assert_eq!(parse_tracked_offer(Some("mucho")), 0);
        assert_eq!(parse_tracked_offer(None), 0);
    }

    #[test]
    fn whatsapp_url_strips_plus_and_encodes_text() {
        let url = whatsapp_url("+5492615550000", "Hola! Precio: $1.000").unwrap();
        assert_eq!(url.path(), "/5492615550000");
        let text = url.query_pairs().find(|(k, _)| k == "text").map(|(_, v)| v.into_owned());
        assert_eq!(text.as_deref(), Some("Hola! Precio: $1.000"));
    }
}

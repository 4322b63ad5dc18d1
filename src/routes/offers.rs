// Offer dialog submission and click tracking

use axum::{
    extract::{ConnectInfo, Form, Path, Query, State},
    http::{header, HeaderMap},
    response::Redirect,
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::{
    error::{AppError, AppResult},
    models::{Click, ClickType},
    offers::{self, OfferForm, OfferSubmission},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    offer: Option<String>,
}

// POST /offers
pub async fn submit_offer(Form(form): Form<OfferForm>) -> AppResult<Redirect> {
    let submission = OfferSubmission::validate(&form)?;
    tracing::info!(
        vehicle_id = submission.vehicle_id,
        amount = submission.amount,
        "Offer submitted"
    );
    Ok(Redirect::to(&submission.track_url()))
}

// GET /track_click/:vehicle_id/:click_type
pub async fn track_click(
    State(app_state): State<AppState>,
    Path((vehicle_id, click_type)): Path<(u32, String)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<TrackQuery>,
) -> AppResult<Redirect> {
    let vehicle = app_state
        .catalog
        .get(vehicle_id)
        .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", vehicle_id)))?;

    let click_type = ClickType::from(click_type.as_str());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    app_state
        .clicks
        .record(Click::new(
            vehicle_id,
            click_type.clone(),
            Some(addr.ip().to_string()),
            user_agent,
        ))
        .await;
    tracing::debug!(
        "Vehicle {} now has {} tracked clicks",
        vehicle_id,
        app_state.clicks.count_for(vehicle_id).await
    );

    let site_url = app_state.settings.base_url.as_str();
    let message = match click_type {
        ClickType::WhatsApp => vehicle.whatsapp_contact_message(site_url),
        ClickType::Offer => {
            let amount = offers::parse_tracked_offer(query.offer.as_deref());
            vehicle.whatsapp_offer_message(amount, site_url)
        }
        ClickType::Other(_) => format!("Consulta sobre: {}", vehicle.title),
    };

    let number = vehicle
        .whatsapp_number
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            AppError::NotFound(format!("Vehicle {} has no WhatsApp contact", vehicle_id))
        })?;

    let target = offers::whatsapp_url(number, &message).map_err(|e| {
        AppError::InternalServerError(anyhow::anyhow!(
            "Invalid WhatsApp number for vehicle {}: {}",
            vehicle_id,
            e
        ))
    })?;
    Ok(Redirect::to(target.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::vehicle;
    use crate::routes::test_support::{body_text, decode_form, location, state};
    use axum::{http::StatusCode, response::IntoResponse};

    fn addr() -> ConnectInfo<SocketAddr> {
        ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000)))
    }

    fn track_query(offer: Option<&str>) -> Query<TrackQuery> {
        Query(TrackQuery {
            offer: offer.map(String::from),
        })
    }

    #[tokio::test]
    async fn valid_offer_redirects_to_tracking() {
        let resp = submit_offer(Form(decode_form("vehicle_id=5&offer=2.500.000")))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/track_click/5/offer?offer=2500000");
    }

    #[tokio::test]
    async fn invalid_offer_is_rejected_with_message() {
        let resp = submit_offer(Form(decode_form("vehicle_id=5&offer=0")))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(resp).await, "Por favor ingresa una oferta válida");

        let resp = submit_offer(Form(decode_form("offer=100"))).await.into_response();
        assert_eq!(body_text(resp).await, "Error: No se pudo identificar el vehículo");
    }

    #[tokio::test]
    async fn offer_click_is_logged_and_sent_to_whatsapp() {
        let app_state = state(vec![vehicle(9, "Renault Kangoo", 12_000_000)]);
        let resp = track_click(
            State(app_state.clone()),
            Path((9, "offer".to_string())),
            addr(),
            HeaderMap::new(),
            track_query(Some("11.000.000")),
        )
        .await
        .into_response();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let target = url::Url::parse(&location(&resp)).unwrap();
        assert_eq!(target.host_str(), Some("wa.me"));
        assert_eq!(target.path(), "/5492615550000");
        let text: String = target
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(text.contains("Mi oferta: $11.000.000 ARS"));
        assert_eq!(app_state.clicks.count_for(9).await, 1);
    }

    #[tokio::test]
    async fn other_click_types_ask_a_question() {
        let app_state = state(vec![vehicle(2, "Chevrolet Onix", 1)]);
        let resp = track_click(
            State(app_state),
            Path((2, "call".to_string())),
            addr(),
            HeaderMap::new(),
            track_query(None),
        )
        .await
        .into_response();
        let target = url::Url::parse(&location(&resp)).unwrap();
        let text = target.query_pairs().next().map(|(_, v)| v.into_owned());
        assert_eq!(text.as_deref(), Some("Consulta sobre: Chevrolet Onix"));
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let app_state = state(Vec::new());
        let resp = track_click(
            State(app_state.clone()),
            Path((77, "whatsapp".to_string())),
            addr(),
            HeaderMap::new(),
            track_query(None),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(app_state.clicks.count_for(77).await, 0);
    }

    #[tokio::test]
    async fn vehicle_without_whatsapp_is_not_found() {
        let mut v = vehicle(4, "Jeep Renegade", 1);
        v.whatsapp_number = None;
        let resp = track_click(
            State(state(vec![v])),
            Path((4, "whatsapp".to_string())),
            addr(),
            HeaderMap::new(),
            track_query(None),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

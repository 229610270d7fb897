//! REST adapter
//!
//! 与 gRPC SearchHotels 共用同一个搜索处理器

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use stay_bootstrap::metrics::record_http_request;
use stay_errors::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::application::SearchHandler;
use crate::domain::{Hotel, SearchCriteria};

#[derive(Clone)]
pub struct RestState {
    search: Arc<SearchHandler>,
    service: String,
}

impl RestState {
    pub fn new(search: Arc<SearchHandler>, service: impl Into<String>) -> Self {
        Self {
            search,
            service: service.into(),
        }
    }
}

pub fn router(state: RestState) -> Router {
    Router::new()
        .route("/hotels/search", post(search_hotels))
        .route("/health", get(health))
        .fallback(unknown_route)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Every field is optional; zero or empty means "any".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub city: String,
    pub min_stars: i32,
    pub max_stars: i32,
    pub min_price: f64,
    pub max_price: f64,
    pub accommodation_type: String,
    pub order_by: String,
    pub delay_seconds: i32,
}

#[derive(Debug, Serialize)]
pub struct HotelDto {
    pub id: String,
    pub name: String,
    pub city: String,
    pub stars: u8,
    pub price: f64,
    pub available: bool,
    pub amenities: Vec<String>,
    pub accommodation_type: String,
}

impl From<Hotel> for HotelDto {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            city: hotel.city,
            stars: hotel.stars,
            price: hotel.price.to_f64().unwrap_or_default(),
            available: hotel.available,
            amenities: hotel.amenities,
            accommodation_type: hotel.accommodation_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub hotels: Vec<HotelDto>,
    pub has_availability: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

/// RFC 7807 错误响应
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = self.0.to_problem_details();
        let status =
            StatusCode::from_u16(details.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(details),
        )
            .into_response()
    }
}

async fn search_hotels(
    State(state): State<RestState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let started = Instant::now();
    let result = run_search(&state, req).await;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(response) => {
            record_http_request("/hotels/search", 200, duration_ms);
            Ok(Json(response))
        }
        Err(e) => {
            warn!(error = %e, "REST search failed");
            record_http_request("/hotels/search", e.status_code(), duration_ms);
            Err(e.into())
        }
    }
}

async fn run_search(state: &RestState, req: SearchRequest) -> Result<SearchResponse, AppError> {
    let criteria = SearchCriteria::from_wire(
        &req.city,
        req.min_stars,
        req.max_stars,
        req.min_price,
        req.max_price,
        &req.accommodation_type,
        &req.order_by,
        req.delay_seconds,
    )?;
    let outcome = state.search.search(criteria).await?;
    Ok(SearchResponse {
        has_availability: outcome.has_availability,
        hotels: outcome.hotels.into_iter().map(HotelDto::from).collect(),
    })
}

async fn health(State(state): State<RestState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        service: state.service.clone(),
    })
}

async fn unknown_route(uri: Uri) -> ApiError {
    AppError::not_found(format!("no route for {}", uri.path())).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InventoryProvider;
    use axum::body::Body;
    use axum::http::Request;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;
    use stay_config::SearchConfig;
    use tower::ServiceExt;

    struct TwoHotels;

    impl InventoryProvider for TwoHotels {
        fn snapshot(&self) -> Arc<[Hotel]> {
            let hotel = |id: &str, city: &str, stars: u8| Hotel {
                id: id.to_string(),
                name: format!("Pousada {}", id),
                city: city.to_string(),
                stars,
                price: dec!(120.50),
                available: true,
                amenities: vec!["Wi-Fi".to_string()],
                accommodation_type: "Pousada".to_string(),
            };
            vec![hotel("a", "Salvador", 3), hotel("b", "Manaus", 4)].into()
        }
    }

    fn app() -> Router {
        let config = SearchConfig {
            price_variation: 0.0,
            availability_rate: 1.0,
            max_delay_seconds: 0,
        };
        let search = SearchHandler::new(Arc::new(TwoHotels), &config, StdRng::seed_from_u64(3));
        router(RestState::new(Arc::new(search), "hotel-service"))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "OK");
        assert_eq!(json["service"], "hotel-service");
    }

    #[tokio::test]
    async fn test_search_filters_by_city() {
        let req = Request::builder()
            .method("POST")
            .uri("/hotels/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"city":"salvador"}"#))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["hotels"].as_array().unwrap().len(), 1);
        assert_eq!(json["hotels"][0]["id"], "a");
        assert_eq!(json["hotels"][0]["price"], 120.5);
        assert_eq!(json["has_availability"], true);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_not_found() {
        let req = Request::builder().uri("/flights").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["title"], "Resource Not Found");
        assert!(json["detail"].as_str().unwrap().contains("/flights"));
    }

    #[tokio::test]
    async fn test_invalid_search_returns_problem_details() {
        let req = Request::builder()
            .method("POST")
            .uri("/hotels/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"min_stars":5,"max_stars":2}"#))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/problem+json"
        );

        let json = body_json(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["title"], "Validation Error");
    }
}

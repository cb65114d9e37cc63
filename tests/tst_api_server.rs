use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use nse_insights::api_server_axum::{build_router, AppState};
use nse_insights::insights::{InsightService, SynthesisContext};
use tower::ServiceExt;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn pinned() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 17).unwrap()
    }

    fn test_router() -> Router {
        build_router(AppState::new(InsightService::local_only(), Some(pinned())))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> Value {
        let (status, body) = get(app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(&test_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_prediction_endpoint() {
        let app = test_router();
        let json = get_json(&app, "/api/prediction?symbol=reliance").await;

        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert_eq!(data["symbol"], "RELIANCE");
        assert_eq!(data["technicalIndicators"].as_array().unwrap().len(), 6);
        assert_eq!(data["riskFactors"].as_array().unwrap().len(), 4);
        assert!(data["targetLower"].as_f64().unwrap() < data["targetUpper"].as_f64().unwrap());
        assert!(["bullish", "bearish", "neutral"].contains(&data["direction"].as_str().unwrap()));

        // second call is served from the cache and must agree
        let again = get_json(&app, "/api/prediction?symbol=RELIANCE").await;
        assert_eq!(again["data"], json["data"]);
    }

    #[tokio::test]
    async fn test_prediction_requires_symbol() {
        let app = test_router();
        let json = get_json(&app, "/api/prediction?symbol=%20").await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "symbol is required");

        let (status, _) = get(&app, "/api/prediction").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_prediction_history_without_backend_is_empty() {
        let json = get_json(&test_router(), "/api/predictions/history?symbol=TCS").await;
        assert_eq!(json["success"], true);
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_news_endpoint_filters_by_tab() {
        let app = test_router();

        let all = get_json(&app, "/api/news?symbol=TCS").await;
        assert_eq!(all["data"]["tab"], "all");
        assert_eq!(all["data"]["tab_label"], "All");
        let articles = all["data"]["articles"].as_array().unwrap();
        assert!((6..=8).contains(&articles.len()));

        let regulatory = get_json(&app, "/api/news?symbol=TCS&tab=regulatory").await;
        assert_eq!(regulatory["data"]["tab_label"], "Regulatory");
        for article in regulatory["data"]["articles"].as_array().unwrap() {
            assert_eq!(article["category"], "regulatory");
        }

        let tariffs = get_json(&app, "/api/news?symbol=TCS&tab=tariffs").await;
        for article in tariffs["data"]["articles"].as_array().unwrap() {
            let category = article["category"].as_str().unwrap();
            assert!(category == "tariffs" || category == "importExport", "{}", category);
        }
    }

    #[tokio::test]
    async fn test_news_defaults_to_market_index() {
        let json = get_json(&test_router(), "/api/news").await;
        assert_eq!(json["success"], true);
        let titles: Vec<&str> = json["data"]["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert!(!titles.is_empty());
        assert!(titles.iter().all(|t| !t.contains("{symbol}")));
    }

    #[tokio::test]
    async fn test_market_call_endpoint() {
        let app = test_router();
        let json = get_json(&app, "/api/market-call").await;

        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert!(["Bullish", "Bearish", "Moderate"].contains(&data["call"].as_str().unwrap()));
        let confidence = data["confidence"].as_f64().unwrap();
        assert!((45.0..=95.0).contains(&confidence));
        assert!(data["rationale"].as_str().unwrap().contains("Composite score"));

        let expected = InsightService::local_only().todays_market_call(&SynthesisContext::for_date(pinned()));
        assert_eq!(data["call"], serde_json::to_value(expected.call).unwrap());
    }

    #[tokio::test]
    async fn test_market_call_history_without_backend_is_empty() {
        let json = get_json(&test_router(), "/api/market-calls/history").await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_daily_picks_endpoint() {
        let json = get_json(&test_router(), "/api/daily-picks").await;
        let picks = json["data"].as_array().unwrap();
        assert_eq!(picks.len(), 4);

        assert_eq!(picks[0]["trend"], "bullish");
        assert_eq!(picks[1]["trend"], "bullish");
        assert_eq!(picks[2]["trend"], "bearish");
        assert_eq!(picks[3]["trend"], "bearish");
        assert_eq!(picks[3]["sectorOverrideApplied"], true);
        for pick in picks {
            assert_eq!(pick["expiry"], "30-Oct-2025");
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get(&test_router(), "/api/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

use serde_json::json;
use sustainability_index::{
    ApiRequest, ApiResponse, RawIndicatorSet, Route, ScoringConfig, ScoringService,
    SustainabilityEngine,
};

fn service() -> ScoringService {
    ScoringService::new(SustainabilityEngine::new(ScoringConfig::default()).unwrap())
}

fn call(service: &ScoringService, event: serde_json::Value) -> ApiResponse {
    let request: ApiRequest = serde_json::from_value(event).unwrap();
    service.handle(&request)
}

#[test]
fn test_example_feeds_calculate() {
    let service = service();

    let example = call(&service, json!({"route": "example"}));
    assert_eq!(example.status, 200);

    let calculated = call(&service, json!({"route": "calculate", "body": example.body}));
    assert_eq!(calculated.status, 200);
    assert_eq!(calculated.body["grade"], "C");
    let index = calculated.body["sustainability_index"].as_f64().unwrap();
    assert!((index - 64.49).abs() < 0.01);
    assert!(calculated.body["normalized"]["eqi_normalized"].is_number());
}

#[test]
fn test_indicators_route() {
    let response = call(&service(), json!({"route": "indicators"}));
    assert_eq!(response.status, 200);

    let definitions = response.body.as_array().unwrap();
    assert_eq!(definitions.len(), 16);
    let total_weight: f64 = definitions
        .iter()
        .map(|d| d["weight"].as_f64().unwrap())
        .sum();
    assert!((total_weight - 100.0).abs() < 1e-9);
}

#[test]
fn test_weights_route() {
    let response = call(&service(), json!({"route": "weights"}));
    assert_eq!(response.status, 200);
    assert_eq!(response.body["category_weights"]["environmental"], 40.0);
    assert!(response.body["indicator_weights"]["social"]["crime_rate"].is_number());
}

#[test]
fn test_missing_category_reports_detail() {
    let mut body = serde_json::to_value(RawIndicatorSet::example()).unwrap();
    body.as_object_mut().unwrap().remove("social");

    let response = call(&service(), json!({"route": "calculate", "body": body}));
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body["detail"],
        "Calculation error: Invalid input: social must be an object of indicator values"
    );
    assert_eq!(response.body["issues"][0]["problem"], "category_missing");
}

#[test]
fn test_trend_route() {
    let env = serde_json::to_value(RawIndicatorSet::example().environmental).unwrap();
    let years: Vec<serde_json::Value> = [(2019, 400.0), (2020, 300.0), (2021, 200.0), (2022, 100.0)]
        .into_iter()
        .map(|(year, green)| {
            let mut entry = env.clone();
            entry["year"] = json!(year);
            entry["green_area"] = json!(green * 1000.0);
            entry
        })
        .collect();

    let response = call(&service(), json!({"route": "trend", "body": {"years": years}}));
    assert_eq!(response.status, 200);
    assert_eq!(response.body["green_area_trend"], "decreasing");
    assert_eq!(response.body["temperature_trend"], "stable");
    assert_eq!(response.body["analysis_period"], "2019-2022");
    assert_eq!(response.body["total_years_analyzed"], 4);
}

#[test]
fn test_trend_requires_years() {
    let response = call(&service(), json!({"route": "trend", "body": {}}));
    assert_eq!(response.status, 400);
    assert!(response.body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Time series analysis error: "));
}

#[test]
fn test_unknown_route_is_rejected_at_parse() {
    let parsed = serde_json::from_value::<ApiRequest>(json!({"route": "delete"}));
    assert!(parsed.is_err());
    assert_eq!(
        serde_json::to_value(Route::Calculate).unwrap(),
        json!("calculate")
    );
}

#[tokio::test]
async fn test_service_shared_across_tasks() {
    let service = std::sync::Arc::new(service());
    let body = serde_json::to_value(RawIndicatorSet::example()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let request = ApiRequest::new(Route::Calculate, body.clone());
            tokio::spawn(async move { service.handle(&request) })
        })
        .collect();

    let mut indexes = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status, 200);
        indexes.push(response.body["sustainability_index"].as_f64().unwrap());
    }
    assert!(indexes.windows(2).all(|pair| pair[0] == pair[1]));
}

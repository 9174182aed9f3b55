//! AWS Lambda handler for live estimate previews
//!
//! The deal-submission form posts its raw fields as JSON; the handler returns
//! the estimate, or per-field validation messages so the form can mark the
//! offending inputs and show "preview unavailable".
//!
//! Supports Lambda Function URLs (API Gateway v2 payload format).

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::http::{header, HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use property_insurance::{InsuranceEstimator, RawEstimateInput, ValidationContext};
use serde_json::{json, Value};

/// Status code and JSON body for a preview request
fn preview(estimator: &InsuranceEstimator, body: &str, ctx: &ValidationContext) -> (i64, Value) {
    let raw: RawEstimateInput = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(e) => return (400, json!({ "error": format!("Invalid JSON: {}", e) })),
    };

    match estimator.estimate(&raw, ctx) {
        Ok(output) => match serde_json::to_value(&output) {
            Ok(value) => (200, value),
            Err(e) => (500, json!({ "error": e.to_string() })),
        },
        Err(errors) => (422, json!({ "errors": errors.messages() })),
    }
}

/// CORS headers sent on every response, plus the JSON content type when there is a body
fn headers(with_body: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    if with_body {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    headers
}

fn response(status_code: i64, body: Option<Value>) -> ApiGatewayV2httpResponse {
    ApiGatewayV2httpResponse {
        status_code,
        headers: headers(body.is_some()),
        body: body.map(|b| Body::Text(b.to_string())),
        ..Default::default()
    }
}

fn preflight() -> ApiGatewayV2httpResponse {
    response(204, None)
}

/// Lambda handler function
async fn handler(
    estimator: &InsuranceEstimator,
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_str() == "OPTIONS" {
        return Ok(preflight());
    }

    if request.is_base64_encoded {
        return Ok(response(400, Some(json!({ "error": "binary request bodies are not supported" }))));
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let (status, value) = preview(estimator, body, &ValidationContext::current());
    log::info!("estimate preview answered with status {}", status);
    Ok(response(status, Some(value)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let estimator = InsuranceEstimator::standard();
    let estimator = &estimator;
    run(service_fn(move |event| async move { handler(estimator, event).await })).await
}

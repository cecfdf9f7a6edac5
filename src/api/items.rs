use super::RegistryState;
use crate::error::{GatewayError, Result};
use crate::registry::RegistryItem;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const CLAIM_ACTION: &str = "claim";

// === List Items ===

#[derive(Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<RegistryItem>,
}

pub async fn list_items(State(state): State<Arc<RegistryState>>) -> Result<impl IntoResponse> {
    let items = state.store.list_items()?;

    Ok((StatusCode::OK, Json(ListItemsResponse { items })))
}

// === Claim Item ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    #[serde(default)]
    pub action: String,
    pub row_index: Option<serde_json::Number>,
    pub claimed_by: Option<String>,
}

/// Row numbers arrive as JSON numbers; integral floats such as `2.0` are
/// accepted, fractional ones are not.
fn row_number(value: &serde_json::Number) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
            .map(|n| n as i64)
    })
}

/// The body is parsed by hand rather than through `Json` so it is accepted
/// whatever the content type, and so parse failures use the error envelope.
pub async fn claim_item(
    State(state): State<Arc<RegistryState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::InvalidRequest {
                message: rejection.body_text(),
            }
        }
    })?;

    let request: ClaimRequest =
        serde_json::from_slice(&body).map_err(|e| GatewayError::InvalidRequest {
            message: format!("Invalid request body: {}", e),
        })?;

    if request.action != CLAIM_ACTION {
        return Err(GatewayError::InvalidAction {
            action: request.action,
        });
    }

    let row_index = request.row_index.ok_or_else(|| GatewayError::InvalidRequest {
        message: "Missing required field: rowIndex".to_string(),
    })?;

    let row_index = row_number(&row_index).ok_or_else(|| GatewayError::InvalidRequest {
        message: format!("rowIndex must be an integer, got {}", row_index),
    })?;

    debug!(
        "Claim requested for row {} by {:?}",
        row_index, request.claimed_by
    );

    let outcome = state
        .store
        .claim_item(row_index, request.claimed_by.as_deref())?;

    Ok((StatusCode::OK, Json(outcome)))
}

pub async fn not_found(uri: Uri) -> GatewayError {
    GatewayError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::registry::{Column, RegistryStore};
    use crate::sheet::{CellValue, MemoryWorkbook, Sheet, Workbook};
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SHEET: &str = "Registry";

    fn workbook() -> Arc<MemoryWorkbook> {
        let rows: Vec<Vec<CellValue>> = vec![
            vec![
                "Product Name".into(),
                "Manufacturer".into(),
                "Price".into(),
                "Product URL".into(),
                "Image URL".into(),
                "Claimed".into(),
                "Claimed By".into(),
                "Claimed At".into(),
            ],
            vec![
                "Stand Mixer".into(),
                "Acme".into(),
                "$199.99".into(),
                "https://shop.example/mixer".into(),
                "https://shop.example/mixer.jpg".into(),
                CellValue::Bool(false),
            ],
            vec!["   ".into(), "Nobody".into()],
            vec![
                "Towels".into(),
                "Linenry".into(),
                CellValue::Number(30.0),
                "".into(),
                "".into(),
                "X".into(),
                "Sam".into(),
            ],
        ];

        Arc::new(MemoryWorkbook::new().with_sheet(SHEET, Sheet::from_rows(rows)))
    }

    fn app(workbook: Arc<MemoryWorkbook>) -> Router {
        let store = RegistryStore::new(workbook, SHEET);
        build_router(Arc::new(RegistryState::new(store)), 64 * 1024)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "text/plain;charset=utf-8")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn snapshot(workbook: &MemoryWorkbook) -> Sheet {
        workbook.sheet(SHEET).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_list_items() {
        let (status, body) = send(app(workbook()), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "items": [
                    {
                        "id": 2,
                        "productName": "Stand Mixer",
                        "manufacturer": "Acme",
                        "price": "$199.99",
                        "productUrl": "https://shop.example/mixer",
                        "imageUrl": "https://shop.example/mixer.jpg",
                        "claimed": false,
                        "claimedBy": ""
                    },
                    {
                        "id": 4,
                        "productName": "Towels",
                        "manufacturer": "Linenry",
                        "price": "30",
                        "productUrl": "",
                        "imageUrl": "",
                        "claimed": true,
                        "claimedBy": "Sam"
                    }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_list_header_only() {
        let workbook = Arc::new(MemoryWorkbook::new().with_sheet(
            SHEET,
            Sheet::from_rows(vec![vec!["Product Name".into()]]),
        ));

        let (status, body) = send(app(workbook), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "items": [] }));
    }

    #[tokio::test]
    async fn test_list_missing_sheet() {
        let (status, body) = send(app(Arc::new(MemoryWorkbook::new())), get("/")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Sheet not found: Registry" }));
    }

    #[tokio::test]
    async fn test_claim_item() {
        let workbook = workbook();
        let (status, body) = send(
            app(workbook.clone()),
            post(r#"{"action":"claim","rowIndex":2,"claimedBy":"Alex"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Item claimed successfully" })
        );

        let sheet = snapshot(&workbook);
        assert_eq!(sheet.cell(2, Column::Claimed.number()), &CellValue::Bool(true));
        assert_eq!(sheet.cell(2, Column::ClaimedBy.number()), &CellValue::text("Alex"));
        assert!(!sheet.cell(2, Column::ClaimedAt.number()).is_blank());
    }

    #[tokio::test]
    async fn test_claim_already_claimed() {
        let workbook = workbook();
        let before = snapshot(&workbook);

        let (status, body) = send(
            app(workbook.clone()),
            post(r#"{"action":"claim","rowIndex":4,"claimedBy":"Alex"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Item already claimed" })
        );
        assert_eq!(snapshot(&workbook), before);
    }

    #[tokio::test]
    async fn test_claim_invalid_action() {
        let workbook = workbook();
        let before = snapshot(&workbook);

        let (status, body) = send(
            app(workbook.clone()),
            post(r#"{"action":"unclaim","rowIndex":4}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid action" }));
        assert_eq!(snapshot(&workbook), before);
    }

    #[tokio::test]
    async fn test_claim_invalid_row_index() {
        let workbook = workbook();
        let before = snapshot(&workbook);

        for row_index in [1, 5] {
            let (status, body) = send(
                app(workbook.clone()),
                post(&format!(r#"{{"action":"claim","rowIndex":{}}}"#, row_index)),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Invalid row index" }));
        }

        assert_eq!(snapshot(&workbook), before);
    }

    #[tokio::test]
    async fn test_claim_malformed_body() {
        let workbook = workbook();
        let before = snapshot(&workbook);

        for raw in ["{not json", "", r#"{"action":"claim","rowIndex":"two"}"#] {
            let (status, body) = send(app(workbook.clone()), post(raw)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            let message = body["error"].as_str().unwrap();
            assert!(message.starts_with("Invalid request body"), "{message}");
        }

        assert_eq!(snapshot(&workbook), before);
    }

    #[tokio::test]
    async fn test_claim_missing_row_index() {
        let (status, body) = send(app(workbook()), post(r#"{"action":"claim"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required field: rowIndex" }));
    }

    #[tokio::test]
    async fn test_claim_integral_float_row_index() {
        let workbook = workbook();
        let (status, body) = send(
            app(workbook.clone()),
            post(r#"{"action":"claim","rowIndex":2.0,"claimedBy":"Alex"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            snapshot(&workbook).cell(2, Column::ClaimedBy.number()),
            &CellValue::text("Alex")
        );
    }

    #[tokio::test]
    async fn test_claim_fractional_row_index() {
        let workbook = workbook();
        let before = snapshot(&workbook);

        let (status, body) = send(
            app(workbook.clone()),
            post(r#"{"action":"claim","rowIndex":2.5}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "rowIndex must be an integer, got 2.5" }));
        assert_eq!(snapshot(&workbook), before);
    }

    #[tokio::test]
    async fn test_claim_oversized_body() {
        let workbook = workbook();
        let before = snapshot(&workbook);
        let store = RegistryStore::new(workbook.clone(), SHEET);
        let small_limit = build_router(Arc::new(RegistryState::new(store)), 16);

        let raw = format!(
            r#"{{"action":"claim","rowIndex":2,"claimedBy":"{}"}}"#,
            "A".repeat(128)
        );

        let unsized_request = post(&raw);
        let (status, body) = send(small_limit.clone(), unsized_request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "Request body too large" }));

        let sized_request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-length", raw.len().to_string())
            .body(Body::from(raw.clone()))
            .unwrap();
        let (status, body) = send(small_limit, sized_request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "Request body too large" }));

        assert_eq!(snapshot(&workbook), before);
    }

    #[test]
    fn test_row_number() {
        let parse = |raw: &str| row_number(&serde_json::from_str(raw).unwrap());
        assert_eq!(parse("7"), Some(7));
        assert_eq!(parse("-1"), Some(-1));
        assert_eq!(parse("3.0"), Some(3));
        assert_eq!(parse("3.25"), None);
        assert_eq!(parse("1e300"), None);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(workbook()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["sheet"], "Registry");

        let (_, body) = send(app(Arc::new(MemoryWorkbook::new())), get("/health")).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["sheet_available"], false);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(app(workbook()), get("/items/7")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found: /items/7" }));
    }
}

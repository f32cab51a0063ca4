use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;

use crate::models::reservation::ErrorResponse;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: format!("No endpoint found at {}", uri.path()),
        }),
    )
}

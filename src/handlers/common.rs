use crate::{errors::ServiceError, ApiResponse, PaginatedResponse};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// Result type of create endpoints: `201 Created` with the enveloped record
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ServiceError>;

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Standard no content response
pub fn no_content_response() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// JSON body that callers may leave out. An empty body yields `None`; a body
/// that is present has to deserialize, otherwise the request fails with 400.
#[derive(Debug)]
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        Json::<T>::from_bytes(&bytes)
            .map(|Json(value)| Self(Some(value)))
            .map_err(|rejection| {
                ServiceError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
            })
    }
}

/// Wraps one page of records together with the paging totals
pub fn paginated<T>(items: Vec<T>, total: u64, page: u64, limit: u64) -> PaginatedResponse<T> {
    let limit = limit.max(1);
    PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct DateBody {
        date: Option<chrono::NaiveDate>,
    }

    async fn extract(body: &'static str) -> Result<OptionalJson<DateBody>, ServiceError> {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        OptionalJson::<DateBody>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn empty_body_is_absent() {
        assert!(extract("").await.unwrap().0.is_none());
        assert!(extract("  \n").await.unwrap().0.is_none());
    }

    #[tokio::test]
    async fn well_formed_body_is_parsed() {
        let body = extract(r#"{"date":"2030-05-10"}"#).await.unwrap().0.unwrap();
        assert_eq!(body.date, chrono::NaiveDate::from_ymd_opt(2030, 5, 10));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let err = extract(r#"{"date":"2030-13-45"}"#).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = extract("{not json").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = paginated(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(paginated::<u8>(vec![], 0, 1, 20).total_pages, 0);
    }

    #[test]
    fn created_uses_201() {
        let (status, Json(body)) = created_response("room");
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
    }
}

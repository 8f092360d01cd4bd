//! The JSON envelope every endpoint answers with, and the mapping from
//! errors to that envelope.

use crate::config::Config;
use crate::error_code::{BusinessError, CommonErrorCode, ErrorCode};
use crate::page::{PageData, PageInfo};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use tracing::{error, warn};

/// Code of a successful response.
pub const OK_CODE: u64 = 200;

/// Extension key holding the error chain outside production.
pub const EXCEPTION_KEY: &str = "exception";

/// Response envelope: `{ "code", "message", "data", "ext" }`.
///
/// `code` is 200 on success or the error code on failure. `ext` carries
/// extra fields contributed by [`ErrorExtension`]s and is left out of the
/// JSON when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u64,
    pub message: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<Map<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: OK_CODE,
            message: String::new(),
            data,
            ext: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == OK_CODE
    }

    pub fn with_ext(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ext
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

impl ApiResponse<Value> {
    /// Failure envelope with a null `data`.
    pub fn error(message: impl Into<String>, code: u64) -> Self {
        Self {
            code,
            message: message.into(),
            data: Value::Null,
            ext: None,
        }
    }

    pub fn from_error_code(error_code: &dyn ErrorCode) -> Self {
        Self::error(error_code.default_message(), error_code.code())
    }
}

impl<C> ApiResponse<PageData<C>> {
    /// Successful page of items.
    pub fn page(items: Vec<C>, page: u64, size: u64, total: Option<u64>) -> Self {
        Self::ok(PageData {
            pager: PageInfo::new(Some(page), Some(size), total),
            items,
        })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // Errors are reported in the body; the transport status stays 200.
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Contributes extra fields to the `ext` of error responses.
pub trait ErrorExtension: Send + Sync {
    fn extend(&self, error: &(dyn StdError + 'static), ext: &mut Map<String, Value>);
}

/// Converts errors into envelopes.
///
/// Business errors keep their code and message. Anything else becomes the
/// generic network error (`E0000000500`). Outside production the error
/// chain is exposed under `ext.exception`.
pub struct ErrorResponder {
    extensions: Vec<Box<dyn ErrorExtension>>,
    expose_details: bool,
}

impl Default for ErrorResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorResponder {
    /// Responder that never exposes error details.
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
            expose_details: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new().expose_details(!config.is_prod())
    }

    pub fn expose_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }

    pub fn with_extension(mut self, extension: impl ErrorExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn business(&self, err: &BusinessError) -> ApiResponse<Value> {
        // Unauthorized is routine; answer plainly without extensions.
        if err.is(&CommonErrorCode::E0000000401) {
            warn!(code = err.code(), "{}", err.message());
            return ApiResponse::error(err.message(), err.code());
        }

        warn!(code = err.code(), error = %error_chain(err), "Business error");
        self.envelope(ApiResponse::error(err.message(), err.code()), err)
    }

    pub fn unexpected(&self, err: &anyhow::Error) -> ApiResponse<Value> {
        if let Some(business) = err.downcast_ref::<BusinessError>() {
            return self.business(business);
        }

        error!(error = ?err, "Unhandled error");
        let error: &(dyn StdError + 'static) = &**err;
        self.envelope(
            ApiResponse::from_error_code(&CommonErrorCode::E0000000500),
            error,
        )
    }

    fn envelope(
        &self,
        response: ApiResponse<Value>,
        error: &(dyn StdError + 'static),
    ) -> ApiResponse<Value> {
        let mut ext = Map::new();
        for extension in &self.extensions {
            extension.extend(error, &mut ext);
        }
        if self.expose_details {
            ext.insert(EXCEPTION_KEY.to_string(), Value::String(error_chain(error)));
        }

        ApiResponse {
            ext: (!ext.is_empty()).then_some(ext),
            ..response
        }
    }
}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        ErrorResponder::new().business(&self).into_response()
    }
}

/// Render an error and its causes, one per line.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str("\ncaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_json(response: Response) -> Value {
        let bytes = tokio_test::block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct TraceId;

    impl ErrorExtension for TraceId {
        fn extend(&self, _error: &(dyn StdError + 'static), ext: &mut Map<String, Value>) {
            ext.insert("traceId".to_string(), json!("abc123"));
        }
    }

    // ==================== Envelope Tests ====================

    #[test]
    fn test_ok_envelope_omits_ext() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, json!({"code": 200, "message": "", "data": [1, 2]}));
    }

    #[test]
    fn test_is_ok() {
        assert!(ApiResponse::ok(()).is_ok());
        assert!(!ApiResponse::error("nope", 404).is_ok());
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let json = serde_json::to_value(ApiResponse::from_error_code(&CommonErrorCode::E0000000404))
            .unwrap();
        assert_eq!(json, json!({"code": 404, "message": "Not Found", "data": null}));
    }

    #[test]
    fn test_page_envelope() {
        let response = ApiResponse::page(vec!["a", "b"], 2, 2, Some(7));
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["data"]["pager"], json!({"page": 2, "size": 2, "total": 7}));
        assert_eq!(json["data"]["items"], json!(["a", "b"]));
    }

    #[test]
    fn test_into_response_is_http_ok() {
        let response = ApiResponse::error("boom", 700_001).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response)["code"], 700_001);
    }

    // ==================== ErrorResponder Tests ====================

    #[test]
    fn test_business_error_keeps_code() {
        let err = CommonErrorCode::E0000040404.exception();
        let response = ErrorResponder::new().business(&err);
        assert_eq!(response.code, 40_404);
        assert_eq!(response.message, "Data does not exist");
        assert!(response.ext.is_none());
    }

    #[test]
    fn test_details_exposed_outside_prod() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "timeout");
        let err = BusinessError::with_code("upstream failed", 503).with_source(io);
        let response = ErrorResponder::new().expose_details(true).business(&err);

        let exception = response.ext.unwrap()[EXCEPTION_KEY].as_str().unwrap().to_string();
        assert!(exception.contains("upstream failed"));
        assert!(exception.contains("caused by: timeout"));
    }

    #[test]
    fn test_extensions_applied() {
        let responder = ErrorResponder::new().with_extension(TraceId);
        let response = responder.business(&BusinessError::new("bad"));
        assert_eq!(response.ext.unwrap()["traceId"], "abc123");
    }

    #[test]
    fn test_unauthorized_skips_extensions() {
        let responder = ErrorResponder::new().with_extension(TraceId).expose_details(true);
        let response = responder.business(&CommonErrorCode::E0000000401.exception());
        assert_eq!(response.code, 401);
        assert!(response.ext.is_none());
    }

    #[test]
    fn test_unexpected_maps_to_network_error() {
        let response = ErrorResponder::new().unexpected(&anyhow::anyhow!("db down"));
        assert_eq!(response.code, 500);
        assert_eq!(response.message, "Network error, please try again later");
        assert!(response.ext.is_none());
    }

    #[test]
    fn test_unexpected_unwraps_business_error() {
        let err = anyhow::Error::new(BusinessError::with_code("gone", 40_404));
        let response = ErrorResponder::new().unexpected(&err);
        assert_eq!(response.code, 40_404);
        assert_eq!(response.message, "gone");
    }

    #[test]
    fn test_business_error_into_response() {
        let response = BusinessError::new("invalid input").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response),
            json!({"code": 400, "message": "invalid input", "data": null})
        );
    }
}

//! 核心错误处理模块

use std::collections::BTreeMap;
use std::error::Error as StdError;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::ValidationErrors;

/// 字段名 -> 错误信息列表
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    Validation(FieldErrors),
    NotFound(String),
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl CoreError {
    /// 构造 500 错误。开发环境返回完整错误链，否则只返回通用提示。
    pub fn internal(generic: &str, err: &(dyn StdError + 'static), expose_details: bool) -> Self {
        if expose_details {
            CoreError::InternalServerError(error_chain(err))
        } else {
            CoreError::InternalServerError(generic.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 把错误及其 source 链拼成一行
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, user_message, errors) = match self {
            CoreError::BadRequest(msg) => ("BAD_REQUEST", msg, None),
            CoreError::Validation(fields) => (
                "VALIDATION_ERROR",
                "One or more validation errors occurred.".to_string(),
                Some(fields),
            ),
            CoreError::NotFound(msg) => ("NOT_FOUND", msg, None),
            CoreError::InternalServerError(msg) => ("INTERNAL_SERVER_ERROR", msg, None),
        };

        let error_response = ErrorResponse {
            error: error_message.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            errors,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(err: ValidationErrors) -> Self {
        let fields = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("The {} field is invalid.", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        CoreError::Validation(fields)
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Inner;

    #[test]
    fn internal_hides_details_outside_development() {
        let err = Outer(Inner);
        match CoreError::internal("An error occurred.", &err, false) {
            CoreError::InternalServerError(msg) => assert_eq!(msg, "An error occurred."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn internal_exposes_error_chain_in_development() {
        let err = Outer(Inner);
        match CoreError::internal("An error occurred.", &err, true) {
            CoreError::InternalServerError(msg) => {
                assert_eq!(msg, "outer failure: connection refused")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn validation_errors_keep_field_messages() {
        let mut errors = ValidationErrors::new();
        let mut price = ValidationError::new("price");
        price.message = Some(Cow::from("Price must be greater than zero."));
        errors.add("price", price);
        errors.add("name", ValidationError::new("length"));

        let CoreError::Validation(fields) = CoreError::from(errors) else {
            panic!("expected validation error");
        };
        assert_eq!(fields["price"], vec!["Price must be greater than zero."]);
        assert_eq!(fields["name"], vec!["The name field is invalid."]);
    }

    #[tokio::test]
    async fn not_found_renders_json_body() {
        let response = CoreError::NotFound("Product with ID 7 not found.".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "Product with ID 7 not found.");
        assert!(body.get("errors").is_none());
    }
}

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Success,
    Warning,
    Danger,
}

/// Body shared by every JSON response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub is_successful: bool,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            is_successful: true,
            message_type: MessageType::Success,
            kind: None,
            message: None,
            data: Some(data),
        }
    }

    /// A non-blocking notice: the call worked, but the caller should look at `message`.
    pub fn warning(message: impl Into<String>, data: T) -> Self {
        Self {
            is_successful: true,
            message_type: MessageType::Warning,
            kind: None,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(kind: &str, message: impl Into<String>) -> Self {
        Self {
            is_successful: false,
            message_type: MessageType::Danger,
            kind: Some(kind.to_string()),
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            is_successful: true,
            message_type: MessageType::Success,
            kind: None,
            message: Some(message.into()),
            data: None,
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::success(data))
}

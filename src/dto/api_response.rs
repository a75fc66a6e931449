use serde::Serialize;

/// Envoltura de las respuestas exitosas: `{ success: true, data, message? }`.
/// Los fallos salen por `AppError` con `{ success: false, error, code }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_omits_error() {
        let body = serde_json::to_value(ApiResponse::success(json!({ "id": 1 }))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": 1 } }));
    }

    #[test]
    fn test_message_is_included_when_present() {
        let body = serde_json::to_value(ApiResponse::success_with_message(json!([]), "Listo")).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [], "message": "Listo" }));
    }
}

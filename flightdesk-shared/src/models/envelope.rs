use serde::{Deserialize, Serialize};

/// The `{page, total_page, total_element, message, data}` wrapper every endpoint answers with.
///
/// Paging fields are omitted for single-object responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_element: Option<u32>,
    pub message: String,
    pub data: T,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            page: None,
            total_page: None,
            total_element: None,
            message: "Success".to_string(),
            data,
        }
    }

    pub fn paged(page: u32, total_page: u32, total_element: u32, data: T) -> Self {
        Self {
            page: Some(page),
            total_page: Some(total_page),
            total_element: Some(total_element),
            message: "Success".to_string(),
            data,
        }
    }
}

/// Body of every 400 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub success: bool,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object_envelope_omits_paging() {
        let json = serde_json::to_value(ResponseEnvelope::success("ok")).unwrap();
        assert!(json.get("page").is_none());
        assert!(json.get("total_page").is_none());
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"], "ok");
    }

    #[test]
    fn test_paged_envelope_field_names() {
        let json = serde_json::to_value(ResponseEnvelope::paged(2, 3, 15, Vec::<u8>::new())).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["total_page"], 3);
        assert_eq!(json["total_element"], 15);
    }
}

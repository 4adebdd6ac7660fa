use serde::{Deserialize, Serialize};

/// Outbound post payload accepted by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PostData {
    /// Fields the remote API requires to be non-blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.body.trim().is_empty() {
            missing.push("body");
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// What a demo call produced: the remote body on success, a message otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResult {
    pub method: Method,
    pub response: String,
    pub succeeded: bool,
}

impl ApiResult {
    pub fn success(method: Method, body: String) -> Self {
        Self {
            method,
            response: body,
            succeeded: true,
        }
    }

    pub fn failure(method: Method, message: String) -> Self {
        Self {
            method,
            response: message,
            succeeded: false,
        }
    }
}

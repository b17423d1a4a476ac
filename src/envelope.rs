//! Response envelope shared by dispatchers.
//!
//! Handler results travel back to the client wrapped in a small JSON
//! document:
//!
//! ```text
//! success  {"brief": "OK", "status": 200, "data": ...}
//! failure  {"brief": "Not Found", "status": 404, "code": "E404", "message": "..."}
//! ```
//!
//! `brief` is always the canonical reason phrase of `status`.

use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

mod key {
    pub const BRIEF: &str = "brief";
    pub const STATUS: &str = "status";
    pub const DATA: &str = "data";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";
}

/// A failure a handler reports to the client.
#[derive(Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct WebError {
    status: StatusCode,
    code: String,
    message: String,
}

impl WebError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status, code: code.into(), message: message.into() }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn code(&self) -> &str { &self.code }
    pub fn message(&self) -> &str { &self.message }
}

/// A handler result or failure, ready to be written out.
#[derive(Debug, Clone)]
pub struct Envelope {
    status: StatusCode,
    headers: HeaderMap,
    error: Option<WebError>,
    body: Value,
}

impl Envelope {
    /// Success without content: `data` is `null`.
    pub fn ok() -> Self {
        Self::success(())
    }

    /// Success carrying `data`.
    ///
    /// A value serde cannot represent as JSON becomes a `500` failure
    /// instead of a success.
    pub fn success<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => {
                let status = StatusCode::OK;
                let mut body = Map::new();
                body.insert(key::BRIEF.to_owned(), brief(status).into());
                body.insert(key::STATUS.to_owned(), status.as_u16().into());
                body.insert(key::DATA.to_owned(), data);
                Self { status, headers: HeaderMap::new(), error: None, body: Value::Object(body) }
            }
            Err(e) => {
                error!("envelope data is not serializable: {e}");
                Self::failure(WebError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E_SERIALIZE",
                    e.to_string(),
                ))
            }
        }
    }

    pub fn failure(error: WebError) -> Self {
        let status = error.status();
        let mut body = Map::new();
        body.insert(key::BRIEF.to_owned(), brief(status).into());
        body.insert(key::STATUS.to_owned(), status.as_u16().into());
        body.insert(key::CODE.to_owned(), error.code().into());
        body.insert(key::MESSAGE.to_owned(), error.message().into());
        Self { status, headers: HeaderMap::new(), error: Some(error), body: Value::Object(body) }
    }

    /// `true` unless built by [`failure`](Self::failure).
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn error(&self) -> Option<&WebError> { self.error.as_ref() }

    /// The whole envelope document.
    pub fn data(&self) -> &Value { &self.body }

    /// The `data` field as `T`. `Ok(None)` when it is missing or `null`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match self.body.get(key::DATA) {
            None | Some(Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data.clone()).map(Some),
        }
    }

    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }

    /// The encoded JSON document.
    pub fn response(&self) -> String {
        self.body.to_string()
    }
}

fn brief(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    #[test]
    fn success_wraps_data() {
        let envelope = Envelope::success(User { id: 7, name: "alice".into() });

        assert!(envelope.is_valid());
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(
            envelope.data(),
            &json!({"brief": "OK", "status": 200, "data": {"id": 7, "name": "alice"}})
        );
        assert_eq!(
            envelope.data_as::<User>().unwrap(),
            Some(User { id: 7, name: "alice".into() })
        );
    }

    #[test]
    fn ok_has_null_data() {
        let envelope = Envelope::ok();
        assert_eq!(envelope.data()["data"], Value::Null);
        assert_eq!(envelope.data_as::<User>().unwrap(), None);
    }

    #[test]
    fn failure_carries_code_and_message() {
        let envelope = Envelope::failure(WebError::new(StatusCode::NOT_FOUND, "E404", "no such user"));

        assert!(!envelope.is_valid());
        assert_eq!(envelope.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            envelope.data(),
            &json!({"brief": "Not Found", "status": 404, "code": "E404", "message": "no such user"})
        );
        assert!(envelope.data().get("data").is_none());
    }

    #[test]
    fn response_is_encoded_json() {
        let mut envelope = Envelope::success(json!([1, 2]));
        envelope.headers_mut().insert("x-request-id", "42".parse().unwrap());

        let decoded: Value = serde_json::from_str(&envelope.response()).unwrap();
        assert_eq!(decoded["data"], json!([1, 2]));
        assert_eq!(envelope.headers()["x-request-id"], "42");
    }
}

//! Domain values passed through the client.
//!
//! # Design
//! The client marshals these values and never validates them. `AuthKey`
//! keeps the login payload exactly as the service returned it, so a failed
//! login can be handed on and fault at request-building time. `Pet` and
//! `PetList` are read-only views for assertions; a response that does not
//! fit them is still returned untouched in `ResponseBody`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Filter value selecting every pet on the service.
pub const ALL_PETS: &str = "";
/// Filter value selecting only the caller's pets.
pub const MY_PETS: &str = "my_pets";

/// Login credentials, sent as `email` and `password` headers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// The payload of a login response, passed back on every later call.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthKey(Value);

impl AuthKey {
    /// Wraps a bare key string as the service would return it.
    pub fn new(key: impl Into<String>) -> Self {
        AuthKey(serde_json::json!({ "key": key.into() }))
    }

    /// Wraps an arbitrary payload without checking it.
    pub fn from_value(payload: Value) -> Self {
        AuthKey(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    /// The value for the `auth_key` request header.
    pub fn key(&self) -> Result<&str, ClientError> {
        self.0
            .as_object()
            .and_then(|map| map.get("key"))
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::MalformedAuthKey {
                found: describe(&self.0),
            })
    }
}

impl From<ResponseBody> for AuthKey {
    fn from(body: ResponseBody) -> Self {
        match body {
            ResponseBody::Json(value) => AuthKey(value),
            ResponseBody::Text(text) => AuthKey(Value::String(text)),
        }
    }
}

impl From<&ResponseBody> for AuthKey {
    fn from(body: &ResponseBody) -> Self {
        AuthKey::from(body.clone())
    }
}

fn describe(value: &Value) -> String {
    const LIMIT: usize = 80;
    let text = match value {
        Value::String(s) => format!("text {s:?}"),
        other => other.to_string(),
    };
    if text.chars().count() > LIMIT {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{cut}...")
    } else {
        text
    }
}

/// Image content for the upload endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PetPhoto {
    /// Content type sent for every photo; the service decides what it accepts.
    pub const CONTENT_TYPE: &'static str = "image/jpeg";

    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Self::CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ClientError::PhotoUnreadable {
            path: PathBuf::from(path),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// A response body: JSON when it parses as JSON, the raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    /// Top-level field of a JSON object body.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(field))
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

/// Status code and body of one service call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as a pet listing, if it has that shape.
    pub fn pets(&self) -> Option<PetList> {
        self.body
            .as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The body as a single pet record, if it has that shape.
    pub fn pet(&self) -> Option<Pet> {
        self.body
            .as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// A pet record as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animal_type: String,
    /// Echoed as given; the service does not coerce it to a number.
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user_id: String,
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pets.iter().map(|pet| pet.id.as_str())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids().any(|pet_id| pet_id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }
}

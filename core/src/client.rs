//! Stateless HTTP request builder and response normalizer for the pet service.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the single `parse_response`,
//! which never looks at the status. The caller (or `PetFriends`) executes the
//! HTTP round-trip in between.
//!
//! Builders that need the auth key resolve it first, so a malformed key fails
//! before anything is sent.

use std::fmt::Display;

use tracing::warn;

use crate::error::ClientError;
use crate::http::{FormPart, HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, AuthKey, PetPhoto, ResponseBody};

/// Synchronous, stateless request builder for the pet service.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("api/key"))
            .with_header("email", email)
            .with_header("password", password)
    }

    pub fn build_get_list_of_pets(&self, auth_key: &AuthKey, filter: &str) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        Ok(HttpRequest::new(HttpMethod::Get, self.url("api/pets"))
            .with_query("filter", filter)
            .with_header("auth_key", key))
    }

    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: impl Display,
        animal_type: impl Display,
        age: impl Display,
        photo: &PetPhoto,
    ) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        let mut parts = pet_parts(name, animal_type, age);
        parts.push(photo_part(photo));
        Ok(HttpRequest::new(HttpMethod::Post, self.url("api/pets"))
            .with_header("auth_key", key)
            .with_body(HttpBody::Multipart(parts)))
    }

    /// Same fields as `build_add_new_pet`, multipart with text parts only.
    pub fn build_add_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: impl Display,
        animal_type: impl Display,
        age: impl Display,
    ) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        Ok(HttpRequest::new(HttpMethod::Post, self.url("api/create_pet_simple"))
            .with_header("auth_key", key)
            .with_body(HttpBody::Multipart(pet_parts(name, animal_type, age))))
    }

    pub fn build_update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: impl Display,
        animal_type: impl Display,
        age: impl Display,
    ) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        Ok(HttpRequest::new(HttpMethod::Put, self.url(&format!("api/pets/{pet_id}")))
            .with_header("auth_key", key)
            .with_body(HttpBody::Form(vec![
                ("name".to_string(), name.to_string()),
                ("animal_type".to_string(), animal_type.to_string()),
                ("age".to_string(), age.to_string()),
            ])))
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        Ok(HttpRequest::new(HttpMethod::Delete, self.url(&format!("api/pets/{pet_id}"))).with_header("auth_key", key))
    }

    pub fn build_set_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &PetPhoto,
    ) -> Result<HttpRequest, ClientError> {
        let key = resolve_key(auth_key)?;
        Ok(HttpRequest::new(HttpMethod::Post, self.url(&format!("api/pets/set_photo/{pet_id}")))
            .with_header("auth_key", key)
            .with_body(HttpBody::Multipart(vec![photo_part(photo)])))
    }

    /// Normalize any response into `(status, body)`. Never fails.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::parse(response.body),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

fn resolve_key(auth_key: &AuthKey) -> Result<&str, ClientError> {
    auth_key.key().inspect_err(|err| warn!(%err, "refusing to build request"))
}

fn pet_parts(name: impl Display, animal_type: impl Display, age: impl Display) -> Vec<FormPart> {
    vec![
        FormPart::text("name", name.to_string()),
        FormPart::text("animal_type", animal_type.to_string()),
        FormPart::text("age", age.to_string()),
    ]
}

fn photo_part(photo: &PetPhoto) -> FormPart {
    FormPart::file("pet_photo", &photo.file_name, &photo.content_type, photo.bytes.clone())
}

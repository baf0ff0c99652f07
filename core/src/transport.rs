//! Blocking execution of `HttpRequest` values and the `PetFriends` facade.
//!
//! # Design
//! `UreqTransport` disables ureq's status-code-as-error behaviour so 4xx/5xx
//! responses come back as data; only failures below HTTP (connect, DNS, IO)
//! become `ClientError::Transport`. Response bodies are read without ureq's
//! default 10 MB cap: listings carry every photo inline as base64.
//! `PetFriends` glues one builder call, one round-trip and `parse_response`
//! together per operation.

use std::path::Path;
use std::time::Duration;

use tracing::debug;
use ureq::unversioned::multipart::{Form, Part};

use crate::client::PetFriendsClient;
use crate::error::ClientError;
use crate::http::{FormPart, HttpBody, HttpMethod, HttpRequest, HttpResponse, PartContent};
use crate::types::{ApiResponse, AuthKey, Credentials, PetPhoto};

/// Executes one request and returns whatever the server answered.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Blocking HTTP/1.1 transport backed by a ureq agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let HttpRequest {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        let mut response = match method {
            HttpMethod::Get => decorate(self.agent.get(&url), &query, &headers).call(),
            HttpMethod::Delete => decorate(self.agent.delete(&url), &query, &headers).call(),
            HttpMethod::Post => send_with_body(decorate(self.agent.post(&url), &query, &headers), body),
            HttpMethod::Put => send_with_body(decorate(self.agent.put(&url), &query, &headers), body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, headers, body })
    }
}

fn decorate<B>(
    mut builder: ureq::RequestBuilder<B>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in query {
        builder = builder.query(name, value);
    }
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<HttpBody>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        None => builder.send_empty(),
        Some(HttpBody::Form(fields)) => {
            builder.send_form(fields.iter().map(|(name, value)| (name.as_str(), value.as_str())))
        }
        Some(HttpBody::Multipart(parts)) => builder.send(multipart_form(&parts)?),
    }
}

fn multipart_form(parts: &[FormPart]) -> Result<Form<'_>, ureq::Error> {
    let mut form = Form::new();
    for part in parts {
        form = match &part.content {
            PartContent::Text(value) => form.text(&part.name, value),
            PartContent::File {
                file_name,
                content_type,
                bytes,
            } => form.part(
                &part.name,
                Part::bytes(bytes).file_name(file_name).mime_str(content_type)?,
            ),
        };
    }
    Ok(form)
}

/// Blocking client for the pet service: one call per operation.
///
/// Every method returns `Ok` with the service's status and body, whatever the
/// status is. `Err` means the request could not be built or sent.
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_get_api_key(email, password))
    }

    /// Convenience over `get_api_key` for a credential pair.
    pub fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ClientError> {
        self.get_api_key(&credentials.email, &credentials.password)
    }

    pub fn get_list_of_pets(&self, auth_key: &AuthKey, filter: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_get_list_of_pets(auth_key, filter)?)
    }

    /// Reads the photo from `photo_path` and creates a pet with it.
    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: impl std::fmt::Display,
        animal_type: impl std::fmt::Display,
        age: impl std::fmt::Display,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let photo = PetPhoto::from_path(photo_path)?;
        self.send(self.client.build_add_new_pet(auth_key, name, animal_type, age, &photo)?)
    }

    pub fn add_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: impl std::fmt::Display,
        animal_type: impl std::fmt::Display,
        age: impl std::fmt::Display,
    ) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_add_pet_without_photo(auth_key, name, animal_type, age)?)
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: impl std::fmt::Display,
        animal_type: impl std::fmt::Display,
        age: impl std::fmt::Display,
    ) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_update_pet_info(auth_key, pet_id, name, animal_type, age)?)
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id)?)
    }

    pub fn set_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let photo = PetPhoto::from_path(photo_path)?;
        self.send(self.client.build_set_pet_photo(auth_key, pet_id, &photo)?)
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.execute(request)?;
        Ok(self.client.parse_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseBody;
    use std::cell::RefCell;

    /// Records requests and replays one canned response.
    struct Canned {
        seen: RefCell<Vec<HttpRequest>>,
        status: u16,
        body: &'static str,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                status,
                body,
            }
        }
    }

    impl Transport for &Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            self.seen.borrow_mut().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    #[test]
    fn forbidden_login_is_data_not_error() {
        let canned = Canned::new(403, "<html>Forbidden</html>");
        let pf = PetFriends::with_transport("http://svc", &canned);
        let response = pf.get_api_key("nobody@example.com", "wrong").unwrap();
        assert_eq!(response.status, 403);
        assert!(!response.body.is_json());
        assert_eq!(canned.seen.borrow().len(), 1);
    }

    #[test]
    fn server_error_is_data_not_error() {
        let canned = Canned::new(500, "Internal Server Error");
        let pf = PetFriends::with_transport("http://svc", &canned);
        let response = pf.delete_pet(&AuthKey::new("k"), "p1").unwrap();
        assert_eq!(response.status, 500);
    }

    #[test]
    fn malformed_key_never_reaches_the_transport() {
        let canned = Canned::new(200, r#"{"pets":[]}"#);
        let pf = PetFriends::with_transport("http://svc", &canned);
        let key = AuthKey::from(ResponseBody::Text("Forbidden".to_string()));
        let err = pf.get_list_of_pets(&key, "").unwrap_err();
        assert!(matches!(err, ClientError::MalformedAuthKey { .. }));
        assert!(canned.seen.borrow().is_empty());
    }

    #[test]
    fn missing_photo_never_reaches_the_transport() {
        let canned = Canned::new(200, "{}");
        let pf = PetFriends::with_transport("http://svc", &canned);
        let err = pf
            .add_new_pet(&AuthKey::new("k"), "n", "t", 1, "/no/such/photo.jpg")
            .unwrap_err();
        assert!(matches!(err, ClientError::PhotoUnreadable { .. }));
        assert!(canned.seen.borrow().is_empty());
    }

    #[test]
    fn login_uses_credential_pair() {
        let canned = Canned::new(200, r#"{"key":"abc"}"#);
        let pf = PetFriends::with_transport("http://svc/", &canned);
        let response = pf.login(&Credentials::new("a@b.c", "pw")).unwrap();
        assert_eq!(AuthKey::from(response.body).key().unwrap(), "abc");

        let seen = canned.seen.borrow();
        assert_eq!(seen[0].url, "http://svc/api/key");
        assert_eq!(seen[0].header("email"), Some("a@b.c"));
        assert_eq!(seen[0].header("password"), Some("pw"));
    }

    #[test]
    fn multipart_form_takes_text_and_file_parts() {
        let parts = vec![
            FormPart::text("name", "Карамба"),
            FormPart::file("pet_photo", "cat.jpg", "image/jpeg", vec![0xFF, 0xD8]),
        ];
        let form = multipart_form(&parts).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn multipart_form_rejects_unparseable_content_type() {
        let parts = vec![FormPart::file("pet_photo", "cat.jpg", "not a mime", vec![1])];
        assert!(multipart_form(&parts).is_err());
    }
}

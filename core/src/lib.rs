//! Blocking API client for the PetFriends pet-management service.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values and normalizes
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). `PetFriends` pairs it with a `Transport` and exposes the
//! service operations as single blocking calls returning `ApiResponse`.
//!
//! # Design
//! - The client is stateless; it holds only `base_url`.
//! - HTTP statuses are data. `ClientError` is reserved for local faults:
//!   a malformed auth key, an unreadable photo, a broken connection.
//! - Nothing is validated on the way out. Empty names, negative ages and
//!   PDF "photos" reach the service exactly as given.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::PetFriendsClient;
pub use config::Settings;
pub use error::ClientError;
pub use http::{FormPart, HttpBody, HttpMethod, HttpRequest, HttpResponse, PartContent};
pub use transport::{PetFriends, Transport, UreqTransport};
pub use types::{ApiResponse, AuthKey, Credentials, Pet, PetList, PetPhoto, ResponseBody, ALL_PETS, MY_PETS};

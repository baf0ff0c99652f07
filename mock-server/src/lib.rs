//! In-memory stand-in for the PetFriends REST service.
//!
//! Reproduces the service's observed behaviour, defects included: pets with
//! an empty name, type or age are accepted, any file is accepted as a photo,
//! and numeric names or negative ages go through on update.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

mod error;

pub use error::{ServiceError, FORBIDDEN_PAGE};

pub const DEMO_EMAIL: &str = "tester@petfriends.test";
pub const DEMO_PASSWORD: &str = "qwerty-123";

const NEIGHBOUR_EMAIL: &str = "neighbour@petfriends.test";
const NEIGHBOUR_PASSWORD: &str = "neighbour-pass";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub created_at: String,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct PetForm {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub key: String,
    pub user_id: String,
}

impl Account {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            key: Uuid::new_v4().simple().to_string(),
            user_id: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Accounts the service knows and pets present before the first request.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub accounts: Vec<Account>,
    pub pets: Vec<Pet>,
}

impl Default for MockConfig {
    /// The demo account with no pets, plus a neighbour owning one pet so the
    /// full listing is never empty.
    fn default() -> Self {
        let neighbour = Account::new(NEIGHBOUR_EMAIL, NEIGHBOUR_PASSWORD);
        let pet = new_pet(&neighbour, "Мурка".to_string(), "кошка".to_string(), "4".to_string());
        Self {
            accounts: vec![Account::new(DEMO_EMAIL, DEMO_PASSWORD), neighbour],
            pets: vec![pet],
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<Account>,
    /// Oldest first; listings are served newest first.
    pets: Vec<Pet>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        accounts: config.accounts,
        pets: config.pets,
    }));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/{id}", axum::routing::put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{id}", post(set_pet_photo))
        .layer(DefaultBodyLimit::disable())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<Account, ServiceError> {
    let key = header(headers, "auth_key").ok_or(ServiceError::Forbidden)?;
    let store = db.read().await;
    store
        .accounts
        .iter()
        .find(|account| account.key == key)
        .cloned()
        .ok_or(ServiceError::Forbidden)
}

fn new_pet(owner: &Account, name: String, animal_type: String, age: String) -> Pet {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default();
    Pet {
        id: Uuid::new_v4().to_string(),
        name,
        animal_type,
        age,
        pet_photo: String::new(),
        created_at: format!("{created_at:.6}"),
        user_id: owner.user_id.clone(),
    }
}

fn photo_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

struct Upload {
    fields: Vec<(String, String)>,
    photo: Option<String>,
}

impl Upload {
    fn field(&self, name: &str) -> Result<String, ServiceError> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ServiceError::BadRequest(format!("missing form field '{name}'")))
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServiceError> {
    let mut upload = Upload {
        fields: Vec::new(),
        photo: None,
    };
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            upload.photo = Some(photo_data_uri(&content_type, &bytes));
        } else {
            let value = field.text().await?;
            upload.fields.push((name, value));
        }
    }
    Ok(upload)
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, ServiceError> {
    let email = header(&headers, "email").unwrap_or_default();
    let password = header(&headers, "password").unwrap_or_default();
    let store = db.read().await;
    store
        .accounts
        .iter()
        .find(|account| account.email == email && account.password == password)
        .map(|account| Json(json!({ "key": account.key })))
        .ok_or(ServiceError::Forbidden)
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let store = db.read().await;
    let pets: Vec<&Pet> = match query.filter.as_str() {
        "" => store.pets.iter().rev().collect(),
        "my_pets" => store
            .pets
            .iter()
            .rev()
            .filter(|pet| pet.user_id == account.user_id)
            .collect(),
        _ => return Err(ServiceError::BadRequest("Filter value is incorrect".to_string())),
    };
    Ok(Json(json!({ "pets": pets })))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let upload = read_upload(multipart).await?;
    let mut pet = new_pet(
        &account,
        upload.field("name")?,
        upload.field("animal_type")?,
        upload.field("age")?,
    );
    pet.pet_photo = upload
        .photo
        .ok_or_else(|| ServiceError::BadRequest("missing file 'pet_photo'".to_string()))?;

    info!(pet_id = %pet.id, "pet created with photo");
    db.write().await.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let upload = read_upload(multipart).await?;
    let pet = new_pet(
        &account,
        upload.field("name")?,
        upload.field("animal_type")?,
        upload.field("age")?,
    );

    info!(pet_id = %pet.id, "pet created");
    db.write().await.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(input): Form<PetForm>,
) -> Result<Json<Pet>, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let mut store = db.write().await;
    let pet = owned_pet(&mut store, &account, &id)?;
    pet.name = input.name;
    pet.animal_type = input.animal_type;
    pet.age = input.age;

    info!(pet_id = %id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let mut store = db.write().await;
    let before = store.pets.len();
    store
        .pets
        .retain(|pet| !(pet.id == id && pet.user_id == account.user_id));

    info!(pet_id = %id, removed = before - store.pets.len(), "pet delete");
    Ok(StatusCode::OK)
}

async fn set_pet_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, ServiceError> {
    let account = authorize(&db, &headers).await?;
    let upload = read_upload(multipart).await?;
    let photo = upload
        .photo
        .ok_or_else(|| ServiceError::BadRequest("missing file 'pet_photo'".to_string()))?;

    let mut store = db.write().await;
    let pet = owned_pet(&mut store, &account, &id)?;
    pet.pet_photo = photo;

    info!(pet_id = %id, "pet photo set");
    Ok(Json(pet.clone()))
}

fn owned_pet<'a>(store: &'a mut Store, account: &Account, id: &str) -> Result<&'a mut Pet, ServiceError> {
    store
        .pets
        .iter_mut()
        .find(|pet| pet.id == id && pet.user_id == account.user_id)
        .ok_or_else(|| ServiceError::BadRequest(format!("pet '{id}' not found")))
}

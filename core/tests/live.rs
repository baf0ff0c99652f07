//! Checks against the real service. Ignored by default; run with
//! `PETFRIENDS_VALID_EMAIL` / `PETFRIENDS_VALID_PASSWORD` set (or a `.env`)
//! and `cargo test -- --ignored`.

use petfriends_core::{AuthKey, ClientError, PetFriends, Settings, ALL_PETS, MY_PETS};

fn client() -> (PetFriends, &'static Settings) {
    let settings = Settings::global().expect("live settings");
    (PetFriends::new(&settings.base_url), settings)
}

#[test]
#[ignore = "talks to the real service"]
fn live_valid_login_returns_key() {
    let (pf, settings) = client();
    let result = pf.login(&settings.valid).unwrap();
    assert_eq!(result.status, 200);
    assert!(result.body.has_field("key"));
}

#[test]
#[ignore = "talks to the real service"]
fn live_invalid_login_is_403() {
    let (pf, settings) = client();
    let result = pf.login(&settings.invalid).unwrap();
    assert_eq!(result.status, 403);

    let err = pf.get_list_of_pets(&AuthKey::from(result.body), ALL_PETS).unwrap_err();
    assert!(matches!(err, ClientError::MalformedAuthKey { .. }));
}

#[test]
#[ignore = "talks to the real service"]
fn live_listings() {
    let (pf, settings) = client();
    let key = AuthKey::from(pf.login(&settings.valid).unwrap().body);

    let all = pf.get_list_of_pets(&key, ALL_PETS).unwrap();
    assert_eq!(all.status, 200);
    assert!(!all.pets().unwrap().pets.is_empty());

    let mine = pf.get_list_of_pets(&key, MY_PETS).unwrap();
    assert_eq!(mine.status, 200);
}

#[test]
#[ignore = "talks to the real service"]
fn live_add_update_delete() {
    let (pf, settings) = client();
    let key = AuthKey::from(pf.login(&settings.valid).unwrap().body);

    let created = pf.add_pet_without_photo(&key, "Дымок", "котёнок", 0).unwrap();
    assert_eq!(created.status, 200);
    let id = created.pet().unwrap().id;

    let updated = pf.update_pet_info(&key, &id, "Карамба", "кошка", 9).unwrap();
    assert_eq!(updated.status, 200);
    assert_eq!(updated.pet().unwrap().name, "Карамба");

    let deleted = pf.delete_pet(&key, &id).unwrap();
    assert_eq!(deleted.status, 200);

    let mine = pf.get_list_of_pets(&key, MY_PETS).unwrap().pets().unwrap();
    assert!(!mine.contains_id(&id));
}

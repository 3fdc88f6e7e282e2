use pets_core::contract::COLUMN_WEIGHT;
use pets_core::db::open_db_in_memory;
use pets_core::{
    FieldMap, GatewayError, Gender, PetForm, PetGateway, PetService, SaveOutcome, ServiceError,
    ValidationError,
};

fn form(name: &str, breed: &str, gender: Gender, weight: &str) -> PetForm {
    PetForm {
        name: name.to_string(),
        breed: breed.to_string(),
        gender,
        weight: weight.to_string(),
    }
}

#[test]
fn dummy_pet_shows_up_in_catalog() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));

    let id = service.insert_dummy_pet().unwrap().unwrap();
    let catalog = service.catalog().unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].id, id);
    assert_eq!(catalog[0].name, "Toto");
    assert_eq!(catalog[0].display_breed(), "Terrier");

    let pet = service.load_pet(id).unwrap().unwrap();
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 7);
}

#[test]
fn blank_form_is_skipped_without_touching_storage() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));

    let outcome = service
        .save_pet(None, &form(" ", "", Gender::Unknown, "  "))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Skipped);
    assert!(service.catalog().unwrap().is_empty());
}

#[test]
fn save_inserts_then_updates() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));

    let outcome = service
        .save_pet(None, &form(" Bella ", "", Gender::Female, ""))
        .unwrap();
    let SaveOutcome::Inserted(id) = outcome else {
        panic!("expected insert, got {outcome:?}");
    };

    let pet = service.load_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Bella");
    assert_eq!(pet.breed.as_deref(), Some(""));
    assert_eq!(pet.weight, 0);
    assert_eq!(service.catalog().unwrap()[0].display_breed(), "Unknown breed");

    let outcome = service
        .save_pet(Some(id), &form("Bella", "Collie", Gender::Female, "12"))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Updated);
    let pet = service.load_pet(id).unwrap().unwrap();
    assert_eq!(pet.breed.as_deref(), Some("Collie"));
    assert_eq!(pet.weight, 12);
}

#[test]
fn saving_over_missing_pet_reports_failure() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));

    let outcome = service
        .save_pet(Some(404), &form("Ghost", "", Gender::Unknown, ""))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Failed);
}

#[test]
fn bad_weight_input_is_reported() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));

    let err = service
        .save_pet(None, &form("Rex", "", Gender::Male, "12kg"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidWeightInput(_)));

    let err = service
        .save_pet(None, &form("Rex", "", Gender::Male, "-4"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Gateway(GatewayError::Validation(ValidationError::InvalidWeight))
    ));
    assert!(service.catalog().unwrap().is_empty());
}

#[test]
fn edit_and_delete_flows() {
    let session = open_db_in_memory().unwrap();
    let service = PetService::new(PetGateway::new(&session));
    let first = service.insert_dummy_pet().unwrap().unwrap();
    let second = service.insert_dummy_pet().unwrap().unwrap();

    let changes = FieldMap::new().with(COLUMN_WEIGHT, 9_i64);
    assert_eq!(service.edit_pet(first, &changes).unwrap(), 1);
    assert_eq!(service.load_pet(first).unwrap().unwrap().weight, 9);
    assert_eq!(service.load_pet(second).unwrap().unwrap().weight, 7);

    assert_eq!(service.delete_pet(first).unwrap(), 1);
    assert!(service.load_pet(first).unwrap().is_none());

    assert_eq!(service.delete_all_pets().unwrap(), 1);
    assert!(service.catalog().unwrap().is_empty());
}

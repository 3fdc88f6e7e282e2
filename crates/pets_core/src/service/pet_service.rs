//! Pet catalog use-case service.
//!
//! # Responsibility
//! - Provide catalog/editor entry points for presentation callers.
//! - Turn raw form input into field-maps and gateway calls.
//!
//! # Invariants
//! - Service APIs never bypass gateway validation.
//! - The service stays storage-agnostic; it only speaks addresses.

use crate::contract::{
    pet_uri, ALL_COLUMNS, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT,
    CONTENT_URI,
};
use crate::gateway::{GatewayError, ListQuery, RecordGateway};
use crate::model::fields::FieldMap;
use crate::model::pet::{Gender, Pet, PetDecodeError, PetDraft, PetId};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Label shown for pets without a breed.
pub const UNKNOWN_BREED_LABEL: &str = "Unknown breed";

const CATALOG_COLUMNS: &[&str] = &[COLUMN_ID, COLUMN_NAME, COLUMN_BREED];

/// Service error for catalog/editor use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Weight text is neither blank nor a non-negative integer.
    InvalidWeightInput(String),
    Gateway(GatewayError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeightInput(input) => write!(f, "weight must be a whole number, got `{input}`"),
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWeightInput(_) => None,
            Self::Gateway(err) => Some(err),
        }
    }
}

impl From<GatewayError> for ServiceError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<PetDecodeError> for ServiceError {
    fn from(value: PetDecodeError) -> Self {
        Self::Gateway(GatewayError::InvalidData(value))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Catalog list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetSummary {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
}

impl PetSummary {
    /// Breed for display, falling back to [`UNKNOWN_BREED_LABEL`].
    pub fn display_breed(&self) -> &str {
        match self.breed.as_deref() {
            Some(breed) if !breed.is_empty() => breed,
            _ => UNKNOWN_BREED_LABEL,
        }
    }
}

/// Raw editor input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub breed: String,
    pub gender: Gender,
    pub weight: String,
}

impl PetForm {
    /// True when nothing was entered and gender is still unknown.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.breed.trim().is_empty()
            && self.gender == Gender::Unknown
            && self.weight.trim().is_empty()
    }

    /// Converts trimmed input to a field-map; blank weight becomes 0.
    pub fn to_field_map(&self) -> ServiceResult<FieldMap> {
        let weight_text = self.weight.trim();
        let weight = if weight_text.is_empty() {
            0
        } else {
            weight_text
                .parse::<i64>()
                .map_err(|_| ServiceError::InvalidWeightInput(weight_text.to_string()))?
        };

        Ok(FieldMap::new()
            .with(COLUMN_NAME, self.name.trim())
            .with(COLUMN_BREED, self.breed.trim())
            .with(COLUMN_GENDER, self.gender.code())
            .with(COLUMN_WEIGHT, weight))
    }
}

/// Result of an editor save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Blank form; nothing was written.
    Skipped,
    Inserted(PetId),
    Updated,
    /// Storage produced no id, or no row changed.
    Failed,
}

/// Use-case wrapper over a record gateway.
pub struct PetService<G: RecordGateway> {
    gateway: G,
}

impl<G: RecordGateway> PetService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Lists every pet as id/name/breed, in id order.
    pub fn catalog(&self) -> ServiceResult<Vec<PetSummary>> {
        let query = ListQuery {
            sort_order: Some(format!("{COLUMN_ID} ASC")),
            ..ListQuery::with_projection(CATALOG_COLUMNS)
        };
        let rows = self.gateway.list(CONTENT_URI, &query)?;

        let mut pets = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let id = row
                .get_i64(COLUMN_ID)
                .ok_or(PetDecodeError::MissingColumn(COLUMN_ID))?;
            let name = row
                .get_string(COLUMN_NAME)
                .ok_or(PetDecodeError::MissingColumn(COLUMN_NAME))?;
            pets.push(PetSummary {
                id,
                name,
                breed: row.get_string(COLUMN_BREED),
            });
        }
        Ok(pets)
    }

    /// Loads one pet by id; `None` when no such row exists.
    pub fn load_pet(&self, id: PetId) -> ServiceResult<Option<Pet>> {
        let rows = self
            .gateway
            .list(&pet_uri(id), &ListQuery::with_projection(ALL_COLUMNS))?;
        match rows.first() {
            Some(row) => Ok(Some(Pet::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Inserts a typed draft.
    pub fn add_pet(&self, draft: &PetDraft) -> ServiceResult<Option<PetId>> {
        Ok(self.gateway.insert(CONTENT_URI, &draft.to_field_map())?)
    }

    /// Applies a partial update to one pet.
    pub fn edit_pet(&self, id: PetId, changes: &FieldMap) -> ServiceResult<usize> {
        Ok(self.gateway.update(&pet_uri(id), changes, None)?)
    }

    /// Saves editor input: insert when `target` is `None`, update otherwise.
    pub fn save_pet(&self, target: Option<PetId>, form: &PetForm) -> ServiceResult<SaveOutcome> {
        if form.is_blank() {
            info!("event=pet_save module=service status=skipped reason=blank_form");
            return Ok(SaveOutcome::Skipped);
        }
        let values = form.to_field_map()?;

        let outcome = match target {
            None => match self.gateway.insert(CONTENT_URI, &values)? {
                Some(id) => SaveOutcome::Inserted(id),
                None => SaveOutcome::Failed,
            },
            Some(id) => match self.gateway.update(&pet_uri(id), &values, None)? {
                0 => SaveOutcome::Failed,
                _ => SaveOutcome::Updated,
            },
        };
        info!("event=pet_save module=service status=ok outcome={outcome:?}");
        Ok(outcome)
    }

    /// Inserts the sample pet (Toto, Terrier, male, 7).
    pub fn insert_dummy_pet(&self) -> ServiceResult<Option<PetId>> {
        let draft = PetDraft {
            name: "Toto".to_string(),
            breed: Some("Terrier".to_string()),
            gender: Gender::Male,
            weight: Some(7),
        };
        self.add_pet(&draft)
    }

    pub fn delete_pet(&self, id: PetId) -> ServiceResult<usize> {
        Ok(self.gateway.delete(&pet_uri(id), None)?)
    }

    pub fn delete_all_pets(&self) -> ServiceResult<usize> {
        let deleted = self.gateway.delete(CONTENT_URI, None)?;
        info!("event=pet_delete_all module=service status=ok deleted={deleted}");
        Ok(deleted)
    }
}

//! Pet domain model and field validation.
//!
//! # Responsibility
//! - Define the typed pet record and gender enum.
//! - Own the field rules applied to every insert/update field-map.
//!
//! # Invariants
//! - Stored pets always have a non-null name and a valid gender code.
//! - Stored weight is never negative.
//! - Validation order is fixed: name, gender, weight. The first violated
//!   rule is the one reported.

use crate::contract::{
    is_valid_gender, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT,
    GENDER_FEMALE, GENDER_MALE, GENDER_UNKNOWN,
};
use crate::model::fields::{FieldMap, FieldValue};
use crate::model::row::RowView;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row id.
pub type PetId = i64;

/// Gender of a pet, stored as a small integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parses `unknown|male|female` (case-insensitive) or a numeric code.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Some(Self::Unknown),
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            other => other.parse().ok().and_then(Self::from_code),
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully materialized pet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

impl Pet {
    /// Decodes a row that carries the full projection.
    ///
    /// Rejects persisted state that breaks the record invariants instead of
    /// masking it.
    pub fn from_row(row: &RowView<'_>) -> Result<Self, PetDecodeError> {
        let id = row
            .get_i64(COLUMN_ID)
            .ok_or(PetDecodeError::MissingColumn(COLUMN_ID))?;
        let name = row
            .get_string(COLUMN_NAME)
            .ok_or(PetDecodeError::MissingColumn(COLUMN_NAME))?;
        let breed = match row.get(COLUMN_BREED) {
            Some(value) => value.as_string(),
            None => return Err(PetDecodeError::MissingColumn(COLUMN_BREED)),
        };
        let gender_code = row
            .get_i64(COLUMN_GENDER)
            .ok_or(PetDecodeError::MissingColumn(COLUMN_GENDER))?;
        let gender =
            Gender::from_code(gender_code).ok_or(PetDecodeError::InvalidGender(gender_code))?;
        let weight = row
            .get_i64(COLUMN_WEIGHT)
            .ok_or(PetDecodeError::MissingColumn(COLUMN_WEIGHT))?;
        if weight < 0 {
            return Err(PetDecodeError::InvalidWeight(weight));
        }

        Ok(Self {
            id,
            name,
            breed,
            gender,
            weight,
        })
    }
}

/// Insert/update input built from typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetDraft {
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    /// `None` leaves the column to its storage default on insert.
    pub weight: Option<i64>,
}

impl PetDraft {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender,
            ..Self::default()
        }
    }

    pub fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields
            .put(COLUMN_NAME, self.name.as_str())
            .put(COLUMN_BREED, self.breed.clone())
            .put(COLUMN_GENDER, self.gender.code());
        if let Some(weight) = self.weight {
            fields.put(COLUMN_WEIGHT, weight);
        }
        fields
    }
}

/// Field rule violated by an insert/update field-map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    InvalidGender,
    InvalidWeight,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::InvalidGender => write!(f, "invalid gender"),
            Self::InvalidWeight => write!(f, "invalid weight"),
        }
    }
}

impl Error for ValidationError {}

/// Row could not be decoded into a [`Pet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetDecodeError {
    MissingColumn(&'static str),
    InvalidGender(i64),
    InvalidWeight(i64),
}

impl Display for PetDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(column) => write!(f, "missing or null column `{column}`"),
            Self::InvalidGender(code) => write!(f, "invalid gender code `{code}` in pets.gender"),
            Self::InvalidWeight(weight) => write!(f, "negative weight `{weight}` in pets.weight"),
        }
    }
}

impl Error for PetDecodeError {}

/// Validates a field-map for insert: name and gender are required.
pub fn validate_insert(fields: &FieldMap) -> Result<(), ValidationError> {
    check_name(fields.get(COLUMN_NAME))?;
    check_gender(fields.get(COLUMN_GENDER))?;
    check_weight(fields.get(COLUMN_WEIGHT))
}

/// Validates a field-map for update: only supplied keys are checked.
pub fn validate_update(fields: &FieldMap) -> Result<(), ValidationError> {
    if fields.contains_key(COLUMN_NAME) {
        check_name(fields.get(COLUMN_NAME))?;
    }
    if fields.contains_key(COLUMN_GENDER) {
        check_gender(fields.get(COLUMN_GENDER))?;
    }
    check_weight(fields.get(COLUMN_WEIGHT))
}

/// Copy of a validated field-map with gender and weight stored as integers.
///
/// Text like `" 2 "` or a real like `7.0` would otherwise land in the
/// INTEGER columns as-is.
pub fn normalize_fields(fields: &FieldMap) -> FieldMap {
    let mut normalized = fields.clone();
    for column in [COLUMN_GENDER, COLUMN_WEIGHT] {
        if let Some(value) = fields.get(column).and_then(FieldValue::as_exact_integer) {
            normalized.put(column, value);
        }
    }
    normalized
}

fn check_name(value: Option<&FieldValue>) -> Result<(), ValidationError> {
    match value {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(ValidationError::NameRequired),
    }
}

fn check_gender(value: Option<&FieldValue>) -> Result<(), ValidationError> {
    match value.and_then(FieldValue::as_exact_integer) {
        Some(code) if is_valid_gender(code) => Ok(()),
        _ => Err(ValidationError::InvalidGender),
    }
}

// Null weight passes; the NOT NULL DEFAULT 0 column decides what happens.
fn check_weight(value: Option<&FieldValue>) -> Result<(), ValidationError> {
    match value {
        None | Some(FieldValue::Null) => Ok(()),
        Some(value) => match value.as_exact_integer() {
            Some(weight) if weight >= 0 => Ok(()),
            _ => Err(ValidationError::InvalidWeight),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> FieldMap {
        FieldMap::new()
            .with(COLUMN_NAME, "Toto")
            .with(COLUMN_BREED, "Terrier")
            .with(COLUMN_GENDER, GENDER_MALE)
            .with(COLUMN_WEIGHT, 7_i64)
    }

    #[test]
    fn gender_codes_round_trip() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::parse(" 2 "), Some(Gender::Female));
        assert_eq!(Gender::parse("cat"), None);
        assert_eq!(Gender::from_code(3), None);
    }

    #[test]
    fn insert_requires_non_null_name() {
        let mut fields = valid_fields();
        fields.remove(COLUMN_NAME);
        assert_eq!(validate_insert(&fields), Err(ValidationError::NameRequired));

        fields.put_null(COLUMN_NAME);
        assert_eq!(validate_insert(&fields), Err(ValidationError::NameRequired));

        fields.put(COLUMN_NAME, "");
        assert_eq!(validate_insert(&fields), Ok(()));
    }

    #[test]
    fn insert_requires_member_gender() {
        let mut fields = valid_fields();
        fields.remove(COLUMN_GENDER);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidGender));

        fields.put(COLUMN_GENDER, 3_i64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidGender));

        fields.put(COLUMN_GENDER, "not a number");
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidGender));
    }

    #[test]
    fn weight_is_optional_but_never_negative() {
        let mut fields = valid_fields();
        fields.remove(COLUMN_WEIGHT);
        assert_eq!(validate_insert(&fields), Ok(()));

        fields.put(COLUMN_WEIGHT, -1_i64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidWeight));

        fields.put(COLUMN_WEIGHT, "heavy");
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidWeight));
    }

    #[test]
    fn first_violated_rule_wins() {
        let fields = FieldMap::new()
            .with(COLUMN_GENDER, 9_i64)
            .with(COLUMN_WEIGHT, -5_i64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::NameRequired));

        let fields = FieldMap::new()
            .with(COLUMN_NAME, "Rex")
            .with(COLUMN_GENDER, 9_i64)
            .with(COLUMN_WEIGHT, -5_i64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidGender));
    }

    #[test]
    fn fractional_gender_and_weight_are_rejected() {
        let fields = valid_fields().with(COLUMN_GENDER, 2.5_f64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidGender));

        let fields = valid_fields().with(COLUMN_WEIGHT, -0.5_f64);
        assert_eq!(validate_insert(&fields), Err(ValidationError::InvalidWeight));

        let fields = FieldMap::new().with(COLUMN_WEIGHT, 0.25_f64);
        assert_eq!(validate_update(&fields), Err(ValidationError::InvalidWeight));

        let fields = valid_fields()
            .with(COLUMN_GENDER, 2.0_f64)
            .with(COLUMN_WEIGHT, 7.0_f64);
        assert_eq!(validate_insert(&fields), Ok(()));
    }

    #[test]
    fn normalized_fields_store_integers() {
        let fields = valid_fields()
            .with(COLUMN_GENDER, " 2 ")
            .with(COLUMN_WEIGHT, 7.0_f64)
            .with(COLUMN_BREED, FieldValue::Null);
        let normalized = normalize_fields(&fields);

        assert_eq!(normalized.get(COLUMN_GENDER), Some(&FieldValue::Integer(2)));
        assert_eq!(normalized.get(COLUMN_WEIGHT), Some(&FieldValue::Integer(7)));
        assert_eq!(normalized.get(COLUMN_BREED), Some(&FieldValue::Null));
        assert_eq!(normalized.get(COLUMN_NAME), fields.get(COLUMN_NAME));

        let null_weight = FieldMap::new().with(COLUMN_WEIGHT, FieldValue::Null);
        assert_eq!(normalize_fields(&null_weight), null_weight);
    }

    #[test]
    fn update_only_checks_supplied_keys() {
        let fields = FieldMap::new().with(COLUMN_BREED, "Poodle");
        assert_eq!(validate_update(&fields), Ok(()));

        let fields = FieldMap::new().with(COLUMN_WEIGHT, -2_i64);
        assert_eq!(validate_update(&fields), Err(ValidationError::InvalidWeight));

        let fields = FieldMap::new().with(COLUMN_NAME, FieldValue::Null);
        assert_eq!(validate_update(&fields), Err(ValidationError::NameRequired));
    }

    #[test]
    fn draft_omits_absent_weight() {
        let draft = PetDraft::new("Rex", Gender::Female);
        let fields = draft.to_field_map();
        assert!(!fields.contains_key(COLUMN_WEIGHT));
        assert_eq!(fields.get(COLUMN_BREED), Some(&FieldValue::Null));
        assert_eq!(fields.get_as_integer(COLUMN_GENDER), Some(GENDER_FEMALE));
    }

    #[test]
    fn pet_serializes_gender_by_name() {
        let pet = Pet {
            id: 3,
            name: "Toto".to_string(),
            breed: None,
            gender: Gender::Male,
            weight: 7,
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "Toto",
                "breed": null,
                "gender": "male",
                "weight": 7
            })
        );
    }

    #[test]
    fn validation_messages_are_stable() {
        assert_eq!(ValidationError::NameRequired.to_string(), "name required");
        assert_eq!(ValidationError::InvalidGender.to_string(), "invalid gender");
        assert_eq!(ValidationError::InvalidWeight.to_string(), "invalid weight");
    }
}

//! Pet catalog schema registry.
//!
//! # Responsibility
//! - Own table/column names, gender codes and the content-address scheme.
//! - Keep every name used in SQL or addresses in one place.
//!
//! # Invariants
//! - Gender codes are exactly `{0, 1, 2}`.
//! - `CONTENT_URI` is `<scheme>://<authority>/<path>` built from the constants below.

/// Name of the content provider authority, unique per application.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Scheme every valid address must carry.
pub const CONTENT_SCHEME: &str = "content";
/// Path segment addressing the pets table.
pub const PATH_PETS: &str = "pets";
/// Whole-table address for the pets table.
pub const CONTENT_URI: &str = "content://com.example.android.pets/pets";

/// MIME type for a list of pets.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";
/// MIME type for a single pet.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

/// Full projection in table order.
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_BREED,
    COLUMN_GENDER,
    COLUMN_WEIGHT,
];

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

/// Returns true iff `code` is one of the stored gender codes.
pub fn is_valid_gender(code: i64) -> bool {
    matches!(code, GENDER_UNKNOWN | GENDER_MALE | GENDER_FEMALE)
}

/// Appends a row id to the whole-table address.
pub fn pet_uri(id: i64) -> String {
    format!("{CONTENT_URI}/{id}")
}

/// Extracts the trailing numeric segment of an address, if any.
///
/// Only checks the last path segment; use the gateway address table to
/// decide whether the address shape itself is valid.
pub fn parse_id(address: &str) -> Option<i64> {
    let (_, last) = address.trim_end_matches('/').rsplit_once('/')?;
    if last.is_empty() || !last.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    last.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_uri_is_built_from_parts() {
        assert_eq!(
            CONTENT_URI,
            format!("{CONTENT_SCHEME}://{CONTENT_AUTHORITY}/{PATH_PETS}")
        );
    }

    #[test]
    fn only_three_gender_codes_are_valid() {
        assert!(is_valid_gender(GENDER_UNKNOWN));
        assert!(is_valid_gender(GENDER_MALE));
        assert!(is_valid_gender(GENDER_FEMALE));
        assert!(!is_valid_gender(-1));
        assert!(!is_valid_gender(3));
    }

    #[test]
    fn pet_uri_round_trips_through_parse_id() {
        let uri = pet_uri(42);
        assert_eq!(uri, "content://com.example.android.pets/pets/42");
        assert_eq!(parse_id(&uri), Some(42));
        assert_eq!(parse_id(CONTENT_URI), None);
        assert_eq!(parse_id("content://com.example.android.pets/pets/-1"), None);
    }
}

//! Content-address parsing and route resolution.
//!
//! # Responsibility
//! - Split `content://<authority>/<path>` addresses into their parts.
//! - Match paths against an explicitly constructed, immutable pattern table.
//!
//! # Invariants
//! - Resolution is a pure function of the table and the address string.
//! - `#` in a pattern matches exactly one non-negative integer segment.
//! - `*` in a pattern matches exactly one non-empty segment.

use crate::contract::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_PETS};
use crate::model::pet::PetId;
use once_cell::sync::Lazy;
use regex::Regex;

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/?#]+)(/[^?#]*)?$").expect("valid address regex")
});

/// Route code assigned to a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The whole pets table.
    Pets,
    /// One pet row, id taken from the `#` segment.
    PetId,
}

/// What a resolved address operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Table,
    Row(PetId),
}

/// Address split into scheme, authority and path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub segments: Vec<&'a str>,
}

/// Splits `address`. Returns `None` for anything that is not `scheme://authority[/path]`.
pub fn parse_address(address: &str) -> Option<ParsedAddress<'_>> {
    let captures = ADDRESS_RE.captures(address.trim())?;
    let scheme = captures.get(1)?.as_str();
    let authority = captures.get(2)?.as_str();
    let segments = captures
        .get(3)
        .map(|path| {
            path.as_str()
                .split('/')
                .filter(|segment| !segment.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(ParsedAddress {
        scheme,
        authority,
        segments,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Number,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AddressPattern {
    authority: String,
    segments: Vec<Segment>,
    route: Route,
}

impl AddressPattern {
    /// Returns the numeric segment value (if the pattern has one) on match.
    fn matches(&self, authority: &str, segments: &[&str]) -> Option<Option<i64>> {
        if self.authority != authority || self.segments.len() != segments.len() {
            return None;
        }

        let mut number = None;
        for (pattern, segment) in self.segments.iter().zip(segments) {
            match pattern {
                Segment::Literal(literal) if literal == segment => {}
                Segment::Literal(_) => return None,
                Segment::Number => {
                    if !segment.bytes().all(|byte| byte.is_ascii_digit()) {
                        return None;
                    }
                    number = Some(segment.parse().ok()?);
                }
                Segment::Any => {}
            }
        }
        Some(number)
    }
}

/// Immutable address pattern table handed to the gateway at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTable {
    scheme: String,
    patterns: Vec<AddressPattern>,
}

impl AddressTable {
    /// Empty table accepting addresses with `scheme`.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            patterns: Vec::new(),
        }
    }

    /// Standard pets table: `pets` -> [`Route::Pets`], `pets/#` -> [`Route::PetId`].
    pub fn pets() -> Self {
        Self::new(CONTENT_SCHEME)
            .with_pattern(CONTENT_AUTHORITY, PATH_PETS, Route::Pets)
            .with_pattern(CONTENT_AUTHORITY, &format!("{PATH_PETS}/#"), Route::PetId)
    }

    /// Adds a pattern. Earlier patterns win when several match.
    pub fn with_pattern(mut self, authority: &str, path: &str, route: Route) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "#" => Segment::Number,
                "*" => Segment::Any,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        self.patterns.push(AddressPattern {
            authority: authority.to_string(),
            segments,
            route,
        });
        self
    }

    /// Matches `address` to a route and its numeric id, if any.
    pub fn match_route(&self, address: &str) -> Option<(Route, Option<i64>)> {
        let parsed = parse_address(address)?;
        if parsed.scheme != self.scheme {
            return None;
        }
        self.patterns.iter().find_map(|pattern| {
            pattern
                .matches(parsed.authority, &parsed.segments)
                .map(|number| (pattern.route, number))
        })
    }

    /// Resolves `address` to the table or to one row.
    pub fn resolve(&self, address: &str) -> Option<Target> {
        match self.match_route(address)? {
            (Route::Pets, _) => Some(Target::Table),
            (Route::PetId, Some(id)) => Some(Target::Row(id)),
            (Route::PetId, None) => None,
        }
    }
}

impl Default for AddressTable {
    fn default() -> Self {
        Self::pets()
    }
}

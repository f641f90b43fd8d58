//! Common address types shared by the sources and the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A postal address as returned by a postcode lookup.
///
/// The descriptive lines carry free text ("Flat 20", "Rose Tower"). The
/// identifying fields carry the parts that pin down one property, and are
/// weighted more heavily when scoring. Any field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// First descriptive line (e.g., "Flat 20")
    #[serde(rename = "line_1")]
    pub line_one: String,
    /// Second descriptive line (e.g., "Rose Tower")
    #[serde(rename = "line_2")]
    pub line_two: String,
    /// Third descriptive line (e.g., "62 Clarence Parade")
    #[serde(rename = "line_3")]
    pub line_three: String,
    /// Building number (e.g., "62", "47a")
    pub building_number: String,
    /// Building name (e.g., "Rose Tower")
    pub building_name: String,
    /// Sub-building name (e.g., "Flat 20")
    pub sub_building_name: String,
    /// Postcode (e.g., "PO5 2HX")
    pub postcode: String,
}

impl Address {
    /// Create an empty address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first descriptive line.
    pub fn with_line_one(mut self, line: impl Into<String>) -> Self {
        self.line_one = line.into();
        self
    }

    /// Set the second descriptive line.
    pub fn with_line_two(mut self, line: impl Into<String>) -> Self {
        self.line_two = line.into();
        self
    }

    /// Set the third descriptive line.
    pub fn with_line_three(mut self, line: impl Into<String>) -> Self {
        self.line_three = line.into();
        self
    }

    /// Set the building number.
    pub fn with_building_number(mut self, number: impl Into<String>) -> Self {
        self.building_number = number.into();
        self
    }

    /// Set the building name.
    pub fn with_building_name(mut self, name: impl Into<String>) -> Self {
        self.building_name = name.into();
        self
    }

    /// Set the sub-building name.
    pub fn with_sub_building_name(mut self, name: impl Into<String>) -> Self {
        self.sub_building_name = name.into();
        self
    }

    /// Set the postcode.
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = postcode.into();
        self
    }

    /// Check if every field is empty.
    pub fn is_empty(&self) -> bool {
        self.lines().all(str::is_empty)
            && self.building_number.is_empty()
            && self.building_name.is_empty()
            && self.sub_building_name.is_empty()
            && self.postcode.is_empty()
    }

    /// The three descriptive lines, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            self.line_one.as_str(),
            self.line_two.as_str(),
            self.line_three.as_str(),
        ]
        .into_iter()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .lines()
            .chain(std::iter::once(self.postcode.as_str()))
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Envelope returned by a postcode lookup, stored or remote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressResult {
    /// Every address registered under the postcode
    pub result: Vec<Address>,
    /// Service status code
    pub code: i64,
    /// Service status message
    pub message: String,
}

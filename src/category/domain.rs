//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, money::Money};

/// A validated, non-empty category name.
///
/// Two names refer to the same category when their [CategoryName::key]s are
/// equal, i.e. they match after trimming and ignoring case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The normalized form of the name used to match categories.
    pub fn key(&self) -> String {
        normalize_category_key(&self.0)
    }
}

/// Trim and lowercase a category name.
pub fn normalize_category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryName::new(&value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A CSS hex color such as `#fff` or `#0a84ff`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Check that `color` is a `#` followed by three or six hex digits.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidColor] otherwise.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        let is_valid = color.strip_prefix('#').is_some_and(|digits| {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        });

        if is_valid {
            Ok(Self(color.to_owned()))
        } else {
            Err(Error::InvalidColor(color.to_owned()))
        }
    }

    /// Wrap a color read from the database.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_owned())
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::new(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// A named, colored spending bucket owned by a single bank (e.g. 'Groceries', 'Rent').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category's name, unique within its bank ignoring case.
    pub name: CategoryName,
    /// The color used to draw the category in charts.
    pub color: HexColor,
    /// How much has been spent in this category so far.
    #[serde(default)]
    pub expenses: Money,
}

/// Form data for adding a single category.
///
/// Fields are raw strings so that problems are reported as validation errors
/// rather than as deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The name of the new category.
    pub name: String,
    /// The hex color of the new category.
    pub color: String,
    /// Expenses already accumulated, zero if left out.
    #[serde(default)]
    pub expenses: Money,
}


#[cfg(test)]
mod hex_color_tests {
    use crate::{Error, category::HexColor};

    #[test]
    fn accepts_short_and_long_forms() {
        assert!(HexColor::new("#fff").is_ok());
        assert!(HexColor::new("#0A84ff").is_ok());
    }

    #[test]
    fn rejects_other_strings() {
        for raw in ["", "fff", "#ffff", "#ggg", "red", "#12345"] {
            assert_eq!(
                HexColor::new(raw),
                Err(Error::InvalidColor(raw.to_owned())),
                "want {raw:?} to be rejected"
            );
        }
    }
}

//! Merging category edits into a bank's category list.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    Error,
    category::{Category, CategoryFormData, CategoryName, HexColor},
};

/// The outcome of merging an incoming category list into the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// The new category list, in the order of the incoming list.
    pub categories: Vec<Category>,
    /// Names of categories that did not exist before.
    pub created: Vec<CategoryName>,
    /// Names of existing categories whose fields were overwritten.
    pub updated: Vec<CategoryName>,
    /// Names of existing categories missing from the incoming list.
    pub deleted: Vec<CategoryName>,
}

/// Merge `incoming` into `current`, matching categories by their trimmed, lowercased name.
///
/// - Categories only in `incoming` are created.
/// - Categories in both keep their current name and take the incoming color and expenses.
/// - Categories only in `current` are deleted.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if two incoming categories have the
/// same normalized name. Nothing is merged in that case.
pub fn reconcile_categories(
    current: &[Category],
    incoming: &[Category],
) -> Result<Reconciliation, Error> {
    let mut incoming_keys = HashSet::with_capacity(incoming.len());
    for category in incoming {
        if !incoming_keys.insert(category.name.key()) {
            return Err(Error::DuplicateCategoryName(category.name.to_string()));
        }
    }

    let current_by_key: HashMap<String, &Category> = current
        .iter()
        .map(|category| (category.name.key(), category))
        .collect();

    let mut categories = Vec::with_capacity(incoming.len());
    let mut created = Vec::new();
    let mut updated = Vec::new();

    for category in incoming {
        match current_by_key.get(&category.name.key()) {
            Some(existing) => {
                categories.push(Category {
                    name: existing.name.clone(),
                    color: category.color.clone(),
                    expenses: category.expenses,
                });
                updated.push(existing.name.clone());
            }
            None => {
                categories.push(category.clone());
                created.push(category.name.clone());
            }
        }
    }

    let deleted = current
        .iter()
        .filter(|category| !incoming_keys.contains(&category.name.key()))
        .map(|category| category.name.clone())
        .collect();

    Ok(Reconciliation {
        categories,
        created,
        updated,
        deleted,
    })
}

/// Check that a single new category can be added next to `current`.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyCategoryName] if the name is blank,
/// - [Error::DuplicateCategoryName] if an existing category has the same normalized name,
/// - [Error::InvalidColor] if the color is not a hex color.
pub fn validate_new_category(
    current: &[Category],
    form: &CategoryFormData,
) -> Result<Category, Error> {
    let name = CategoryName::new(&form.name)?;
    let key = name.key();

    if current.iter().any(|category| category.name.key() == key) {
        return Err(Error::DuplicateCategoryName(name.to_string()));
    }

    let color = HexColor::new(&form.color)?;

    Ok(Category {
        name,
        color,
        expenses: form.expenses,
    })
}


#[cfg(test)]
mod validate_new_category_tests {
    use crate::{
        Error, Money,
        category::{Category, CategoryFormData, CategoryName, HexColor},
    };

    use super::validate_new_category;

    fn existing() -> Vec<Category> {
        vec![Category {
            name: CategoryName::new("Food").unwrap(),
            color: HexColor::new("#111").unwrap(),
            expenses: Money::ZERO,
        }]
    }

    fn form(name: &str, color: &str) -> CategoryFormData {
        CategoryFormData {
            name: name.to_owned(),
            color: color.to_owned(),
            expenses: Money::ZERO,
        }
    }

    #[test]
    fn accepts_new_name() {
        let got = validate_new_category(&existing(), &form(" Travel ", "#abcdef")).unwrap();

        assert_eq!(got.name.as_ref(), "Travel");
        assert_eq!(got.color.as_ref(), "#abcdef");
    }

    #[test]
    fn rejects_duplicate_ignoring_case_and_whitespace() {
        let got = validate_new_category(&existing(), &form("  FOOD ", "#abcdef"));

        assert_eq!(got, Err(Error::DuplicateCategoryName("FOOD".to_owned())));
    }

    #[test]
    fn rejects_empty_name() {
        let got = validate_new_category(&existing(), &form(" ", "#abcdef"));

        assert_eq!(got, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn rejects_bad_color() {
        let got = validate_new_category(&existing(), &form("Travel", "blue"));

        assert_eq!(got, Err(Error::InvalidColor("blue".to_owned())));
    }
}

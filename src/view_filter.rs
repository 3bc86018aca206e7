use crate::catalog::{Catalog, CategoryFilter, Resource};

/// The records shown for `active`, in catalog order.
///
/// An `Only` filter naming a category that no record carries yields nothing;
/// that can only happen if the filter didn't come from `Catalog::categories`.
pub fn visible<'a>(catalog: &'a Catalog, active: &CategoryFilter) -> Vec<&'a Resource> {
    catalog
        .all_resources()
        .iter()
        .filter(|r| active.matches(r))
        .collect()
}

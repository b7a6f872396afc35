//! Page metadata carried by every tab page.
//!
//! Root element id is `{tab key}--{category}`, e.g. `"a001_ore_intake--list"`,
//! so an id copied from the DOM inspector leads straight to the domain folder.

/// Register table with search, sorting and pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// True for ids of the form `{entity}--{category}` with both parts present.
pub fn is_valid_page_id(id: &str) -> bool {
    matches!(id.split_once("--"), Some((entity, category)) if !entity.is_empty() && !category.is_empty())
}

/// Metadata entry carrying the ordered column names of a result
pub const FIELDS_KEY: &str = "fields";

/// Metadata entry carrying a causal-ordering bookmark
///
/// Bookmarks belong to transaction completion, never to a query result.
pub const BOOKMARK_KEY: &str = "bookmark";

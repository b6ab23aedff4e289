//! Slug and URL conventions for generated landing pages.

/// Path prefix under which lead pages are served by the front end.
pub const LEAD_PAGE_PATH_PREFIX: &str = "/lead-gen";

/// Derive a URL slug from a page title.
///
/// Convention:
///
/// - the title is trimmed and lowercased
/// - every character that is not ASCII alphanumeric, `_` or whitespace is dropped
/// - each run of whitespace becomes a single `-`
///
/// # Examples
///
/// ```
/// use leadgen_core::naming::slugify;
///
/// assert_eq!(slugify("Fast Freight Fulfillment"), "fast-freight-fulfillment");
/// assert_eq!(slugify("3PL: Done   Right!"), "3pl-done-right");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.trim().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        if in_space && !slug.is_empty() {
            slug.push('-');
        }
        in_space = false;
        slug.push(c.to_ascii_lowercase());
    }

    slug
}

/// Public URL path of the page with the given slug.
pub fn lead_page_url(slug: &str) -> String {
    format!("{LEAD_PAGE_PATH_PREFIX}/{slug}")
}

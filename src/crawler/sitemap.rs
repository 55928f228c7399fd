//! Sitemap parsing
//!
//! Extracts the course URLs listed in a sitemap document. Entries are
//! located with a prefixed query (`urlset:url`) whose prefix is resolved
//! through the configured namespace mapping.

use crate::config::NamespaceMap;
use thiserror::Error;

/// Namespace prefix the sitemap query is written against
pub const SITEMAP_PREFIX: &str = "urlset";

/// Local name of the per-page entry element
const ENTRY_NAME: &str = "url";

/// Errors raised while reading a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Namespace prefix '{0}' is not in the namespace mapping")]
    UnknownPrefix(String),
}

/// Parses a sitemap and returns at most `limit` URLs in document order
///
/// Each `url` element directly under the root contributes the text of its
/// first child element (usually `<loc>`). Entries without such text are
/// skipped. URLs are neither sorted, deduplicated nor validated.
///
/// An empty or whitespace-only document yields an empty list.
///
/// # Example
///
/// ```
/// use course_sheet::config::NamespaceMap;
/// use course_sheet::crawler::parse_sitemap;
///
/// let mut namespaces = NamespaceMap::new();
/// namespaces.insert(
///     "urlset".to_string(),
///     "http://www.sitemaps.org/schemas/sitemap/0.9".to_string(),
/// );
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///     <url><loc>https://example.com/learn/a</loc></url>
///     <url><loc>https://example.com/learn/b</loc></url>
/// </urlset>"#;
///
/// let urls = parse_sitemap(xml, &namespaces, 1).unwrap();
/// assert_eq!(urls, vec!["https://example.com/learn/a".to_string()]);
/// ```
pub fn parse_sitemap(
    xml: &str,
    namespaces: &NamespaceMap,
    limit: usize,
) -> Result<Vec<String>, SitemapError> {
    let namespace = namespaces
        .get(SITEMAP_PREFIX)
        .ok_or_else(|| SitemapError::UnknownPrefix(SITEMAP_PREFIX.to_string()))?;

    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document = roxmltree::Document::parse(xml)?;

    let urls = document
        .root_element()
        .children()
        .filter(|node| {
            node.is_element()
                && node.tag_name().name() == ENTRY_NAME
                && node.tag_name().namespace() == Some(namespace.as_str())
        })
        .filter_map(|entry| {
            let url = entry
                .children()
                .find(|child| child.is_element())
                .and_then(|child| child.text())
                .map(str::trim)
                .filter(|text| !text.is_empty());

            if url.is_none() {
                tracing::debug!("Skipping sitemap entry without a location");
            }
            url.map(str::to_string)
        })
        .take(limit)
        .collect();

    Ok(urls)
}

//! Experiment variant resolution.
//!
//! Precedence, highest first: explicit `?variant=` URL parameter, the
//! persisted `ab_variant` value, then page markers (a body class or a
//! path substring). Tier 1 and tier 3 outcomes are persisted so later
//! page loads stay in the same bucket; a tier 2 hit is served as-is.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::db::Database;
use crate::db::tables::VARIANT_KEY;
use crate::page::PageContext;
use beacon_types::Variant;

/// URL query parameter that force-assigns a variant.
pub const VARIANT_URL_PARAM: &str = "variant";

const BODY_MARKER_CLASS: &str = "variant-b";
const PATH_MARKERS: [&str; 2] = ["variant-b", "product-b"];

pub struct VariantResolver {
    db: Arc<Database>,
    ttl_days: u32,
    current: Mutex<Option<Variant>>,
}

impl VariantResolver {
    pub fn new(db: Arc<Database>, ttl_days: u32) -> Self {
        Self {
            db,
            ttl_days,
            current: Mutex::new(None),
        }
    }

    /// Run the full precedence chain, cache the result for this page
    /// load, and persist it where the tier calls for it.
    pub fn detect(&self, page: &PageContext) -> Variant {
        if let Some(tag) = page.query_param(VARIANT_URL_PARAM) {
            let variant = Variant::from(tag);
            self.persist(&variant);
            log::info!("[VARIANT] Set from URL: {}", variant);
            return self.cache(variant);
        }

        let persisted = self.db.get_value(VARIANT_KEY).unwrap_or_else(|e| {
            log::error!("[VARIANT] Failed to read persisted variant: {}", e);
            None
        });
        if let Some(tag) = persisted {
            let variant = Variant::from(tag);
            log::debug!("[VARIANT] From persisted value: {}", variant);
            return self.cache(variant);
        }

        let variant = if page.has_body_class(BODY_MARKER_CLASS)
            || PATH_MARKERS.iter().any(|marker| page.path().contains(marker))
        {
            Variant::B
        } else {
            Variant::A
        };
        self.persist(&variant);
        log::info!("[VARIANT] Detected from page markers: {}", variant);
        self.cache(variant)
    }

    /// Cached value from an earlier `detect` this page load, or a fresh
    /// detection.
    pub fn current(&self, page: &PageContext) -> Variant {
        if let Some(variant) = self.current.lock().clone() {
            return variant;
        }
        self.detect(page)
    }

    fn cache(&self, variant: Variant) -> Variant {
        *self.current.lock() = Some(variant.clone());
        variant
    }

    fn persist(&self, variant: &Variant) {
        if let Err(e) = self.db.set_value(VARIANT_KEY, variant.as_str(), self.ttl_days) {
            log::error!("[VARIANT] Failed to persist variant: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn db() -> Arc<Database> {
        Arc::new(Database::new(":memory:").expect("in-memory db"))
    }

    fn page(url: &str) -> PageContext {
        PageContext::new(Url::parse(url).unwrap(), "Test Page")
    }

    #[test]
    fn url_parameter_beats_persisted_value_and_updates_it() {
        let db = db();
        db.set_value(VARIANT_KEY, "A", 30).unwrap();
        let resolver = VariantResolver::new(db.clone(), 30);

        let variant = resolver.detect(&page("https://example.com/pricing?variant=B"));
        assert_eq!(variant, Variant::B);
        assert_eq!(db.get_value(VARIANT_KEY).unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn persisted_value_wins_over_page_markers() {
        let db = db();
        db.set_value(VARIANT_KEY, "A", 30).unwrap();
        let resolver = VariantResolver::new(db, 30);

        let page = page("https://example.com/product-b").with_body_classes(["variant-b"]);
        assert_eq!(resolver.detect(&page), Variant::A);
    }

    #[test]
    fn body_marker_assigns_b_and_persists() {
        let db = db();
        let resolver = VariantResolver::new(db.clone(), 30);

        let page = page("https://example.com/").with_body_classes(["variant-b"]);
        assert_eq!(resolver.detect(&page), Variant::B);
        assert_eq!(db.get_value(VARIANT_KEY).unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn path_marker_assigns_b() {
        let resolver = VariantResolver::new(db(), 30);
        assert_eq!(resolver.detect(&page("https://example.com/product-b/intro")), Variant::B);
    }

    #[test]
    fn nothing_matching_defaults_to_a() {
        let db = db();
        let resolver = VariantResolver::new(db.clone(), 30);
        assert_eq!(resolver.detect(&page("https://example.com/")), Variant::A);
        assert_eq!(db.get_value(VARIANT_KEY).unwrap().as_deref(), Some("A"));
    }

    #[test]
    fn current_is_stable_within_a_page_load() {
        let db = db();
        let resolver = VariantResolver::new(db.clone(), 30);
        let page = page("https://example.com/");

        let first = resolver.current(&page);
        // Even if the persisted value changes underneath, the cached
        // resolution holds for this page load.
        db.set_value(VARIANT_KEY, "B", 30).unwrap();
        let second = resolver.current(&page);
        assert_eq!(first, second);
    }

    #[test]
    fn open_set_tags_pass_through() {
        let resolver = VariantResolver::new(db(), 30);
        let variant = resolver.detect(&page("https://example.com/?variant=holdout"));
        assert_eq!(variant, Variant::Other("holdout".into()));
    }
}

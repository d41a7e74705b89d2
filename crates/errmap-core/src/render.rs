use std::error::Error;

use serde::Serialize;

use crate::catalog::ErrorCodeEntry;
use crate::policy::ResolverPolicy;

/// Client-facing error body.
///
/// `status` travels on the transport (e.g. the HTTP status line) and is not
/// serialized. `details` is omitted from the JSON entirely when hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsePayload {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip)]
    pub status: u16,
}

pub fn render(
    entry: &ErrorCodeEntry,
    original: &anyhow::Error,
    policy: &ResolverPolicy,
) -> ResponsePayload {
    build(entry, policy, || format!("{original:#}"))
}

/// [`render`] for plain `std::error::Error` chains.
pub fn render_std(
    entry: &ErrorCodeEntry,
    original: &(dyn Error + 'static),
    policy: &ResolverPolicy,
) -> ResponsePayload {
    build(entry, policy, || {
        std::iter::successors(Some(original), |&e| e.source())
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ")
    })
}

fn build(
    entry: &ErrorCodeEntry,
    policy: &ResolverPolicy,
    details: impl FnOnce() -> String,
) -> ResponsePayload {
    ResponsePayload {
        code: entry.code().to_string(),
        message: entry.message().to_string(),
        details: if policy.hide_details {
            None
        } else {
            Some(details())
        },
        status: entry.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::sentinel::SentinelRegistry;
    use crate::wrap::wrap;

    fn catalog() -> (Catalog, crate::Sentinel) {
        let mut registry = SentinelRegistry::new();
        let dup = registry.register("duplicate_sku", "SKU already exists");
        let catalog = Catalog::builder()
            .entry("DUPLICATE_SKU", "a product with this SKU already exists", 409, &dup)
            .build(&registry)
            .unwrap();
        (catalog, dup)
    }

    #[test]
    fn hidden_details_are_absent_from_json() {
        let (catalog, dup) = catalog();
        let err = wrap("create product SKU ABC", dup);
        let entry = catalog.resolve(&err);
        let payload = render(entry, &err, &ResolverPolicy::hiding_details());
        assert!(payload.details.is_none());

        let json = serde_json::to_value(&payload).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("details"));
        assert!(!obj.contains_key("status"));
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn shown_details_carry_the_full_chain() {
        let (catalog, dup) = catalog();
        let err = wrap("create product SKU ABC", dup);
        let entry = catalog.resolve(&err);
        let payload = render(entry, &err, &ResolverPolicy::showing_details());
        assert_eq!(payload.code, "DUPLICATE_SKU");
        assert_eq!(payload.status, 409);
        assert_eq!(
            payload.details.as_deref(),
            Some("create product SKU ABC: SKU already exists")
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["details"], "create product SKU ABC: SKU already exists");
    }

    #[test]
    fn message_comes_from_catalog_not_error() {
        let (catalog, _dup) = catalog();
        let hostile = anyhow::anyhow!("SELECT * FROM users WHERE password = 'hunter2'");
        for policy in [
            ResolverPolicy::hiding_details(),
            ResolverPolicy::showing_details(),
        ] {
            let entry = catalog.resolve(&hostile);
            let payload = render(entry, &hostile, &policy);
            assert_eq!(payload.message, entry.message());
            assert_eq!(payload.message, "internal server error");
        }
        let hidden = render(
            catalog.resolve(&hostile),
            &hostile,
            &ResolverPolicy::hiding_details(),
        );
        let body = serde_json::to_string(&hidden).unwrap();
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn std_render_joins_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("save product")]
        struct Save {
            #[source]
            source: std::io::Error,
        }
        let (catalog, _dup) = catalog();
        let err = Save {
            source: std::io::Error::other("disk full"),
        };
        let entry = catalog.resolve_std(&err);
        let payload = render_std(entry, &err, &ResolverPolicy::showing_details());
        assert_eq!(payload.details.as_deref(), Some("save product: disk full"));
        assert_eq!(payload.code, "INTERNAL_ERROR");
    }
}

use crate::catalog::{Catalog, ErrorCodeEntry, Matcher};
use crate::policy::ResolverPolicy;
use crate::render::{render, ResponsePayload};

/// Catalog plus policy, built once at startup and shared (usually behind an
/// `Arc`) with whatever sits at the transport boundary.
#[derive(Debug, Clone)]
pub struct ErrorMapper {
    catalog: Catalog,
    policy: ResolverPolicy,
}

impl ErrorMapper {
    pub fn new(catalog: Catalog, policy: ResolverPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    pub fn resolve(&self, err: &anyhow::Error) -> &ErrorCodeEntry {
        self.catalog.resolve(err)
    }

    /// Resolve `err`, log it, and render the client payload.
    ///
    /// The log line always carries the full chain, whatever the policy.
    pub fn respond(&self, err: &anyhow::Error) -> ResponsePayload {
        let entry = self.catalog.resolve(err);
        let code = entry.code();
        let status = entry.status();

        match entry.matcher() {
            Matcher::Cancelled | Matcher::Timeout => {
                tracing::warn!(code, status, error = %format!("{err:#}"), "request aborted");
            }
            _ if status >= 500 => {
                tracing::error!(code, status, error = %format!("{err:#}"), "request failed");
            }
            _ => {
                tracing::debug!(code, status, error = %format!("{err:#}"), "request rejected");
            }
        }

        render(entry, err, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::SentinelRegistry;
    use crate::signal::Cancelled;
    use crate::wrap::wrap;

    fn mapper(policy: ResolverPolicy) -> (ErrorMapper, crate::Sentinel) {
        let mut registry = SentinelRegistry::new();
        let not_found = registry.register("product_not_found", "product not found");
        let catalog = Catalog::builder()
            .entry("PRODUCT_NOT_FOUND", "product not found", 404, &not_found)
            .build(&registry)
            .unwrap();
        (ErrorMapper::new(catalog, policy), not_found)
    }

    #[test]
    fn respond_combines_resolve_and_render() {
        let (mapper, not_found) = mapper(ResolverPolicy::hiding_details());
        let payload = mapper.respond(&wrap("get product 123", not_found));
        assert_eq!(payload.code, "PRODUCT_NOT_FOUND");
        assert_eq!(payload.status, 404);
        assert!(payload.details.is_none());
    }

    #[test]
    fn respond_honours_policy() {
        let (mapper, not_found) = mapper(ResolverPolicy::showing_details());
        let err = wrap("handler", wrap("get product 9", not_found)).context(Cancelled);
        let payload = mapper.respond(&err);
        assert_eq!(payload.code, "REQUEST_CANCELLED");
        assert_eq!(payload.status, 499);
        assert_eq!(
            payload.details.as_deref(),
            Some("operation cancelled: handler: get product 9: product not found")
        );
        assert!(!mapper.policy().hide_details);
    }

    #[test]
    fn mapper_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ErrorMapper>();

        let (mapper, not_found) = mapper(ResolverPolicy::default());
        let mapper = std::sync::Arc::new(mapper);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mapper = mapper.clone();
                let not_found = not_found.clone();
                std::thread::spawn(move || {
                    let err = wrap(format!("get product {i}"), not_found);
                    mapper.respond(&err).code
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), "PRODUCT_NOT_FOUND");
        }
    }
}

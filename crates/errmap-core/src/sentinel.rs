use std::error::Error;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Sentinel
// ---------------------------------------------------------------------------

struct SentinelInner {
    name: String,
    message: String,
}

/// A process-wide identity for one category of domain failure.
///
/// Sentinels compare by identity, not by text: clones of one sentinel are
/// equal, two registrations never are. A sentinel is a regular
/// `std::error::Error`, so it can sit at the bottom of an `anyhow::Error`
/// chain and still be recognised after any number of context layers.
#[derive(Clone)]
pub struct Sentinel(Arc<SentinelInner>);

impl Sentinel {
    /// Stable machine name, e.g. `product_not_found`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    /// True when `link` is this exact sentinel, or a [`SentinelCause`]
    /// carrying it.
    pub fn is(&self, link: &(dyn Error + 'static)) -> bool {
        if let Some(other) = link.downcast_ref::<Sentinel>() {
            return other == self;
        }
        link.downcast_ref::<SentinelCause>()
            .is_some_and(|cause| &cause.sentinel == self)
    }
}

impl PartialEq for Sentinel {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Sentinel {}

impl fmt::Debug for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sentinel")
            .field("name", &self.0.name)
            .finish()
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.message)
    }
}

impl Error for Sentinel {}

// ---------------------------------------------------------------------------
// SentinelCause
// ---------------------------------------------------------------------------

/// A sentinel stacked on top of an existing error.
///
/// Unlike `anyhow::Context::context(sentinel)`, this is a chain link of its
/// own, so every tagged sentinel stays visible to a chain scan. Built by
/// [`crate::wrap::tag`].
#[derive(Debug)]
pub struct SentinelCause {
    sentinel: Sentinel,
    source: anyhow::Error,
}

impl SentinelCause {
    pub fn new(sentinel: Sentinel, source: anyhow::Error) -> Self {
        Self { sentinel, source }
    }

    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }
}

impl fmt::Display for SentinelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.sentinel, f)
    }
}

impl Error for SentinelCause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let inner: &(dyn Error + Send + Sync + 'static) = &*self.source;
        Some(inner)
    }
}

// ---------------------------------------------------------------------------
// SentinelRegistry
// ---------------------------------------------------------------------------

/// The canonical set of sentinels known to a process.
///
/// Populated during startup, then handed (by reference) to
/// [`crate::CatalogBuilder::build`], which checks the catalog against it.
#[derive(Debug, Default)]
pub struct SentinelRegistry {
    sentinels: Vec<Sentinel>,
}

impl SentinelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered. Both are definition
    /// defects and must fail at startup.
    pub fn register(&mut self, name: &str, message: &str) -> Sentinel {
        assert!(!name.trim().is_empty(), "sentinel name must not be empty");
        assert!(
            self.get(name).is_none(),
            "sentinel '{name}' is registered twice"
        );

        let sentinel = Sentinel(Arc::new(SentinelInner {
            name: name.to_string(),
            message: message.to_string(),
        }));
        self.sentinels.push(sentinel.clone());
        tracing::trace!(sentinel = name, "registered sentinel");
        sentinel
    }

    pub fn get(&self, name: &str) -> Option<&Sentinel> {
        self.sentinels.iter().find(|s| s.name() == name)
    }

    pub fn contains(&self, sentinel: &Sentinel) -> bool {
        self.sentinels.iter().any(|s| s == sentinel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sentinel> {
        self.sentinels.iter()
    }

    pub fn len(&self) -> usize {
        self.sentinels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentinels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_compare_equal() {
        let mut reg = SentinelRegistry::new();
        let a = reg.register("not_found", "not found");
        assert_eq!(a, a.clone());
    }

    #[test]
    fn same_text_different_registries_are_distinct() {
        let mut one = SentinelRegistry::new();
        let mut two = SentinelRegistry::new();
        let a = one.register("not_found", "not found");
        let b = two.register("not_found", "not found");
        assert_ne!(a, b);
        assert!(one.contains(&a));
        assert!(!one.contains(&b));
    }

    #[test]
    fn display_is_the_message() {
        let mut reg = SentinelRegistry::new();
        let s = reg.register("duplicate_sku", "SKU already exists");
        assert_eq!(s.to_string(), "SKU already exists");
        assert_eq!(s.name(), "duplicate_sku");
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_name_panics() {
        let mut reg = SentinelRegistry::new();
        reg.register("conflict", "conflict");
        reg.register("conflict", "another conflict");
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_name_panics() {
        let mut reg = SentinelRegistry::new();
        reg.register("  ", "blank");
    }

    #[test]
    fn is_matches_only_the_same_sentinel() {
        let mut reg = SentinelRegistry::new();
        let a = reg.register("a", "a failed");
        let b = reg.register("b", "b failed");
        let link: &(dyn Error + 'static) = &a;
        assert!(a.is(link));
        assert!(!b.is(link));
        let io = std::io::Error::other("a failed");
        assert!(!a.is(&io));
    }

    #[test]
    fn lookup_by_name() {
        let mut reg = SentinelRegistry::new();
        let a = reg.register("a", "a failed");
        assert_eq!(reg.get("a"), Some(&a));
        assert!(reg.get("b").is_none());
        assert_eq!(reg.len(), 1);
        assert!(!reg.is_empty());
    }
}

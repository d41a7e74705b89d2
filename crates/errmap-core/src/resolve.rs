//! Classify an arbitrary error chain into exactly one catalog entry.
//!
//! Precedence: cancellation, then timeout, then the first sentinel row (in
//! declared order) whose sentinel appears anywhere in the chain, then the
//! fallback. Both the catalog and a typical chain are short, so this is a
//! plain linear scan.

use std::error::Error;

use crate::catalog::{Catalog, ErrorCodeEntry, Matcher};
use crate::signal::{self, Cancelled, DeadlineExceeded};

impl Catalog {
    pub fn resolve(&self, err: &anyhow::Error) -> &ErrorCodeEntry {
        let mut links: Vec<&(dyn Error + 'static)> = err.chain().collect();

        // Signals attached with `.context(..)` do not show up as chain links
        // of their own type, but anyhow can still downcast to them. Presence
        // is all that matters for a signal. Sentinels go through `tag`.
        if let Some(c) = err.downcast_ref::<Cancelled>() {
            links.push(c);
        }
        if let Some(d) = err.downcast_ref::<DeadlineExceeded>() {
            links.push(d);
        }

        self.resolve_links(&links)
    }

    /// Same as [`Catalog::resolve`] for plain `std::error::Error` chains.
    pub fn resolve_std(&self, err: &(dyn Error + 'static)) -> &ErrorCodeEntry {
        let links: Vec<&(dyn Error + 'static)> =
            std::iter::successors(Some(err), |&e| e.source()).collect();
        self.resolve_links(&links)
    }

    fn resolve_links(&self, links: &[&(dyn Error + 'static)]) -> &ErrorCodeEntry {
        if links.iter().any(|l| signal::is_cancellation(*l)) {
            return self.cancelled();
        }
        if links.iter().any(|l| signal::is_timeout(*l)) {
            return self.timeout();
        }

        self.iter()
            .find(|entry| match entry.matcher() {
                Matcher::Sentinel(sentinel) => links.iter().any(|l| sentinel.is(*l)),
                _ => false,
            })
            .unwrap_or_else(|| self.fallback())
    }
}

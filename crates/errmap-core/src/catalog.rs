use std::collections::HashSet;

use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::sentinel::{Sentinel, SentinelRegistry};

pub const CANCELLED_CODE: &str = "REQUEST_CANCELLED";
pub const TIMEOUT_CODE: &str = "REQUEST_TIMEOUT";
pub const FALLBACK_CODE: &str = "INTERNAL_ERROR";

/// Non-standard "client closed request" status.
pub const STATUS_CLIENT_CLOSED: u16 = 499;

// ---------------------------------------------------------------------------
// ErrorCodeEntry
// ---------------------------------------------------------------------------

/// What a catalog entry answers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Sentinel(Sentinel),
    Cancelled,
    Timeout,
    Fallback,
}

/// One immutable catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCodeEntry {
    code: String,
    message: String,
    status: u16,
    matcher: Matcher,
}

impl ErrorCodeEntry {
    fn new(code: &str, message: &str, status: u16, matcher: Matcher) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status,
            matcher,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Client-safe text. Never derived from the error being classified.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn sentinel(&self) -> Option<&Sentinel> {
        match &self.matcher {
            Matcher::Sentinel(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.matcher == Matcher::Fallback
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            code: self.code.clone(),
            message: self.message.clone(),
            status: self.status,
            matches: match &self.matcher {
                Matcher::Sentinel(s) => s.name().to_string(),
                Matcher::Cancelled => "<cancellation>".to_string(),
                Matcher::Timeout => "<timeout>".to_string(),
                Matcher::Fallback => "<fallback>".to_string(),
            },
        }
    }
}

/// Serializable view of an entry, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub code: String,
    pub message: String,
    pub status: u16,
    pub matches: String,
}

// ---------------------------------------------------------------------------
// CatalogBuilder
// ---------------------------------------------------------------------------

/// Assembles a [`Catalog`]. Starts with the standard cancellation, timeout
/// and fallback rows; each can be replaced.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    cancelled: ErrorCodeEntry,
    timeout: ErrorCodeEntry,
    fallback: ErrorCodeEntry,
    entries: Vec<ErrorCodeEntry>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            cancelled: ErrorCodeEntry::new(
                CANCELLED_CODE,
                "request cancelled",
                STATUS_CLIENT_CLOSED,
                Matcher::Cancelled,
            ),
            timeout: ErrorCodeEntry::new(TIMEOUT_CODE, "request timed out", 504, Matcher::Timeout),
            fallback: ErrorCodeEntry::new(
                FALLBACK_CODE,
                "internal server error",
                500,
                Matcher::Fallback,
            ),
            entries: Vec::new(),
        }
    }
}

impl CatalogBuilder {
    pub fn cancelled(mut self, code: &str, message: &str, status: u16) -> Self {
        self.cancelled = ErrorCodeEntry::new(code, message, status, Matcher::Cancelled);
        self
    }

    pub fn timeout(mut self, code: &str, message: &str, status: u16) -> Self {
        self.timeout = ErrorCodeEntry::new(code, message, status, Matcher::Timeout);
        self
    }

    pub fn fallback(mut self, code: &str, message: &str, status: u16) -> Self {
        self.fallback = ErrorCodeEntry::new(code, message, status, Matcher::Fallback);
        self
    }

    /// Append a row for `sentinel`. Rows keep their declaration order.
    pub fn entry(mut self, code: &str, message: &str, status: u16, sentinel: &Sentinel) -> Self {
        self.entries.push(ErrorCodeEntry::new(
            code,
            message,
            status,
            Matcher::Sentinel(sentinel.clone()),
        ));
        self
    }

    /// Validate against `registry` and freeze.
    ///
    /// Checks, in order: transport statuses, code uniqueness, that every
    /// mapped sentinel is registered and mapped once, and that every
    /// registered sentinel is mapped.
    pub fn build(self, registry: &SentinelRegistry) -> Result<Catalog> {
        let mut entries = Vec::with_capacity(self.entries.len() + 3);
        entries.push(self.cancelled);
        entries.push(self.timeout);
        entries.extend(self.entries);
        entries.push(self.fallback);

        for entry in &entries {
            if !(100..=599).contains(&entry.status) {
                return Err(CatalogError::InvalidStatus {
                    code: entry.code.clone(),
                    status: entry.status,
                });
            }
        }

        let mut codes = HashSet::new();
        for entry in &entries {
            if !codes.insert(entry.code.as_str()) {
                return Err(CatalogError::DuplicateCode(entry.code.clone()));
            }
        }

        let mut mapped: Vec<(&Sentinel, &str)> = Vec::new();
        for entry in &entries {
            let Some(sentinel) = entry.sentinel() else {
                continue;
            };
            if !registry.contains(sentinel) {
                return Err(CatalogError::UnregisteredSentinel {
                    code: entry.code.clone(),
                    sentinel: sentinel.name().to_string(),
                });
            }
            if let Some((_, first)) = mapped.iter().find(|(s, _)| *s == sentinel) {
                return Err(CatalogError::DuplicateMapping {
                    sentinel: sentinel.name().to_string(),
                    first: first.to_string(),
                    second: entry.code.clone(),
                });
            }
            mapped.push((sentinel, entry.code.as_str()));
        }

        if let Some(orphan) = registry
            .iter()
            .find(|s| !mapped.iter().any(|(m, _)| m == s))
        {
            return Err(CatalogError::UnmappedSentinel(orphan.name().to_string()));
        }

        tracing::debug!(entries = entries.len(), "error catalog built");
        Ok(Catalog { entries })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Frozen, ordered table of error codes.
///
/// Order is cancellation, timeout, sentinel rows as declared, fallback.
/// Only [`CatalogBuilder::build`] constructs one, so the three standard rows
/// are always present at those positions. Resolution lives in
/// [`crate::resolve`].
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ErrorCodeEntry>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorCodeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&ErrorCodeEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn entry_for(&self, sentinel: &Sentinel) -> Option<&ErrorCodeEntry> {
        self.entries
            .iter()
            .find(|e| e.sentinel() == Some(sentinel))
    }

    pub fn cancelled(&self) -> &ErrorCodeEntry {
        &self.entries[0]
    }

    pub fn timeout(&self) -> &ErrorCodeEntry {
        &self.entries[1]
    }

    pub fn fallback(&self) -> &ErrorCodeEntry {
        &self.entries[self.entries.len() - 1]
    }

    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries.iter().map(ErrorCodeEntry::summary).collect()
    }
}

pub mod catalog;
pub mod error;
pub mod mapper;
pub mod policy;
pub mod render;
pub mod resolve;
pub mod sentinel;
pub mod signal;
pub mod wrap;

pub use catalog::{Catalog, CatalogBuilder, EntrySummary, ErrorCodeEntry, Matcher};
pub use error::{CatalogError, PolicyError};
pub use mapper::ErrorMapper;
pub use policy::ResolverPolicy;
pub use render::{render, render_std, ResponsePayload};
pub use sentinel::{Sentinel, SentinelCause, SentinelRegistry};
pub use signal::{Cancelled, DeadlineExceeded};
pub use wrap::{contains_sentinel, tag, wrap, WrapExt};

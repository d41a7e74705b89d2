use crate::sentinel::{Sentinel, SentinelCause};

/// Context used when a caller wraps with an empty string.
pub const UNSPECIFIED_OPERATION: &str = "unspecified operation";

/// Attach `context` (the failing operation and its parameters, e.g.
/// `"get product 42"`) to `cause`.
///
/// The result is an `anyhow::Error` whose chain still yields `cause`, so
/// sentinels inside it keep matching. `{:#}` renders the whole chain as
/// `context: cause`.
pub fn wrap<E>(context: impl Into<String>, cause: E) -> anyhow::Error
where
    E: Into<anyhow::Error>,
{
    let context = context.into();
    let context = if context.trim().is_empty() {
        UNSPECIFIED_OPERATION.to_string()
    } else {
        context
    };
    cause.into().context(context)
}

/// Stack `sentinel` on top of an error that already has a cause of its own,
/// e.g. a storage error that means "product not found" to the caller.
///
/// Every tagged sentinel is its own chain link, so any number of tags stay
/// visible to [`contains_sentinel`] and `Catalog::resolve`. `{:#}` renders
/// as `sentinel message: cause`.
pub fn tag<E>(sentinel: &Sentinel, cause: E) -> anyhow::Error
where
    E: Into<anyhow::Error>,
{
    anyhow::Error::new(SentinelCause::new(sentinel.clone(), cause.into()))
}

/// `errors.Is` for sentinels: does any link of `err` carry `sentinel`?
pub fn contains_sentinel(err: &anyhow::Error, sentinel: &Sentinel) -> bool {
    err.chain().any(|link| sentinel.is(link))
}

/// [`wrap`] at `Result` call sites.
pub trait WrapExt<T> {
    fn wrap_err<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Into<String>;

    fn wrap_err_with<C, F>(self, context: F) -> anyhow::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;

    /// [`tag`] at `Result` call sites.
    fn tag(self, sentinel: &Sentinel) -> anyhow::Result<T>;
}

impl<T, E> WrapExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn wrap_err<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Into<String>,
    {
        self.map_err(|e| wrap(context, e))
    }

    fn wrap_err_with<C, F>(self, context: F) -> anyhow::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(context(), e))
    }

    fn tag(self, sentinel: &Sentinel) -> anyhow::Result<T> {
        self.map_err(|e| tag(sentinel, e))
    }
}

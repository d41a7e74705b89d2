use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use errmap_core::ErrorMapper;

// ---------------------------------------------------------------------------
// AppError — what handlers return on failure
// ---------------------------------------------------------------------------

/// Error type for route handlers.
///
/// `IntoResponse` has no access to application state, so the error is
/// parked in the response extensions and [`render_errors`] turns it into the
/// catalog response. Without that layer the client sees a bare 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

/// Response extension carrying an unrendered handler error.
#[derive(Debug, Clone)]
struct ParkedError(Arc<anyhow::Error>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(ParkedError(Arc::new(self.0)));
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Middleware that replaces a parked [`AppError`] with the rendered catalog
/// response. Other responses pass through untouched.
pub async fn render_errors(
    State(mapper): State<Arc<ErrorMapper>>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    let parked = response.extensions().get::<ParkedError>().cloned();
    match parked {
        Some(ParkedError(err)) => error_response(&mapper, &err),
        None => response,
    }
}

/// Resolve and render `err` into an HTTP response.
pub fn error_response(mapper: &ErrorMapper, err: &anyhow::Error) -> Response {
    let payload = mapper.respond(err);
    let status = StatusCode::from_u16(payload.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::bootstrap;
    use errmap_core::{wrap, Cancelled, ResolverPolicy};

    fn mapper(policy: ResolverPolicy) -> (ErrorMapper, crate::products::ProductErrors) {
        let (errors, catalog) = bootstrap().unwrap();
        (ErrorMapper::new(catalog, policy), errors)
    }

    #[test]
    fn app_error_parks_itself() {
        let err = AppError(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ParkedError>().is_some());
    }

    #[test]
    fn not_found_renders_404() {
        let (mapper, errors) = mapper(ResolverPolicy::default());
        let err = wrap("get product 123", errors.not_found);
        let response = error_response(&mapper, &err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_sku_renders_409() {
        let (mapper, errors) = mapper(ResolverPolicy::default());
        let err = wrap("create product SKU ABC", errors.duplicate_sku);
        assert_eq!(error_response(&mapper, &err).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_renders_400() {
        let (mapper, errors) = mapper(ResolverPolicy::default());
        for sentinel in [
            errors.name_required,
            errors.sku_required,
            errors.invalid_price,
            errors.invalid_quantity,
            errors.malformed_body,
        ] {
            let err = wrap("create product", sentinel);
            assert_eq!(error_response(&mapper, &err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn cancellation_renders_499() {
        let (mapper, errors) = mapper(ResolverPolicy::default());
        let err = wrap("handler", anyhow::Error::new(errors.not_found).context(Cancelled));
        assert_eq!(error_response(&mapper, &err).status().as_u16(), 499);
    }

    #[test]
    fn foreign_error_renders_500() {
        let (mapper, _errors) = mapper(ResolverPolicy::default());
        let err = wrap("flush", std::io::Error::other("disk full"));
        assert_eq!(
            error_response(&mapper, &err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_is_json() {
        let (mapper, errors) = mapper(ResolverPolicy::default());
        let err = wrap("get product 1", errors.not_found);
        let response = error_response(&mapper, &err);
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(
            ct.to_str().unwrap().contains("application/json"),
            "expected JSON content type, got {:?}",
            ct
        );
    }
}

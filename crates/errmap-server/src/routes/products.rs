use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use errmap_core::wrap;

use crate::error::AppError;
use crate::products::{NewProduct, Product};
use crate::state::AppState;

/// Non-numeric ids cannot exist, so they are reported as not found.
fn parse_id(app: &AppState, raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>().map_err(|e| {
        let cause = wrap(e.to_string(), app.products.errors().not_found.clone());
        AppError(wrap(format!("parse product id '{raw}'"), cause))
    })
}

fn body<T>(app: &AppState, payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        let cause = wrap(rejection.body_text(), app.products.errors().malformed_body.clone());
        AppError(wrap("decode request body", cause))
    })
}

/// GET /api/products — list all products.
pub async fn list_products(State(app): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = app
        .with_deadline("list products", async { Ok(app.products.list().await) })
        .await?;
    Ok(Json(products))
}

/// GET /api/products/:id — one product.
pub async fn get_product(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&app, &id)?;
    let product = app
        .with_deadline("get product", app.products.get(id))
        .await?;
    Ok(Json(product))
}

/// POST /api/products — create a product.
pub async fn create_product(
    State(app): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let new = body(&app, payload)?;
    let product = app
        .with_deadline("create product", app.products.create(new))
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /api/products/:id — remove a product.
pub async fn delete_product(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&app, &id)?;
    app.with_deadline("delete product", app.products.delete(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
pub struct ReserveBody {
    pub quantity: u32,
}

/// POST /api/products/:id/reserve — take units out of stock.
pub async fn reserve_product(
    State(app): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReserveBody>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&app, &id)?;
    let ReserveBody { quantity } = body(&app, payload)?;
    let product = app
        .with_deadline("reserve product", app.products.reserve(id, quantity))
        .await?;
    Ok(Json(product))
}

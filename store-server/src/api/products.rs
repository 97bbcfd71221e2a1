//! Catalog endpoints
//!
//! Reads are public; creation requires admin/seller; edits and deletes
//! require the owning seller or an admin.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;

use crate::auth::middleware::{Identity, require_admin_or_seller};
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/products — latest arrivals
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = db::products::list_latest(&state.pool, 12).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product = db::products::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ProductCreate>,
) -> ApiResult<Product> {
    require_admin_or_seller(&identity)?;

    if req.name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty").into());
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).into());
    }
    let qty = req.qty.unwrap_or(0);
    if qty < 0 {
        return Err(AppError::validation("Quantity must be non-negative").into());
    }

    let now = now_millis();
    let product = Product {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: identity.user_id.clone(),
        name: req.name.trim().to_string(),
        brand: req.brand,
        category: req.category,
        description: req.description,
        images: req.images.unwrap_or_default(),
        price: req.price,
        qty,
        in_stock: qty > 0,
        total_sales: 0,
        created_at: now,
        updated_at: now,
    };
    db::products::insert(&state.pool, &product).await?;

    tracing::info!(product_id = %product.id, owner_id = %product.owner_id, "Product created");

    Ok(Json(product))
}

/// Owner-or-admin check shared by update/delete
fn authorize_owner(product: &Product, identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin || product.owner_id == identity.user_id {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Not authorized to modify this product",
        ))
    }
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<ProductUpdate>,
) -> ApiResult<Product> {
    let product = db::products::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    authorize_owner(&product, &identity)?;

    if let Some(price) = req.price {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::new(ErrorCode::ProductInvalidPrice).into());
        }
    }
    if let Some(qty) = req.qty {
        if qty < 0 {
            return Err(AppError::validation("Quantity must be non-negative").into());
        }
    }

    let updated = db::products::update(&state.pool, &id, &req, now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    tracing::info!(product_id = %id, "Product updated");

    Ok(Json(updated))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let product = db::products::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    authorize_owner(&product, &identity)?;

    db::products::delete(&state.pool, &id).await?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(json!({ "message": "Product has been deleted" })))
}

//! HTTP handlers for the products module.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use productapp_http::AppError;
use productapp_kernel::settings::DecimalSeparator;

use super::models::{Product, ProductForm};
use super::store::{ProductStore, StoreError};

#[derive(Clone)]
pub struct ProductsState {
    pub store: ProductStore,
    pub separator: DecimalSeparator,
}

pub fn router(state: ProductsState) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).post(update_product).delete(delete_product),
        )
        .route("/{id}/delete", post(delete_product))
        .with_state(state)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found("product not found"),
            StoreError::Rejected { reason } => AppError::validation(
                vec![serde_json::json!({ "error": reason })],
                "An error occurred while saving the product",
            ),
            fatal @ (StoreError::Conflict { .. } | StoreError::Unavailable(_)) => {
                AppError::Internal(anyhow::Error::new(fatal))
            }
        }
    }
}

/// Path ids that do not parse are treated as unset rather than as a bad request
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn invalid_form(errors: Vec<super::models::FieldError>) -> AppError {
    let details = errors
        .into_iter()
        .map(|e| serde_json::json!({ "field": e.field, "error": e.error }))
        .collect();
    AppError::validation(details, "product is invalid")
}

async fn list_products(State(state): State<ProductsState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.store.list().await?))
}

async fn get_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.store.get(parse_id(&id)).await?))
}

async fn create_product(
    State(state): State<ProductsState>,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form?;
    let draft = form.validate(state.separator).map_err(invalid_form)?;
    let product = state.store.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/products/{}", product.id))],
        Json(product),
    ))
}

async fn update_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<Json<Product>, AppError> {
    let Form(form) = form?;
    let id = parse_id(&id).ok_or(StoreError::NotFound)?;
    // A form for another product is never merged into this one
    let form_id = form.id.unwrap_or_default();
    if form_id != id {
        return Err(StoreError::NotFound.into());
    }

    let draft = form.validate(state.separator).map_err(invalid_form)?;
    let product = Product::from_draft(form_id, draft);
    Ok(Json(state.store.update(id, &product).await?))
}

async fn delete_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id).ok_or(StoreError::NotFound)?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

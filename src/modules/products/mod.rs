pub mod models;
pub mod routes;
pub mod sqlite;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use productapp_kernel::settings::Settings;
use productapp_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use routes::ProductsState;
use sqlite::SqliteProductRepository;
use store::ProductStore;

/// Products module: CRUD over the `products` table
pub struct ProductsModule {
    state: ProductsState,
}

impl ProductsModule {
    pub fn new(store: ProductStore, settings: &Settings) -> Self {
        Self {
            state: ProductsState {
                store,
                separator: settings.products.decimal_separator,
            },
        }
    }
}

#[async_trait]
impl Module for ProductsModule {
    fn name(&self) -> &'static str {
        "products"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            decimal_separator = ?self.state.separator,
            "products module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let form = serde_json::json!({
            "application/x-www-form-urlencoded": {
                "schema": { "$ref": "#/components/schemas/ProductForm" }
            }
        });
        let product = serde_json::json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Product" }
            }
        });
        let error = serde_json::json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        });
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List products",
                        "tags": ["Products"],
                        "responses": {
                            "200": {
                                "description": "Every product, ascending by id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Product" }
                                        }
                                    }
                                }
                            },
                            "500": { "description": "Store unavailable", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create a product",
                        "tags": ["Products"],
                        "requestBody": { "required": true, "content": form },
                        "responses": {
                            "201": { "description": "Created", "content": product },
                            "422": { "description": "Invalid form or rejected write", "content": error }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a product",
                        "tags": ["Products"],
                        "parameters": id_param,
                        "responses": {
                            "200": { "description": "The product", "content": product },
                            "404": { "description": "Product not found", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Edit a product",
                        "tags": ["Products"],
                        "parameters": id_param,
                        "requestBody": { "required": true, "content": form },
                        "responses": {
                            "200": { "description": "Updated product", "content": product },
                            "404": { "description": "Product not found or form id mismatch", "content": error },
                            "422": { "description": "Invalid form or rejected write", "content": error },
                            "500": { "description": "Concurrent modification", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete a product",
                        "tags": ["Products"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Deleted, or already absent" }
                        }
                    }
                },
                "/{id}/delete": {
                    "post": {
                        "summary": "Delete a product (form post)",
                        "tags": ["Products"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Deleted, or already absent" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Product": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Store-assigned identifier"
                            },
                            "name": { "type": "string" },
                            "price": {
                                "type": "string",
                                "description": "Decimal amount, e.g. \"9.99\""
                            },
                            "description": { "type": "string" }
                        },
                        "required": ["id", "name", "price", "description"]
                    },
                    "ProductForm": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Must match the path id when editing"
                            },
                            "name": { "type": "string" },
                            "price": {
                                "type": "string",
                                "description": "Parsed with the configured decimal separator"
                            },
                            "description": { "type": "string" }
                        },
                        "required": ["name", "price", "description"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: sqlite::CREATE_PRODUCTS_TABLE,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module stopped");
        Ok(())
    }
}

/// Create the products module backed by the shared SQLite pool
pub fn create_module(pool: SqlitePool, settings: &Settings) -> Arc<dyn Module> {
    let store = ProductStore::new(Arc::new(SqliteProductRepository::new(pool)));
    Arc::new(ProductsModule::new(store, settings))
}

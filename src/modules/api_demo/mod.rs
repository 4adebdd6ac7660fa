pub mod models;
pub mod proxy;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::FormRejection, State},
    routing::{get, post},
    Form, Json, Router,
};
use productapp_http::AppError;
use productapp_kernel::settings::Settings;
use productapp_kernel::{InitCtx, Module};
use serde_json::json;

use models::{ApiResult, PostData};
use proxy::{ExternalApiProxy, ReqwestFetcher};

/// API demo module: one GET and one POST against the remote REST API
pub struct ApiDemoModule {
    proxy: ExternalApiProxy,
    base_url: String,
}

impl ApiDemoModule {
    pub fn new(proxy: ExternalApiProxy, base_url: impl Into<String>) -> Self {
        Self {
            proxy,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Module for ApiDemoModule {
    fn name(&self) -> &'static str {
        "api-demo"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            remote = %self.base_url,
            "api-demo module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/posts/sample", get(fetch_sample))
            .route("/posts", post(submit_post))
            .with_state(self.proxy.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let result = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ApiResult" }
            }
        });

        Some(json!({
            "paths": {
                "/posts/sample": {
                    "get": {
                        "summary": "Fetch a sample post from the remote API",
                        "tags": ["ApiDemo"],
                        "responses": {
                            "200": {
                                "description": "Remote body, or a rendered error when succeeded is false",
                                "content": result
                            }
                        }
                    }
                },
                "/posts": {
                    "post": {
                        "summary": "Submit a post to the remote API",
                        "tags": ["ApiDemo"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/PostData" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Remote echo, or a rendered error when succeeded is false",
                                "content": result
                            },
                            "422": {
                                "description": "Blank title or body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "PostData": {
                        "type": "object",
                        "properties": {
                            "userId": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "body": { "type": "string" }
                        },
                        "required": ["userId", "title", "body"]
                    },
                    "ApiResult": {
                        "type": "object",
                        "properties": {
                            "method": { "type": "string", "enum": ["GET", "POST"] },
                            "response": {
                                "type": "string",
                                "description": "Raw remote body, or an error message"
                            },
                            "succeeded": { "type": "boolean" }
                        },
                        "required": ["method", "response", "succeeded"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "api-demo module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "api-demo module stopped");
        Ok(())
    }
}

/// Fetch the sample post; remote failures come back as a rendered message
async fn fetch_sample(State(proxy): State<ExternalApiProxy>) -> Json<ApiResult> {
    Json(proxy.fetch_sample().await)
}

/// Submit a post; only a blank form is refused locally
async fn submit_post(
    State(proxy): State<ExternalApiProxy>,
    post: Result<Form<PostData>, FormRejection>,
) -> Result<Json<ApiResult>, AppError> {
    let Form(post) = post?;
    let missing = post.missing_fields();
    if !missing.is_empty() {
        let details = missing
            .into_iter()
            .map(|field| json!({ "field": field, "error": "required" }))
            .collect();
        return Err(AppError::validation(details, "post is invalid"));
    }

    Ok(Json(proxy.submit(&post).await))
}

/// Create the api-demo module talking to `settings.remote_api.base_url`
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    let base_url = settings.remote_api.base_url.clone();
    let fetcher = ReqwestFetcher::new(&base_url)?;
    let proxy = ExternalApiProxy::new(Arc::new(fetcher));
    Ok(Arc::new(ApiDemoModule::new(proxy, base_url)))
}

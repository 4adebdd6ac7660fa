//! Wiring of the pool, the module registry and the HTTP server.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use productapp_db::DatabaseModule;
use productapp_kernel::settings::Settings;
use productapp_kernel::{InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// A fully registered application, ready to migrate and serve.
pub struct Application {
    settings: Settings,
    pool: SqlitePool,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect to the configured database and register every module
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let pool = productapp_db::connect(&settings.database).await?;
        Self::with_pool(settings, pool)
    }

    /// Register every module against an already opened pool
    pub fn with_pool(settings: Settings, pool: SqlitePool) -> anyhow::Result<Self> {
        let mut registry = ModuleRegistry::new();
        registry.register_core(Arc::new(DatabaseModule::new(pool.clone())));
        modules::register_all(&mut registry, &pool, &settings)
            .context("failed to register modules")?;

        tracing::info!(
            core = registry.core_module_count(),
            custom = registry.custom_module_count(),
            "modules registered"
        );

        Ok(Self {
            settings,
            pool,
            registry,
        })
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Apply pending module migrations, returning how many ran
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = productapp_db::run_migrations(&self.pool, &migrations)
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    /// Initialize then start core and custom modules
    pub async fn start(&self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_core_modules(&ctx).await?;
        self.registry.init_custom_modules(&ctx).await?;
        self.registry.start_core_modules(&ctx).await?;
        self.registry.start_custom_modules(&ctx).await?;
        Ok(())
    }

    /// Stop custom modules, then core modules
    pub async fn stop(&self) -> anyhow::Result<()> {
        self.registry.stop_custom_modules().await?;
        self.registry.stop_core_modules().await?;
        Ok(())
    }

    /// The complete HTTP router with every module mounted
    pub fn router(&self) -> Router {
        productapp_http::build_router(&self.registry, &self.settings)
    }

    /// Migrate, start, serve until `shutdown` resolves, then stop every module
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.migrate().await?;
        self.start().await?;

        let served = productapp_http::start_server(&self.registry, &self.settings, shutdown).await;
        let stopped = self.stop().await;

        served?;
        stopped
    }
}

pub mod api_demo;
pub mod products;

use productapp_kernel::settings::Settings;
use productapp_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    pool: &SqlitePool,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register_custom(products::create_module(pool.clone(), settings));
    registry.register_custom(api_demo::create_module(settings)?);
    Ok(())
}

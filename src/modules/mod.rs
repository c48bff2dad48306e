pub mod books;
pub mod demo;

use shelf_kernel::ModuleRegistry;

use books::handlers::SharedStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) -> anyhow::Result<()> {
    registry.register(books::create_module(store))?;
    registry.register(demo::create_module())?;
    Ok(())
}

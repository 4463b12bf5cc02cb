mod entity;
mod provider;

pub use entity::{Catalog, Entity, EntityKey};
pub use provider::CatalogProvider;

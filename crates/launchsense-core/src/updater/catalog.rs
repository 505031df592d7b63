//! Read-only app catalog sources.

use crate::model::App;

/// Supplies the installed-app catalog to the updater.
///
/// Called once per regeneration; implementations should return a cheap
/// snapshot rather than doing I/O.
pub trait CatalogProvider: Send + Sync {
    fn apps(&self) -> Vec<App>;
}

/// A fixed catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticCatalog {
    apps: Vec<App>,
}

impl StaticCatalog {
    pub fn new(apps: Vec<App>) -> Self {
        Self { apps }
    }
}

impl CatalogProvider for StaticCatalog {
    fn apps(&self) -> Vec<App> {
        self.apps.clone()
    }
}

impl CatalogProvider for Vec<App> {
    fn apps(&self) -> Vec<App> {
        self.clone()
    }
}

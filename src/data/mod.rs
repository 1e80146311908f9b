mod catalog;
mod load;
mod record;

pub use catalog::{CategoryStats, Horizon, SiteCatalog};
pub use load::load_site_catalog;
pub use record::SiteEntry;

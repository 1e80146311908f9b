use std::path::Path;

use anyhow::{Context, Result};

use super::catalog::{Horizon, SiteCatalog};
use super::record::RawSiteRecord;

/// Reads the site dataset from CSV and keeps the rows that carry a category
/// and a last-seen capture date. Rows that fail to deserialize are dropped
/// rather than aborting the load.
pub fn load_site_catalog(path: &Path, horizon: Horizon) -> Result<SiteCatalog> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut sites = Vec::new();
    for record in reader.deserialize::<RawSiteRecord>() {
        let Ok(record) = record else {
            continue;
        };
        if let Some(entry) = record.validate(&horizon) {
            sites.push(entry);
        }
    }

    Ok(SiteCatalog::new(horizon, sites))
}

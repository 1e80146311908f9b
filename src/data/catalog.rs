use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};

use super::record::SiteEntry;

/// Fixed calendar range mapped to integer month indices, with month 0 being
/// January of `start_year`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Horizon {
    pub start_year: i32,
    pub months: u32,
}

impl Horizon {
    pub fn from_years(start_year: i32, end_year: i32) -> Self {
        let years = (end_year - start_year + 1).max(1) as u32;
        Self {
            start_year,
            months: years * 12,
        }
    }

    pub fn last_month(&self) -> u32 {
        self.months.saturating_sub(1)
    }

    /// Month index for a `YYYY-MM-DD` date string. Dates before the horizon
    /// start saturate to month 0; dates past the horizon end and unparseable
    /// strings map to `None`.
    pub fn parse_month(&self, raw: &str) -> Option<u32> {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        self.month_index(date)
    }

    pub fn month_index(&self, date: NaiveDate) -> Option<u32> {
        let index = (date.year() - self.start_year) * 12 + date.month0() as i32;
        if index >= self.months as i32 {
            return None;
        }
        Some(index.max(0) as u32)
    }
}

#[derive(Clone, Debug)]
pub struct SiteCatalog {
    pub horizon: Horizon,
    pub sites: Vec<SiteEntry>,
    pub categories: Vec<String>,
    pub sub_types_by_category: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Clone, Debug)]
pub struct CategoryStats {
    pub site_count: usize,
    pub top_sub_type: String,
    pub average_lifespan_years: Option<f64>,
    pub earliest_loss_year: i32,
    pub latest_loss_year: i32,
    pub peak_loss_year: Option<(i32, usize)>,
}

impl SiteCatalog {
    pub fn new(horizon: Horizon, sites: Vec<SiteEntry>) -> Self {
        let mut sub_types_by_category: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for site in &sites {
            sub_types_by_category
                .entry(site.category.clone())
                .or_default()
                .insert(site.sub_type.clone());
        }
        let categories = sub_types_by_category.keys().cloned().collect();

        Self {
            horizon,
            sites,
            categories,
            sub_types_by_category,
        }
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn category_stats(&self, category: &str) -> Option<CategoryStats> {
        let sites = self
            .sites
            .iter()
            .filter(|site| site.category == category)
            .collect::<Vec<_>>();
        if sites.is_empty() {
            return None;
        }

        let mut sub_type_counts: HashMap<&str, usize> = HashMap::new();
        for site in &sites {
            *sub_type_counts.entry(site.sub_type.as_str()).or_default() += 1;
        }
        let top_sub_type = sub_type_counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(sub_type, _)| sub_type.to_owned())
            .unwrap_or_else(|| "Unknown".to_owned());

        let lifespans = sites
            .iter()
            .filter_map(|site| match (site.first_seen_month, site.last_seen_month) {
                (Some(first), Some(last)) if last >= first => Some((last - first) as f64 / 12.0),
                _ => None,
            })
            .collect::<Vec<_>>();
        let average_lifespan_years = if lifespans.is_empty() {
            None
        } else {
            Some(lifespans.iter().sum::<f64>() / lifespans.len() as f64)
        };

        let loss_years = sites
            .iter()
            .filter_map(|site| site.last_seen_month)
            .map(|month| self.horizon.start_year + (month / 12) as i32)
            .collect::<Vec<_>>();
        let earliest_loss_year = loss_years.iter().copied().min()?;
        let latest_loss_year = loss_years.iter().copied().max()?;

        let mut counts_by_year: HashMap<i32, usize> = HashMap::new();
        for year in &loss_years {
            *counts_by_year.entry(*year).or_default() += 1;
        }
        let peak_loss_year = counts_by_year
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

        Some(CategoryStats {
            site_count: sites.len(),
            top_sub_type,
            average_lifespan_years,
            earliest_loss_year,
            latest_loss_year,
            peak_loss_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, sub_type: &str, first: Option<u32>, last: Option<u32>) -> SiteEntry {
        SiteEntry {
            id: format!("{category}-{sub_type}"),
            title: String::new(),
            category: category.to_owned(),
            sub_type: sub_type.to_owned(),
            first_seen_month: first,
            last_seen_month: last,
        }
    }

    #[test]
    fn horizon_month_indices() {
        let horizon = Horizon::from_years(1996, 2024);
        assert_eq!(horizon.months, 348);
        assert_eq!(horizon.parse_month("1996-01-15"), Some(0));
        assert_eq!(horizon.parse_month("1996-12-31"), Some(11));
        assert_eq!(horizon.parse_month("2024-12-01"), Some(347));
        // Before the horizon start saturates to month 0.
        assert_eq!(horizon.parse_month("1990-06-01"), Some(0));
        // Past the horizon end never qualifies.
        assert_eq!(horizon.parse_month("2025-01-01"), None);
        assert_eq!(horizon.parse_month("not-a-date"), None);
        assert_eq!(horizon.parse_month(""), None);
    }

    #[test]
    fn catalog_groups_sub_types_per_category() {
        let horizon = Horizon::from_years(1996, 2024);
        let catalog = SiteCatalog::new(
            horizon,
            vec![
                entry("Music", "Label", Some(0), Some(24)),
                entry("Music", "Fan page", Some(0), Some(36)),
                entry("News", "Zine", Some(12), Some(36)),
            ],
        );

        assert_eq!(catalog.categories, vec!["Music", "News"]);
        let music = catalog.sub_types_by_category.get("Music").unwrap();
        assert_eq!(music.len(), 2);
    }

    #[test]
    fn category_stats_summarize_losses() {
        let horizon = Horizon::from_years(1996, 2024);
        let catalog = SiteCatalog::new(
            horizon,
            vec![
                entry("Music", "Label", Some(0), Some(24)),
                entry("Music", "Label", Some(0), Some(26)),
                entry("Music", "Fan page", Some(0), Some(120)),
            ],
        );

        let stats = catalog.category_stats("Music").unwrap();
        assert_eq!(stats.site_count, 3);
        assert_eq!(stats.top_sub_type, "Label");
        assert_eq!(stats.earliest_loss_year, 1998);
        assert_eq!(stats.latest_loss_year, 2006);
        assert_eq!(stats.peak_loss_year, Some((1998, 2)));
        let lifespan = stats.average_lifespan_years.unwrap();
        assert!((lifespan - (24.0 + 26.0 + 120.0) / 3.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn category_stats_absent_for_unknown_category() {
        let horizon = Horizon::from_years(1996, 2024);
        let catalog = SiteCatalog::new(horizon, Vec::new());
        assert!(catalog.category_stats("Music").is_none());
    }
}

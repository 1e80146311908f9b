use serde::Deserialize;

use super::catalog::Horizon;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawSiteRecord {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default, rename = "Grouped_Category")]
    pub(super) category: String,
    #[serde(default, rename = "type2")]
    pub(super) sub_type: String,
    #[serde(default, rename = "First_Live_Capture")]
    pub(super) first_live_capture: String,
    #[serde(default, rename = "Last_Live_Capture")]
    pub(super) last_live_capture: String,
}

#[derive(Clone, Debug)]
pub struct SiteEntry {
    pub id: String,
    pub title: String,
    pub category: String,
    pub sub_type: String,
    pub first_seen_month: Option<u32>,
    pub last_seen_month: Option<u32>,
}

impl RawSiteRecord {
    /// A record qualifies only when it carries a category and a last-seen
    /// date field; everything else degrades to `None` months.
    pub(super) fn validate(self, horizon: &Horizon) -> Option<SiteEntry> {
        let category = self.category.trim();
        let last_capture = self.last_live_capture.trim();
        if category.is_empty() || last_capture.is_empty() {
            return None;
        }

        let sub_type = self.sub_type.trim();
        let sub_type = if sub_type.is_empty() {
            "Unknown".to_owned()
        } else {
            sub_type.to_owned()
        };

        let title = if self.title.trim().is_empty() {
            self.id.clone()
        } else {
            self.title.trim().to_owned()
        };

        Some(SiteEntry {
            id: self.id,
            title,
            category: category.to_owned(),
            sub_type,
            first_seen_month: horizon.parse_month(self.first_live_capture.trim()),
            last_seen_month: horizon.parse_month(last_capture),
        })
    }
}

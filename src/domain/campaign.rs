use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignCategory {
    Image,
    Text,
    Audio,
    Video,
    Tabular,
}

impl fmt::Display for CampaignCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CampaignCategory::Image => "image",
            CampaignCategory::Text => "text",
            CampaignCategory::Audio => "audio",
            CampaignCategory::Video => "video",
            CampaignCategory::Tabular => "tabular",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Closed,
}

/// A data-collection campaign shown in the listing. Display-only mock data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub submissions_count: u32,
    pub required_submissions: u32,
    pub category: CampaignCategory,
    #[serde(default = "default_status")]
    pub status: CampaignStatus,
}

fn default_status() -> CampaignStatus {
    CampaignStatus::Active
}

impl Campaign {
    /// Share of required submissions already collected, capped at 100.
    pub fn progress_percent(&self) -> u8 {
        if self.required_submissions == 0 {
            return 100;
        }
        let pct = u64::from(self.submissions_count) * 100 / u64::from(self.required_submissions);
        pct.min(100) as u8
    }

    pub fn is_open_on(&self, day: NaiveDate) -> bool {
        self.status == CampaignStatus::Active && day <= self.deadline
    }
}

pub fn active_campaigns(campaigns: &[Campaign]) -> Vec<&Campaign> {
    campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .collect()
}

pub fn default_campaigns() -> Vec<Campaign> {
    let campaign = |id, title: &str, description: &str, deadline, done, required, category| Campaign {
        id,
        title: title.to_string(),
        description: description.to_string(),
        deadline,
        submissions_count: done,
        required_submissions: required,
        category,
        status: CampaignStatus::Active,
    };
    vec![
        campaign(
            1,
            "Image Classification Dataset",
            "Collect labeled images for ML model training",
            date(2025, 3, 15),
            45,
            100,
            CampaignCategory::Image,
        ),
        campaign(
            2,
            "Text Sentiment Analysis",
            "Gather sentiment-labeled text samples",
            date(2025, 3, 20),
            120,
            200,
            CampaignCategory::Text,
        ),
        campaign(
            3,
            "Voice Command Dataset",
            "Record voice commands for AI assistant",
            date(2025, 3, 25),
            30,
            150,
            CampaignCategory::Audio,
        ),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

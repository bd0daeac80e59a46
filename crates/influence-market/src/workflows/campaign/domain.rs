use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignKind {
    SingleInfluencer,
    OpenPool,
}

impl CampaignKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleInfluencer => "Single influencer",
            Self::OpenPool => "Open pool",
        }
    }
}

impl Default for CampaignKind {
    fn default() -> Self {
        Self::SingleInfluencer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Instagram,
    #[serde(rename = "YOUTUBE")]
    YouTube,
    #[serde(rename = "TIKTOK")]
    TikTok,
}

impl Platform {
    pub const fn ordered() -> [Self; 3] {
        [Self::Instagram, Self::YouTube, Self::TikTok]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::YouTube => "YouTube",
            Self::TikTok => "TikTok",
        }
    }

    /// Content types offered on this platform, in display order.
    pub fn content_types(self) -> Vec<ContentType> {
        ContentType::ordered()
            .into_iter()
            .filter(|content_type| content_type.platform() == self)
            .collect()
    }

    pub fn offers(self, content_type: ContentType) -> bool {
        content_type.platform() == self
    }
}

/// Deliverable format. Every content type belongs to exactly one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Feed,
    Story,
    Reels,
    Video,
    Shorts,
    CommunityPost,
    Clip,
    Live,
}

impl ContentType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Feed,
            Self::Story,
            Self::Reels,
            Self::Video,
            Self::Shorts,
            Self::CommunityPost,
            Self::Clip,
            Self::Live,
        ]
    }

    pub const fn platform(self) -> Platform {
        match self {
            Self::Feed | Self::Story | Self::Reels => Platform::Instagram,
            Self::Video | Self::Shorts | Self::CommunityPost => Platform::YouTube,
            Self::Clip | Self::Live => Platform::TikTok,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Feed => "Feed post",
            Self::Story => "Story",
            Self::Reels => "Reels",
            Self::Video => "Video",
            Self::Shorts => "Shorts",
            Self::CommunityPost => "Community post",
            Self::Clip => "Clip",
            Self::Live => "Live",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfluencerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(pub String);

/// Identity and display metrics for an influencer picked in the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluencerSummary {
    pub id: InfluencerId,
    pub display_name: String,
    /// Follower/subscriber count; `None` when the profile has not reported it.
    #[serde(default)]
    pub reach: Option<u64>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Reference to a payment instrument registered outside the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRef {
    pub id: PaymentMethodId,
    pub brand: String,
    pub last4: String,
}

impl PaymentMethodRef {
    pub fn display(&self) -> String {
        format!("{} ending in {}", self.brand, self.last4)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignContent {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Monetary amount held in minor units (cents).
///
/// On the wire the amount is a decimal number of major units, e.g. `1500.25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> u64 {
        self.cents
    }

    pub fn as_major(self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        if !major.is_finite() || major < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "amount must be a non-negative number, got {major}"
            )));
        }
        Ok(Self::from_cents((major * 100.0).round() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_content_type_has_one_owning_platform() {
        let mut seen = Vec::new();
        for platform in Platform::ordered() {
            let offered = platform.content_types();
            assert!(!offered.is_empty(), "{} offers nothing", platform.label());
            for content_type in offered {
                assert!(!seen.contains(&content_type));
                seen.push(content_type);
            }
        }
        assert_eq!(seen.len(), ContentType::ordered().len());
    }

    #[test]
    fn wire_names_match_backend_enums() {
        assert_eq!(
            serde_json::to_value(Platform::YouTube).expect("serializes"),
            "YOUTUBE"
        );
        assert_eq!(
            serde_json::to_value(ContentType::CommunityPost).expect("serializes"),
            "COMMUNITY_POST"
        );
        assert_eq!(
            serde_json::to_value(CampaignKind::OpenPool).expect("serializes"),
            "OPEN_POOL"
        );
    }

    #[test]
    fn money_formats_major_units() {
        let amount = Money::from_cents(150_005);
        assert_eq!(amount.to_string(), "$1500.05");
        assert_eq!(
            serde_json::to_value(amount).expect("serializes"),
            serde_json::json!(1500.05)
        );
        let parsed: Money = serde_json::from_value(serde_json::json!(12.5)).expect("parses");
        assert_eq!(parsed.cents(), 1250);
    }
}

use super::domain::{ContentType, Platform};
use serde::Serialize;

/// Multiplier expressed in basis points; `10_000` is the 1.0x baseline.
pub const BASELINE_MULTIPLIER_BPS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateCard {
    pub content_type: ContentType,
    pub multiplier_bps: u32,
}

/// Pricing coefficients for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformRates {
    pub platform: Platform,
    /// Price in cents per thousand reach for baseline content.
    pub base_cpm_cents: u64,
    pub cards: &'static [RateCard],
}

const INSTAGRAM_CARDS: [RateCard; 3] = [
    RateCard {
        content_type: ContentType::Feed,
        multiplier_bps: BASELINE_MULTIPLIER_BPS,
    },
    RateCard {
        content_type: ContentType::Story,
        multiplier_bps: 7_000,
    },
    RateCard {
        content_type: ContentType::Reels,
        multiplier_bps: 15_000,
    },
];

const YOUTUBE_CARDS: [RateCard; 3] = [
    RateCard {
        content_type: ContentType::Video,
        multiplier_bps: BASELINE_MULTIPLIER_BPS,
    },
    RateCard {
        content_type: ContentType::Shorts,
        multiplier_bps: 6_000,
    },
    RateCard {
        content_type: ContentType::CommunityPost,
        multiplier_bps: 4_000,
    },
];

const TIKTOK_CARDS: [RateCard; 2] = [
    RateCard {
        content_type: ContentType::Clip,
        multiplier_bps: BASELINE_MULTIPLIER_BPS,
    },
    RateCard {
        content_type: ContentType::Live,
        multiplier_bps: 14_000,
    },
];

const STANDARD_RATES: [PlatformRates; 3] = [
    PlatformRates {
        platform: Platform::Instagram,
        base_cpm_cents: 1_000,
        cards: &INSTAGRAM_CARDS,
    },
    PlatformRates {
        platform: Platform::YouTube,
        base_cpm_cents: 2_000,
        cards: &YOUTUBE_CARDS,
    },
    PlatformRates {
        platform: Platform::TikTok,
        base_cpm_cents: 800,
        cards: &TIKTOK_CARDS,
    },
];

/// Static per-platform, per-content-type rate table.
#[derive(Debug, Clone, Copy)]
pub struct RateTable {
    platforms: &'static [PlatformRates],
}

impl RateTable {
    pub const fn standard() -> Self {
        Self {
            platforms: &STANDARD_RATES,
        }
    }

    pub fn platforms(&self) -> &'static [PlatformRates] {
        self.platforms
    }

    pub fn for_platform(&self, platform: Platform) -> Option<&'static PlatformRates> {
        self.platforms.iter().find(|rates| rates.platform == platform)
    }

    /// Base CPM and multiplier for a content type on its owning platform.
    pub fn lookup(&self, content_type: ContentType) -> Option<(u64, u32)> {
        let rates = self.for_platform(content_type.platform())?;
        rates
            .cards
            .iter()
            .find(|card| card.content_type == content_type)
            .map(|card| (rates.base_cpm_cents, card.multiplier_bps))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

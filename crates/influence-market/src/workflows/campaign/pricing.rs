use super::domain::{ContentType, InfluencerSummary, Money};
use super::rates::{RateTable, BASELINE_MULTIPLIER_BPS};
use serde::Serialize;

const REACH_PER_CPM: u128 = 1_000;

/// Outcome of pricing a (influencer, content type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Quote {
    Priced {
        amount: Money,
        base_cpm_cents: u64,
        multiplier_bps: u32,
    },
    /// Inputs were incomplete; callers may price speculatively and get this back.
    Unpriced,
}

impl Quote {
    pub fn amount(&self) -> Option<Money> {
        match self {
            Quote::Priced { amount, .. } => Some(*amount),
            Quote::Unpriced => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, Quote::Priced { .. })
    }
}

/// Stateless pricing over the rate table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    rates: RateTable,
}

impl PricingEngine {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn price(
        &self,
        influencer: Option<&InfluencerSummary>,
        content_type: Option<ContentType>,
    ) -> Quote {
        match (influencer.and_then(|summary| summary.reach), content_type) {
            (Some(reach), Some(content_type)) => self.price_reach(reach, content_type),
            _ => Quote::Unpriced,
        }
    }

    /// Reach scaled by the platform CPM and the content multiplier, rounded up to the cent.
    pub fn price_reach(&self, reach: u64, content_type: ContentType) -> Quote {
        let Some((base_cpm_cents, multiplier_bps)) = self.rates.lookup(content_type) else {
            return Quote::Unpriced;
        };

        let numerator = u128::from(reach) * u128::from(base_cpm_cents) * u128::from(multiplier_bps);
        let denominator = REACH_PER_CPM * u128::from(BASELINE_MULTIPLIER_BPS);
        let cents = numerator.div_ceil(denominator).min(u128::from(u64::MAX)) as u64;

        Quote::Priced {
            amount: Money::from_cents(cents),
            base_cpm_cents,
            multiplier_bps,
        }
    }
}

//! Campaign-creation workflow for the influencer/advertiser marketplace.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

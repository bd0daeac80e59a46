use crate::infra::InMemoryCampaignGateway;
use clap::Args;
use influence_market::config::{CampaignConfig, MAX_DEADLINE_DAYS};
use influence_market::error::AppError;
use influence_market::workflows::campaign::{
    CampaignContent, CampaignWizard, CategoryId, ContentType, InfluencerId, InfluencerSummary,
    PaymentMethodId, PaymentMethodRef, PricingEngine, RateTable, StepAction, StepId,
    StepTransition, SubmissionPolicy, WizardSeed,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Display name of the carried-over influencer
    #[arg(long, default_value = "Ana Lima")]
    pub(crate) influencer: String,
    /// Influencer reach (followers/subscribers)
    #[arg(long, default_value_t = 100_000)]
    pub(crate) reach: u64,
    /// Content type, e.g. REELS, FEED, SHORTS, LIVE
    #[arg(long, default_value = "REELS", value_parser = parse_content_type)]
    pub(crate) content_type: ContentType,
    /// Target categories
    #[arg(long = "category", default_values_t = vec!["lifestyle".to_string()])]
    pub(crate) categories: Vec<String>,
    /// Campaign caption
    #[arg(long, default_value = "")]
    pub(crate) caption: String,
    /// Days until the campaign deadline
    #[arg(
        long,
        default_value_t = CampaignConfig::default().deadline_days,
        value_parser = clap::value_parser!(i64).range(1..=MAX_DEADLINE_DAYS)
    )]
    pub(crate) deadline_days: i64,
}

fn parse_content_type(raw: &str) -> Result<ContentType, String> {
    let normalized = raw.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unknown content type '{raw}'"))
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        influencer,
        reach,
        content_type,
        categories,
        caption,
        deadline_days,
    } = args;

    let gateway = Arc::new(InMemoryCampaignGateway::default());
    let seed = WizardSeed {
        influencer: InfluencerSummary {
            id: InfluencerId(format!(
                "inf-{}",
                influencer.to_ascii_lowercase().replace(' ', "-")
            )),
            display_name: influencer,
            reach: Some(reach),
            categories: categories.clone(),
            location: None,
        },
    };
    let mut wizard = CampaignWizard::new(
        gateway.clone(),
        PricingEngine::default(),
        SubmissionPolicy::from(CampaignConfig { deadline_days }),
        Some(seed),
    );

    println!("Campaign wizard demo");
    wizard.dispatch(StepAction::SelectCategories {
        categories: categories.into_iter().map(CategoryId).collect(),
    })?;
    report(wizard.advance());

    wizard.dispatch(StepAction::SelectPlatform {
        platform: content_type.platform(),
    })?;
    wizard.dispatch(StepAction::SelectContentType { content_type })?;
    report(wizard.advance());

    match wizard.draft().budget() {
        Some(budget) => println!("- priced {} at {budget}", content_type.label()),
        None => println!("- {} could not be priced", content_type.label()),
    }

    report(wizard.advance());
    report(wizard.dispatch(StepAction::SelectPaymentMethod {
        payment_method: PaymentMethodRef {
            id: PaymentMethodId("pm-demo".to_string()),
            brand: "Visa".to_string(),
            last4: "4242".to_string(),
        },
    })?);
    wizard.dispatch(StepAction::UpdateContent {
        content: CampaignContent {
            caption,
            ..CampaignContent::default()
        },
    })?;
    report(wizard.advance());

    if wizard.current_step() != StepId::Review {
        println!("Wizard stopped on {}", wizard.current_step().title());
        return Ok(());
    }

    let campaign_id = wizard.submit().await?;
    println!("Campaign {campaign_id} created");
    for (_, request) in gateway.campaigns() {
        let rendered = serde_json::to_string_pretty(&request)
            .unwrap_or_else(|err| format!("<unserializable request: {err}>"));
        println!("{rendered}");
    }

    Ok(())
}

fn report(transition: StepTransition) {
    match transition {
        StepTransition::Moved { from, to } => {
            println!("- {} -> {}", from.title(), to.title())
        }
        StepTransition::Blocked { step } => println!("- blocked on {}", step.title()),
        StepTransition::AtBoundary { step } | StepTransition::Stayed { step } => {
            println!("- still on {}", step.title())
        }
    }
}

pub(crate) fn run_rates() {
    println!("Pricing rate table");
    for rates in RateTable::standard().platforms() {
        println!(
            "{} | base ${}.{:02} per 1k reach",
            rates.platform.label(),
            rates.base_cpm_cents / 100,
            rates.base_cpm_cents % 100
        );
        for card in rates.cards {
            println!(
                "  - {}: {:.2}x",
                card.content_type.label(),
                f64::from(card.multiplier_bps) / 10_000.0
            );
        }
    }
}

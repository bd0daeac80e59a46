use super::common::*;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::workflows::campaign::{
    CampaignId, CampaignKind, CampaignWizard, ContentType, GatewayError, InfluencerId,
    MissingField, Money, Platform, PricingEngine, StepId, SubmissionPolicy, SubmissionState,
    SubmitError,
};

#[test]
fn composed_request_carries_the_whole_draft() {
    let mut wizard = new_wizard(Arc::new(RecordingGateway::default()));
    walk_to_review(&mut wizard);
    let submitted_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();

    let request = wizard
        .begin_submission(submitted_at)
        .expect("request composes");

    assert_eq!(request.title, "Campaign with Ana Lima");
    assert_eq!(request.description, "Spring running collection launch");
    assert_eq!(request.platform, Platform::Instagram);
    assert_eq!(request.content_type, ContentType::Reels);
    assert_eq!(request.budget, Money::from_cents(150_000));
    assert_eq!(request.deadline, submitted_at + Duration::days(7));
    assert!(request.requirements.is_empty());
    assert_eq!(request.kind, CampaignKind::SingleInfluencer);
    assert_eq!(request.categories, vec!["fitness", "lifestyle"]);
    assert_eq!(
        request.influencer_id,
        Some(InfluencerId("inf-ana-lima".to_string()))
    );
    assert_eq!(request.content.hashtags, vec!["#run", "#spring"]);

    let json = serde_json::to_value(&request).expect("request serializes");
    assert_eq!(json["type"], "SINGLE_INFLUENCER");
    assert_eq!(json["contentType"], "REELS");
    assert_eq!(json["influencerId"], "inf-ana-lima");
    assert_eq!(json["budget"], serde_json::json!(1500.0));
    assert_eq!(
        json["content"]["imageUrl"],
        "https://cdn.example.com/spring.jpg"
    );
}

#[test]
fn submit_is_only_offered_on_review() {
    let mut wizard = new_wizard(Arc::new(RecordingGateway::default()));
    let error = wizard
        .begin_submission(Utc::now())
        .expect_err("not on review yet");
    assert_eq!(error, SubmitError::NotOnReview(StepId::Categories));
    assert_eq!(wizard.submission_state(), SubmissionState::Idle);
}

#[test]
fn second_submission_is_rejected_while_the_first_is_in_flight() {
    let mut wizard = new_wizard(Arc::new(RecordingGateway::default()));
    walk_to_review(&mut wizard);

    wizard
        .begin_submission(Utc::now())
        .expect("first submission starts");
    assert_eq!(wizard.submission_state(), SubmissionState::Submitting);

    assert_eq!(
        wizard.begin_submission(Utc::now()),
        Err(SubmitError::AlreadySubmitting)
    );
    assert!(matches!(
        wizard.retreat(),
        crate::workflows::campaign::StepTransition::Blocked { .. }
    ));
    assert_eq!(wizard.current_step(), StepId::Review);
}

#[tokio::test]
async fn failed_submit_keeps_the_draft_for_a_retry() {
    let gateway = Arc::new(RecordingGateway::failing_with(vec![
        GatewayError::Unavailable("upstream timeout".to_string()),
    ]));
    let mut wizard = new_wizard(gateway.clone());
    walk_to_review(&mut wizard);
    let before = wizard.draft().clone();

    let error = wizard.submit().await.expect_err("first attempt fails");
    assert!(matches!(error, SubmitError::Gateway(_)));
    assert_eq!(wizard.submission_state(), SubmissionState::Failed);
    assert_eq!(
        wizard.last_error(),
        Some("campaign service unavailable: upstream timeout")
    );
    assert_eq!(wizard.draft(), &before);
    assert_eq!(wizard.current_step(), StepId::Review);

    let campaign_id = wizard.submit().await.expect("retry succeeds");
    assert_eq!(campaign_id, CampaignId("cmp-002".to_string()));
    assert_eq!(wizard.submission_state(), SubmissionState::Completed);
    assert_eq!(wizard.last_error(), None);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].title, requests[1].title);
    assert_eq!(requests[0].budget, requests[1].budget);
    assert_eq!(requests[0].content, requests[1].content);
    assert_eq!(requests[0].categories, requests[1].categories);
}

#[tokio::test]
async fn completed_wizard_refuses_to_submit_again() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut wizard = new_wizard(gateway.clone());
    walk_to_review(&mut wizard);

    wizard.submit().await.expect("submission succeeds");
    assert_eq!(wizard.submit().await, Err(SubmitError::AlreadySubmitted));
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn unpriced_draft_never_reaches_the_gateway() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut wizard = new_wizard(gateway.clone());
    walk_to_review(&mut wizard);
    wizard.retreat();
    wizard.retreat();
    wizard.retreat();
    assert_eq!(wizard.current_step(), StepId::Influencer);

    let mut unknown_reach = influencer("New Face", 0);
    unknown_reach.reach = None;
    wizard
        .dispatch(crate::workflows::campaign::StepAction::SelectInfluencer {
            influencer: unknown_reach,
        })
        .expect("influencer accepted");
    assert_eq!(wizard.draft().budget(), None);
    wizard.advance();
    wizard.advance();
    assert_eq!(wizard.current_step(), StepId::Review);

    assert_eq!(
        wizard.submit().await,
        Err(SubmitError::Incomplete(MissingField::Budget))
    );
    assert_eq!(wizard.submission_state(), SubmissionState::Idle);
    assert!(gateway.requests().is_empty());
}

#[test]
fn title_falls_back_without_an_influencer_name() {
    let mut wizard = new_wizard(Arc::new(RecordingGateway::default()));
    walk_to_review(&mut wizard);
    wizard.retreat();
    wizard.retreat();
    wizard.retreat();
    wizard
        .dispatch(crate::workflows::campaign::StepAction::SelectInfluencer {
            influencer: influencer("  ", 5_000),
        })
        .expect("influencer accepted");
    wizard.advance();
    wizard.advance();

    let request = wizard
        .begin_submission(Utc::now())
        .expect("request composes");
    assert_eq!(request.title, "New campaign");
}

#[test]
fn deadline_that_cannot_be_scheduled_is_a_typed_error() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut wizard = CampaignWizard::new(
        gateway.clone(),
        PricingEngine::default(),
        SubmissionPolicy {
            deadline_days: 100_000_000,
        },
        None,
    );
    walk_to_review(&mut wizard);

    assert_eq!(
        wizard.begin_submission(Utc::now()),
        Err(SubmitError::DeadlineOutOfRange {
            days: 100_000_000
        })
    );
    assert_eq!(wizard.submission_state(), SubmissionState::Idle);
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn abandoned_submit_future_returns_the_wizard_to_failed() {
    let gateway = Arc::new(GatedGateway::new());
    let mut wizard = new_wizard(gateway.clone());
    walk_to_review(&mut wizard);

    {
        let submit = wizard.submit();
        tokio::pin!(submit);
        tokio::select! {
            biased;
            _ = &mut submit => panic!("gateway should still be waiting"),
            _ = std::future::ready(()) => {}
        }
    }

    assert_eq!(wizard.submission_state(), SubmissionState::Failed);
    assert_eq!(
        wizard.last_error(),
        Some("submission interrupted before the campaign service answered")
    );
    assert_eq!(wizard.current_step(), StepId::Review);

    gateway.release();
    let campaign_id = wizard.submit().await.expect("retry succeeds");
    assert_eq!(campaign_id, CampaignId("cmp-gated".to_string()));
    assert_eq!(gateway.calls(), 2);
}

use serde::{Deserialize, Serialize};

use super::domain::CampaignKind;
use super::draft::CampaignDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Categories,
    Platform,
    Influencer,
    Payment,
    Content,
    Review,
}

impl StepId {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Categories,
            Self::Platform,
            Self::Influencer,
            Self::Payment,
            Self::Content,
            Self::Review,
        ]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Categories => "Choose categories",
            Self::Platform => "Platform & content type",
            Self::Influencer => "Select influencer",
            Self::Payment => "Payment method",
            Self::Content => "Campaign content",
            Self::Review => "Review & submit",
        }
    }

    /// Whether the draft satisfies what this step needs before moving on.
    pub fn is_complete(self, draft: &CampaignDraft) -> bool {
        match self {
            Self::Categories => !draft.categories().is_empty(),
            Self::Platform => match (draft.platform(), draft.content_type()) {
                (Some(platform), Some(content_type)) => platform.offers(content_type),
                _ => false,
            },
            Self::Influencer => draft.selected_influencer().is_some(),
            Self::Payment => draft.payment_method().is_some(),
            Self::Content => true,
            Self::Review => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub id: StepId,
    pub title: &'static str,
    pub position: usize,
}

/// Fixed, ordered catalog of wizard steps.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDescriptor>,
}

impl StepRegistry {
    pub fn standard() -> Self {
        let steps = StepId::ordered()
            .into_iter()
            .enumerate()
            .map(|(position, id)| StepDescriptor {
                id,
                title: id.title(),
                position,
            })
            .collect();

        Self { steps }
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// Steps shown for a campaign kind. Every kind walks the full list.
    pub fn active_steps(&self, _kind: CampaignKind) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn first(&self) -> StepId {
        self.steps[0].id
    }

    pub fn terminal(&self) -> StepId {
        self.steps[self.steps.len() - 1].id
    }

    pub fn position(&self, id: StepId) -> usize {
        self.steps
            .iter()
            .position(|descriptor| descriptor.id == id)
            .unwrap_or_default()
    }

    pub fn descriptor(&self, id: StepId) -> &StepDescriptor {
        &self.steps[self.position(id)]
    }

    pub fn next(&self, id: StepId) -> Option<StepId> {
        self.steps.get(self.position(id) + 1).map(|step| step.id)
    }

    pub fn previous(&self, id: StepId) -> Option<StepId> {
        self.position(id)
            .checked_sub(1)
            .and_then(|index| self.steps.get(index))
            .map(|step| step.id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_walks_steps_in_order() {
        let registry = StepRegistry::standard();
        assert_eq!(registry.first(), StepId::Categories);
        assert_eq!(registry.terminal(), StepId::Review);
        assert_eq!(registry.next(StepId::Categories), Some(StepId::Platform));
        assert_eq!(registry.next(StepId::Review), None);
        assert_eq!(registry.previous(StepId::Categories), None);
        assert_eq!(registry.previous(StepId::Review), Some(StepId::Content));
        assert_eq!(registry.descriptor(StepId::Payment).position, 3);
    }

    #[test]
    fn active_steps_are_the_same_for_every_kind() {
        let registry = StepRegistry::standard();
        assert_eq!(
            registry.active_steps(CampaignKind::OpenPool),
            registry.active_steps(CampaignKind::SingleInfluencer)
        );
        assert_eq!(registry.active_steps(CampaignKind::OpenPool).len(), 6);
    }

    #[test]
    fn empty_draft_only_completes_the_content_step() {
        let draft = CampaignDraft::default();
        let complete: Vec<StepId> = StepId::ordered()
            .into_iter()
            .filter(|step| step.is_complete(&draft))
            .collect();
        assert_eq!(complete, vec![StepId::Content]);
    }
}

use crate::audit::{AuditStamps, Auditable};
use crate::error::DomainResult;
use crate::guard;
use crate::id::PlanId;
use crate::line::{PlanInput, PlanTarget, consolidate, replace_if_changed};
use crate::slug;
use serde::Serialize;

pub const SLUG_MAX_LEN: usize = 120;
pub const NAME_MAX_LEN: usize = 120;

/// Input to [`Plan::create`].
#[derive(Debug, Clone, Default)]
pub struct NewPlan {
    pub slug: String,
    pub name: String,
    pub targets: Vec<PlanTarget>,
    pub available_inputs: Vec<PlanInput>,
    pub id: Option<PlanId>,
}

/// A "what do I want to produce, given what I have" scenario.
///
/// Holds consolidated targets and available inputs only; requirements are
/// derived elsewhere. Unlike a recipe, either list may be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    id: PlanId,
    slug: String,
    name: String,
    targets: Vec<PlanTarget>,
    available_inputs: Vec<PlanInput>,
    audit: AuditStamps,
}

impl Plan {
    pub fn create(new: NewPlan) -> DomainResult<Self> {
        let id = match new.id {
            Some(id) => guard::not_default(id, "id")?,
            None => PlanId::new(),
        };
        let mut plan = Self {
            id,
            slug: String::new(),
            name: guard::required(&new.name, "name", NAME_MAX_LEN)?,
            targets: Vec::new(),
            available_inputs: Vec::new(),
            audit: AuditStamps::default(),
        };
        plan.change_slug(&new.slug)?;
        plan.replace_targets(new.targets)?;
        plan.replace_available_inputs(new.available_inputs)?;
        Ok(plan)
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn targets(&self) -> &[PlanTarget] {
        &self.targets
    }

    pub fn available_inputs(&self) -> &[PlanInput] {
        &self.available_inputs
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = guard::required(name, "name", NAME_MAX_LEN)?;
        Ok(())
    }

    pub fn change_slug(&mut self, slug: &str) -> DomainResult<()> {
        self.slug = guard::required(&slug::normalize(slug), "slug", SLUG_MAX_LEN)?;
        Ok(())
    }

    /// Consolidate and store targets. Returns `Ok(false)` on no change.
    pub fn replace_targets(
        &mut self,
        targets: impl IntoIterator<Item = PlanTarget>,
    ) -> DomainResult<bool> {
        let consolidated = consolidate(targets, "targets")?;
        Ok(replace_if_changed(&mut self.targets, consolidated))
    }

    /// Consolidate and store available inputs. Returns `Ok(false)` on no
    /// change.
    pub fn replace_available_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = PlanInput>,
    ) -> DomainResult<bool> {
        let consolidated = consolidate(inputs, "available_inputs")?;
        Ok(replace_if_changed(&mut self.available_inputs, consolidated))
    }
}

impl Auditable for Plan {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}

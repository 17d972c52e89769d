use crate::audit::{AuditStamps, Auditable};
use crate::error::DomainResult;
use crate::guard;
use crate::id::BuildingId;
use crate::slug;
use serde::Serialize;

pub const SLUG_MAX_LEN: usize = 120;
pub const NAME_MAX_LEN: usize = 120;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Input to [`Building::create`].
#[derive(Debug, Clone, Default)]
pub struct NewBuilding {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub id: Option<BuildingId>,
}

/// A kind of production facility (smelter, constructor, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    id: BuildingId,
    slug: String,
    name: String,
    description: Option<String>,
    audit: AuditStamps,
}

impl Building {
    pub fn create(new: NewBuilding) -> DomainResult<Self> {
        let id = match new.id {
            Some(id) => guard::not_default(id, "id")?,
            None => BuildingId::new(),
        };
        let mut building = Self {
            id,
            slug: String::new(),
            name: guard::required(&new.name, "name", NAME_MAX_LEN)?,
            description: guard::optional(new.description.as_deref(), "description", DESCRIPTION_MAX_LEN)?,
            audit: AuditStamps::default(),
        };
        building.change_slug(&new.slug)?;
        Ok(building)
    }

    pub fn id(&self) -> BuildingId {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = guard::required(name, "name", NAME_MAX_LEN)?;
        Ok(())
    }

    pub fn change_slug(&mut self, slug: &str) -> DomainResult<()> {
        self.slug = guard::required(&slug::normalize(slug), "slug", SLUG_MAX_LEN)?;
        Ok(())
    }

    pub fn change_description(&mut self, description: Option<&str>) -> DomainResult<()> {
        self.description = guard::optional(description, "description", DESCRIPTION_MAX_LEN)?;
        Ok(())
    }
}

impl Auditable for Building {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_smelter() {
        let smelter = Building::create(NewBuilding {
            slug: "Smelter".into(),
            name: "Smelter".into(),
            description: Some(" Melts ore ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(smelter.slug(), "smelter");
        assert_eq!(smelter.description(), Some("Melts ore"));
        assert!(smelter.audit().created_utc().is_none());
    }

    #[test]
    fn slug_too_long_fails() {
        let result = Building::create(NewBuilding {
            slug: "s".repeat(SLUG_MAX_LEN + 1),
            name: "Long".into(),
            ..Default::default()
        });
        assert_eq!(result.unwrap_err().field, "slug");
    }

    #[test]
    fn failed_change_slug_keeps_old_slug() {
        let mut b = Building::create(NewBuilding {
            slug: "constructor".into(),
            name: "Constructor".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(b.change_slug("   ").is_err());
        assert_eq!(b.slug(), "constructor");
        b.rename("Constructor Mk2").unwrap();
        b.change_description(None).unwrap();
        assert_eq!(b.name(), "Constructor Mk2");
    }
}

use crate::audit::{AuditStamps, Auditable};
use crate::error::DomainResult;
use crate::guard;
use crate::id::ItemId;
use crate::slug;
use serde::{Deserialize, Serialize};

pub const SLUG_MAX_LEN: usize = 120;
pub const NAME_MAX_LEN: usize = 120;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// How quantities of an item are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Discrete pieces (items per minute).
    #[default]
    Item = 0,
    /// Fluids and gases (volume per minute).
    Volume = 1,
}

impl UnitKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(UnitKind::Item),
            1 => Some(UnitKind::Volume),
            _ => None,
        }
    }
}

/// Input to [`Item::create`].
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_kind: UnitKind,
    pub is_raw_resource: bool,
    /// Supplied id, or `None` to generate one.
    pub id: Option<ItemId>,
}

/// A producible or gatherable thing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    slug: String,
    name: String,
    description: Option<String>,
    unit_kind: UnitKind,
    is_raw_resource: bool,
    audit: AuditStamps,
}

impl Item {
    pub fn create(new: NewItem) -> DomainResult<Self> {
        let id = match new.id {
            Some(id) => guard::not_default(id, "id")?,
            None => ItemId::new(),
        };
        let mut item = Self {
            id,
            slug: String::new(),
            name: guard::required(&new.name, "name", NAME_MAX_LEN)?,
            description: guard::optional(new.description.as_deref(), "description", DESCRIPTION_MAX_LEN)?,
            unit_kind: new.unit_kind,
            is_raw_resource: new.is_raw_resource,
            audit: AuditStamps::default(),
        };
        item.change_slug(&new.slug)?;
        Ok(item)
    }

    pub fn id(&self) -> ItemId {
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

    pub fn unit_kind(&self) -> UnitKind {
        self.unit_kind
    }

    /// True when no recipe produces this item.
    pub fn is_raw_resource(&self) -> bool {
        self.is_raw_resource
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

    pub fn change_unit_kind(&mut self, unit_kind: UnitKind) {
        self.unit_kind = unit_kind;
    }

    pub fn set_raw_resource(&mut self, is_raw_resource: bool) {
        self.is_raw_resource = is_raw_resource;
    }
}

impl Auditable for Item {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}

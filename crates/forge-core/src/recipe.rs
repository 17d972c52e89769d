use crate::audit::{AuditStamps, Auditable};
use crate::error::{DomainError, DomainResult};
use crate::fixed::Fixed64;
use crate::guard;
use crate::id::{BuildingId, RecipeId};
use crate::line::{RecipeLine, consolidate_sorted, replace_if_changed};
use crate::slug;
use serde::Serialize;
use std::collections::BTreeSet;

pub const SLUG_MAX_LEN: usize = 120;
pub const NAME_MAX_LEN: usize = 120;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Shortest allowed production cycle, in seconds.
pub const MIN_CYCLE_SECONDS: Fixed64 = Fixed64::lit("0.01");
/// Longest allowed production cycle, in seconds.
pub const MAX_CYCLE_SECONDS: Fixed64 = Fixed64::const_from_int(3600);

/// Input to [`Recipe::create`].
#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub cycle_seconds: Fixed64,
    pub ingredients: Vec<RecipeLine>,
    pub products: Vec<RecipeLine>,
    /// Buildings able to run the recipe. Empty means none recorded yet.
    pub produced_in: Vec<BuildingId>,
    pub id: Option<RecipeId>,
}

/// A transformation of ingredients into products over one cycle.
///
/// Ingredient and product lists are always non-empty, hold at most one line
/// per item, and are ordered ascending by item id so that equality and
/// persistence diffs are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    id: RecipeId,
    slug: String,
    name: String,
    description: Option<String>,
    cycle_seconds: Fixed64,
    ingredients: Vec<RecipeLine>,
    products: Vec<RecipeLine>,
    produced_in: BTreeSet<BuildingId>,
    audit: AuditStamps,
}

impl Recipe {
    pub fn create(new: NewRecipe) -> DomainResult<Self> {
        let id = match new.id {
            Some(id) => guard::not_default(id, "id")?,
            None => RecipeId::new(),
        };
        let mut recipe = Self {
            id,
            slug: String::new(),
            name: guard::required(&new.name, "name", NAME_MAX_LEN)?,
            description: guard::optional(new.description.as_deref(), "description", DESCRIPTION_MAX_LEN)?,
            cycle_seconds: check_cycle_seconds(new.cycle_seconds)?,
            ingredients: Vec::new(),
            products: Vec::new(),
            produced_in: BTreeSet::new(),
            audit: AuditStamps::default(),
        };

        recipe.change_slug(&new.slug)?;
        recipe.replace_ingredients(new.ingredients)?;
        recipe.replace_products(new.products)?;
        recipe.replace_produced_in(new.produced_in)?;

        recipe.validate_invariants()?;
        Ok(recipe)
    }

    pub fn id(&self) -> RecipeId {
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

    pub fn cycle_seconds(&self) -> Fixed64 {
        self.cycle_seconds
    }

    pub fn ingredients(&self) -> &[RecipeLine] {
        &self.ingredients
    }

    pub fn products(&self) -> &[RecipeLine] {
        &self.products
    }

    /// Eligible buildings, ascending by id.
    pub fn produced_in(&self) -> impl ExactSizeIterator<Item = BuildingId> + '_ {
        self.produced_in.iter().copied()
    }

    pub fn is_produced_in(&self, building: BuildingId) -> bool {
        self.produced_in.contains(&building)
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

    pub fn change_cycle_seconds(&mut self, cycle_seconds: Fixed64) -> DomainResult<()> {
        self.cycle_seconds = check_cycle_seconds(cycle_seconds)?;
        Ok(())
    }

    /// Validate, consolidate and store new ingredients.
    ///
    /// Returns `Ok(false)` when the consolidated lines equal the current ones.
    pub fn replace_ingredients(
        &mut self,
        ingredients: impl IntoIterator<Item = RecipeLine>,
    ) -> DomainResult<bool> {
        let consolidated = consolidate_lines(ingredients, "ingredients")?;
        Ok(replace_if_changed(&mut self.ingredients, consolidated))
    }

    /// Validate, consolidate and store new products.
    ///
    /// Returns `Ok(false)` when the consolidated lines equal the current ones.
    pub fn replace_products(
        &mut self,
        products: impl IntoIterator<Item = RecipeLine>,
    ) -> DomainResult<bool> {
        let consolidated = consolidate_lines(products, "products")?;
        Ok(replace_if_changed(&mut self.products, consolidated))
    }

    /// Replace the set of eligible buildings. Duplicates collapse; any empty
    /// id rejects the whole call.
    pub fn replace_produced_in(
        &mut self,
        produced_in: impl IntoIterator<Item = BuildingId>,
    ) -> DomainResult<bool> {
        let next = produced_in
            .into_iter()
            .map(|b| guard::not_default(b, "produced_in"))
            .collect::<DomainResult<BTreeSet<_>>>()?;
        if next == self.produced_in {
            return Ok(false);
        }
        self.produced_in = next;
        Ok(true)
    }

    fn validate_invariants(&self) -> DomainResult<()> {
        if self.ingredients.is_empty() {
            return Err(DomainError::new(
                "ingredients",
                "must contain at least one ingredient.",
            ));
        }
        if self.products.is_empty() {
            return Err(DomainError::new("products", "must contain at least one product."));
        }
        Ok(())
    }
}

impl Auditable for Recipe {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}

fn check_cycle_seconds(cycle_seconds: Fixed64) -> DomainResult<Fixed64> {
    guard::in_range(
        cycle_seconds,
        "cycle_seconds",
        MIN_CYCLE_SECONDS,
        MAX_CYCLE_SECONDS,
    )
}

fn consolidate_lines(
    source: impl IntoIterator<Item = RecipeLine>,
    field: &str,
) -> DomainResult<Vec<RecipeLine>> {
    let lines: Vec<RecipeLine> = source.into_iter().collect();
    for line in &lines {
        guard::not_default(line.item_id(), &format!("{field}.item_id"))?;
        guard::positive(line.amount_per_cycle(), &format!("{field}.amount_per_cycle"))?;
    }

    let consolidated = consolidate_sorted(lines, field)?;
    if consolidated.is_empty() {
        return Err(DomainError::new(field, "must contain at least one line."));
    }
    Ok(consolidated)
}

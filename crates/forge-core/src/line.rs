//! Line-item value objects and the consolidation rule shared by aggregates.

use crate::error::{DomainError, DomainResult};
use crate::fixed::{Fixed64, checked_add_64};
use crate::id::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable (item, amount per cycle) pair.
pub trait LineItem: Copy + PartialEq {
    fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self;
    fn item_id(&self) -> ItemId;
    fn amount_per_cycle(&self) -> Fixed64;
}

/// An ingredient or product of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeLine {
    item_id: ItemId,
    amount_per_cycle: Fixed64,
}

/// A desired output of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanTarget {
    item_id: ItemId,
    amount_per_cycle: Fixed64,
}

/// An externally available input of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanInput {
    item_id: ItemId,
    amount_per_cycle: Fixed64,
}

impl RecipeLine {
    pub const fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        Self {
            item_id,
            amount_per_cycle,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

impl PlanTarget {
    pub const fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        Self {
            item_id,
            amount_per_cycle,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

impl PlanInput {
    pub const fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        Self {
            item_id,
            amount_per_cycle,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

impl LineItem for RecipeLine {
    fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        RecipeLine::new(item_id, amount_per_cycle)
    }
    fn item_id(&self) -> ItemId {
        self.item_id
    }
    fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

impl LineItem for PlanTarget {
    fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        PlanTarget::new(item_id, amount_per_cycle)
    }
    fn item_id(&self) -> ItemId {
        self.item_id
    }
    fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

impl LineItem for PlanInput {
    fn new(item_id: ItemId, amount_per_cycle: Fixed64) -> Self {
        PlanInput::new(item_id, amount_per_cycle)
    }
    fn item_id(&self) -> ItemId {
        self.item_id
    }
    fn amount_per_cycle(&self) -> Fixed64 {
        self.amount_per_cycle
    }
}

/// Group lines by item and sum their amounts.
///
/// Groups keep the order in which each item first appears. Fails only if a
/// sum leaves the fixed-point range.
pub fn consolidate<L: LineItem>(lines: impl IntoIterator<Item = L>, field: &str) -> DomainResult<Vec<L>> {
    let mut merged: Vec<L> = Vec::new();
    let mut slot_of: HashMap<ItemId, usize> = HashMap::new();

    for line in lines {
        let item_id = LineItem::item_id(&line);
        match slot_of.get(&item_id) {
            Some(&slot) => {
                let total = checked_add_64(
                    LineItem::amount_per_cycle(&merged[slot]),
                    LineItem::amount_per_cycle(&line),
                )
                .ok_or_else(|| {
                    DomainError::new(
                        format!("{field}.amount_per_cycle"),
                        "exceeds the supported range.",
                    )
                })?;
                merged[slot] = L::new(item_id, total);
            }
            None => {
                slot_of.insert(item_id, merged.len());
                merged.push(line);
            }
        }
    }

    Ok(merged)
}

/// [`consolidate`], then order ascending by item id value.
pub fn consolidate_sorted<L: LineItem>(
    lines: impl IntoIterator<Item = L>,
    field: &str,
) -> DomainResult<Vec<L>> {
    let mut merged = consolidate(lines, field)?;
    merged.sort_by_key(|l| LineItem::item_id(l));
    Ok(merged)
}

/// Store `next` into `target` unless they are already element-wise equal.
/// Returns whether anything changed.
pub(crate) fn replace_if_changed<T: PartialEq>(target: &mut Vec<T>, next: Vec<T>) -> bool {
    if *target == next {
        return false;
    }
    *target = next;
    true
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Marker for an aggregate kind that owns its own identifier space.
pub trait IdKind: 'static {
    /// Short name used in debug output.
    const NAME: &'static str;
}

/// Identifier space of [`crate::item::Item`].
#[derive(Debug)]
pub enum ItemKind {}

/// Identifier space of [`crate::building::Building`].
#[derive(Debug)]
pub enum BuildingKind {}

/// Identifier space of [`crate::recipe::Recipe`].
#[derive(Debug)]
pub enum RecipeKind {}

/// Identifier space of [`crate::plan::Plan`].
#[derive(Debug)]
pub enum PlanKind {}

impl IdKind for ItemKind {
    const NAME: &'static str = "ItemId";
}

impl IdKind for BuildingKind {
    const NAME: &'static str = "BuildingId";
}

impl IdKind for RecipeKind {
    const NAME: &'static str = "RecipeId";
}

impl IdKind for PlanKind {
    const NAME: &'static str = "PlanId";
}

/// Identifies an item in the catalog. Cheap to copy and compare.
pub type ItemId = Id<ItemKind>;

/// Identifies a building kind in the catalog.
pub type BuildingId = Id<BuildingKind>;

/// Identifies a recipe in the catalog.
pub type RecipeId = Id<RecipeKind>;

/// Identifies a production plan.
pub type PlanId = Id<PlanKind>;

/// A time-ordered (UUIDv7) identifier bound to one aggregate kind.
///
/// Two ids of different kinds are distinct types, so an `ItemId` can never be
/// passed where a `BuildingId` is expected. Equality, ordering and hashing use
/// only the underlying 128-bit value. The all-zero value ([`Id::EMPTY`]) marks
/// "unset" and is rejected by [`crate::guard::not_default`].
pub struct Id<K: IdKind> {
    value: Uuid,
    kind: PhantomData<fn() -> K>,
}

impl<K: IdKind> Id<K> {
    /// The sentinel "unset" identifier (all zero bits).
    pub const EMPTY: Self = Self::from_uuid(Uuid::nil());

    /// Generate a fresh time-ordered identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    /// Wrap an existing raw value without validation.
    pub const fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    pub fn into_uuid(self) -> Uuid {
        self.value
    }

    /// True for the sentinel value.
    pub fn is_empty(&self) -> bool {
        self.value.is_nil()
    }
}

/// Generate a fresh identifier of kind `K`.
pub fn new_id<K: IdKind>() -> Id<K> {
    Id::new()
}

/// Rebuild an identifier of kind `K` from its raw value.
pub fn id_from_raw<K: IdKind>(value: Uuid) -> Id<K> {
    Id::from_uuid(value)
}

// Hand-written impls: derives would require the phantom marker `K` to
// implement each trait.

impl<K: IdKind> Clone for Id<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: IdKind> Copy for Id<K> {}

impl<K: IdKind> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: IdKind> Eq for Id<K> {}

impl<K: IdKind> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: IdKind> Ord for Id<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K: IdKind> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: IdKind> Default for Id<K> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<K: IdKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.value)
    }
}

impl<K: IdKind> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<K: IdKind> FromStr for Id<K> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self::from_uuid)
    }
}

impl<K: IdKind> From<Uuid> for Id<K> {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl<K: IdKind> From<Id<K>> for Uuid {
    fn from(id: Id<K>) -> Self {
        id.value
    }
}

impl<K: IdKind> Serialize for Id<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, K: IdKind> Deserialize<'de> for Id<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_equality() {
        let raw = Uuid::now_v7();
        let a = ItemId::from_uuid(raw);
        let b = ItemId::from_uuid(raw);
        let c = ItemId::new();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn building_id_copy() {
        let a = BuildingId::new();
        let b = a; // Copy
        assert_eq!(a, b);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let ore = ItemId::new();
        let plate = ItemId::new();
        let mut map = HashMap::new();
        map.insert(ore, "iron-ore");
        map.insert(plate, "iron-plate");
        assert_eq!(map[&ore], "iron-ore");
    }

    #[test]
    fn default_is_empty_sentinel() {
        assert!(RecipeId::default().is_empty());
        assert_eq!(PlanId::default(), PlanId::EMPTY);
        assert!(!PlanId::new().is_empty());
    }

    #[test]
    fn free_constructors_match_methods() {
        let raw = Uuid::now_v7();
        let id: ItemId = id_from_raw(raw);
        assert_eq!(id.into_uuid(), raw);
        let fresh: BuildingId = new_id();
        assert!(!fresh.is_empty());
    }

    #[test]
    fn new_ids_are_version_seven() {
        let id = RecipeId::new();
        assert_eq!(id.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let low = ItemId::from_uuid(Uuid::from_u128(1));
        let high = ItemId::from_uuid(Uuid::from_u128(2));
        assert!(low < high);
    }

    #[test]
    fn debug_names_the_kind() {
        let id = ItemId::from_uuid(Uuid::nil());
        assert_eq!(
            format!("{id:?}"),
            "ItemId(00000000-0000-0000-0000-000000000000)"
        );
    }

    #[test]
    fn parse_and_display_round_trip() {
        let id = PlanId::new();
        let parsed: PlanId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PlanId>().is_err());
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let raw = Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001);
        let id = BuildingId::from_uuid(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{raw}\""));
        let back: BuildingId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

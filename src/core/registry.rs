//! Recipe catalog and ingredient store.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::ledger::Ingredient;

/// Ingredient quantities required by a recipe, in declared order.
///
/// Order matters: validation reports the last insufficient ingredient it
/// walks past, so the declared order decides which name a failure carries.
/// Deserialization keeps document order instead of hashing the keys. A
/// repeated ingredient keeps its first position and its last quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements(Vec<(String, u32)>);

impl Requirements {
    fn set(&mut self, name: String, qty: u32) {
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = qty,
            None => self.0.push((name, qty)),
        }
    }

    /// Iterate `(ingredient, quantity)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    /// Number of distinct ingredients.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the recipe needs nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Requirements {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut reqs = Self::default();
        for (name, qty) in iter {
            reqs.set(name.into(), qty);
        }
        reqs
    }
}

impl Serialize for Requirements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, qty) in &self.0 {
            map.serialize_entry(name, qty)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Requirements {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Requirements;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of ingredient name to quantity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut reqs = Requirements(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((name, qty)) = access.next_entry::<String, u32>()? {
                    reqs.set(name, qty);
                }
                Ok(reqs)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// A beverage and what it takes to make it. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: String,
    requirements: Requirements,
}

impl Recipe {
    /// Create a recipe.
    pub fn new(name: impl Into<String>, requirements: Requirements) -> Self {
        Self {
            name: name.into(),
            requirements,
        }
    }

    /// Beverage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required ingredients in declared order.
    pub const fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

/// Read-only beverage catalog.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, Recipe>,
}

impl RecipeBook {
    /// Build a catalog from `(name, requirements)` pairs.
    pub fn new<I, S>(recipes: I) -> Self
    where
        I: IntoIterator<Item = (S, Requirements)>,
        S: Into<String>,
    {
        let recipes = recipes
            .into_iter()
            .map(|(name, reqs)| {
                let name = name.into();
                (name.clone(), Recipe::new(name, reqs))
            })
            .collect();
        Self { recipes }
    }

    /// Look up a recipe.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Beverage names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.recipes.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Ingredient name to ledger entry.
///
/// The map itself sits behind a `parking_lot::RwLock` because refills may
/// insert new ingredients; stock changes never take the write lock and go
/// straight to the entry's atomic counter.
#[derive(Debug, Default)]
pub struct IngredientStore {
    entries: RwLock<HashMap<String, Arc<Ingredient>>>,
}

impl IngredientStore {
    /// Build a store from initial stock levels.
    pub fn new<I, S>(stock: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let entries = stock
            .into_iter()
            .map(|(name, qty)| {
                let name = name.into();
                let ingredient = Arc::new(Ingredient::new(name.clone(), qty));
                (name, ingredient)
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Look up an ingredient.
    pub fn get(&self, name: &str) -> Option<Arc<Ingredient>> {
        self.entries.read().get(name).cloned()
    }

    /// Set the stock of `name`, registering it if it is new.
    pub fn upsert(&self, name: &str, quantity: u32) {
        if let Some(existing) = self.get(name) {
            existing.replenish(quantity);
            return;
        }
        self.entries
            .write()
            .entry(name.to_string())
            .and_modify(|existing| existing.replenish(quantity))
            .or_insert_with(|| Arc::new(Ingredient::new(name, quantity)));
    }

    /// Snapshot of ingredients whose stock is at or below `threshold`.
    pub fn below(&self, threshold: u32) -> BTreeMap<String, u32> {
        self.entries
            .read()
            .iter()
            .map(|(name, ingredient)| (name, ingredient.stock()))
            .filter(|(_, stock)| *stock <= threshold)
            .map(|(name, stock)| (name.clone(), stock))
            .collect()
    }

    /// Snapshot of every ingredient's stock.
    pub fn snapshot(&self) -> BTreeMap<String, u32> {
        self.below(u32::MAX)
    }
}

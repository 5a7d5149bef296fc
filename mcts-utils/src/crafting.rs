/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A crafting rule as found in rule files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    /// Items that must be present but are not used up.
    #[serde(default)]
    pub requires: BTreeMap<String, bool>,
    /// Items used up by the rule.
    #[serde(default)]
    pub consumes: BTreeMap<String, u32>,
    /// Items created by the rule.
    #[serde(default)]
    pub produces: BTreeMap<String, u32>,
    /// How long applying the rule takes.
    pub time: u32,
}

/// A complete crafting problem.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Crafting {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub initial: BTreeMap<String, u32>,
    pub goal: BTreeMap<String, u32>,
    pub recipes: BTreeMap<String, Rule>,
}

impl Crafting {
    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .map(|(name, rule)| Recipe::new(name, rule))
            .collect()
    }

    pub fn initial_inventory(&self) -> Inventory {
        self.initial
            .iter()
            .map(|(item, count)| (item.clone(), *count))
            .collect()
    }

    pub fn goal(&self) -> Goal {
        Goal(self.goal.clone())
    }
}

/// A counted set of items, zero counts are not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Inventory(BTreeMap<String, u32>);

impl Inventory {
    pub fn get(&self, item: &str) -> u32 {
        self.0.get(item).copied().unwrap_or(0)
    }

    pub fn set(&mut self, item: &str, count: u32) {
        if count == 0 {
            self.0.remove(item);
        } else {
            self.0.insert(item.to_owned(), count);
        }
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(item, count)| (item.as_str(), *count))
    }
}

impl FromIterator<(String, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        let mut inventory = Inventory::default();
        for (item, count) in iter {
            inventory.set(&item, count);
        }
        inventory
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (item, count)) in self.items().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}: {count}")?;
        }
        write!(f, "}}")
    }
}

/// A rule prepared for search: what it needs and how it changes an inventory.
#[derive(Clone, Debug)]
pub struct Recipe {
    pub name: String,
    required: Vec<(String, u32)>,
    consumed: Vec<(String, u32)>,
    produced: Vec<(String, u32)>,
    pub cost: u32,
}

impl Recipe {
    pub fn new(name: &str, rule: &Rule) -> Self {
        let mut required: BTreeMap<String, u32> = rule
            .requires
            .iter()
            .filter(|(_, required)| **required)
            .map(|(item, _)| (item.clone(), 1))
            .collect();
        for (item, amount) in &rule.consumes {
            let entry = required.entry(item.clone()).or_insert(0);
            *entry = (*entry).max(*amount);
        }
        Self {
            name: name.to_owned(),
            required: required.into_iter().collect(),
            consumed: rule.consumes.clone().into_iter().collect(),
            produced: rule.produces.clone().into_iter().collect(),
            cost: rule.time,
        }
    }

    /// Whether the recipe can be applied to `inventory`.
    pub fn check(&self, inventory: &Inventory) -> bool {
        self.required
            .iter()
            .all(|(item, amount)| inventory.get(item) >= *amount)
    }

    /// Returns the inventory after applying the recipe, which must pass [Recipe::check].
    pub fn apply(&self, inventory: &Inventory) -> Inventory {
        let mut next = inventory.clone();
        for (item, amount) in &self.consumed {
            next.set(item, next.get(item).saturating_sub(*amount));
        }
        for (item, amount) in &self.produced {
            next.set(item, next.get(item) + amount);
        }
        next
    }
}

/// Minimum item counts to reach.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Goal(pub BTreeMap<String, u32>);

impl Goal {
    pub fn is_goal(&self, inventory: &Inventory) -> bool {
        self.0
            .iter()
            .all(|(item, amount)| inventory.get(item) >= *amount)
    }
}

/// The result of a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    /// Inventories along the plan, each with the recipe that produced it.
    /// The first one is the initial inventory, with no recipe.
    pub steps: Vec<(Inventory, Option<String>)>,
    pub cost: u32,
}

impl Plan {
    /// The number of recipes applied.
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A heuristic that never prunes nor estimates, turning [search] into uniform-cost search.
pub fn no_heuristic(_inventory: &Inventory, _recipe: &str) -> Option<u32> {
    Some(0)
}

/// Returns a heuristic pruning inventories holding more than one of any of `tools`.
pub fn tool_heuristic(tools: &[&str]) -> impl Fn(&Inventory, &str) -> Option<u32> {
    let tools: Vec<String> = tools.iter().map(|tool| tool.to_string()).collect();
    move |inventory, _recipe| {
        if tools.iter().any(|tool| inventory.get(tool) > 1) {
            None
        } else {
            Some(0)
        }
    }
}

/// Searches for the cheapest sequence of recipes leading from `initial` to an inventory satisfying `goal`.
///
/// Inventories are expanded in order of cost plus `heuristic`, which receives the inventory
/// reached and the name of the recipe that reached it. A heuristic returning None discards
/// that inventory. Returns None if the goal is unreachable or `limit` is exceeded.
pub fn search<H>(
    recipes: &[Recipe],
    initial: Inventory,
    goal: &Goal,
    limit: Duration,
    heuristic: H,
) -> Option<Plan>
where
    H: Fn(&Inventory, &str) -> Option<u32>,
{
    let start = Instant::now();
    let mut dist: FxHashMap<Inventory, u32> = FxHashMap::default();
    let mut parent: FxHashMap<Inventory, (Inventory, String)> = FxHashMap::default();
    let mut queue = BinaryHeap::new();
    dist.insert(initial.clone(), 0);
    queue.push(Reverse((0, 0, initial)));

    while let Some(Reverse((_, cost, inventory))) = queue.pop() {
        if start.elapsed() > limit {
            log::info!(
                "Search exceeded its time limit of {:?} after visiting {} inventories",
                limit,
                dist.len()
            );
            return None;
        }

        if dist.get(&inventory).map_or(false, |best| cost > *best) {
            continue;
        }

        if goal.is_goal(&inventory) {
            let mut steps = Vec::new();
            let mut current = inventory;
            while let Some((previous, recipe)) = parent.remove(&current) {
                steps.push((current, Some(recipe)));
                current = previous;
            }
            steps.push((current, None));
            steps.reverse();
            log::info!(
                "Found plan of cost {cost} with {} steps in {:?}",
                steps.len() - 1,
                start.elapsed()
            );
            return Some(Plan { steps, cost });
        }

        for recipe in recipes.iter().filter(|recipe| recipe.check(&inventory)) {
            let next = recipe.apply(&inventory);
            let next_cost = cost + recipe.cost;
            if dist.get(&next).map_or(false, |known| next_cost >= *known) {
                continue;
            }
            let estimate = match heuristic(&next, &recipe.name) {
                Some(estimate) => estimate,
                None => continue,
            };
            dist.insert(next.clone(), next_cost);
            parent.insert(next.clone(), (inventory.clone(), recipe.name.clone()));
            queue.push(Reverse((next_cost + estimate, next_cost, next)));
        }
    }

    log::info!(
        "No plan found after visiting {} inventories in {:?}",
        dist.len(),
        start.elapsed()
    );
    None
}

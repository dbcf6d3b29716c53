//! Tag-based element categorization

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Element, FetchResult};

/// Semantic bucket an element can be sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Buildings,
    Roads,
    Water,
    Forests,
    Poi,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Self; 5] = [
        Self::Buildings,
        Self::Roads,
        Self::Water,
        Self::Forests,
        Self::Poi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buildings => "buildings",
            Self::Roads => "roads",
            Self::Water => "water",
            Self::Forests => "forests",
            Self::Poi => "poi",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const POI_KEYS: [&str; 3] = ["amenity", "shop", "tourism"];

/// Assign an element to a category. First matching rule wins:
///
/// 1. `building=*` → buildings
/// 2. `highway=*` → roads
/// 3. `natural=water` → water
/// 4. `natural=wood` → forests
/// 5. `waterway=*` → water
/// 6. `amenity=*`, `shop=*` or `tourism=*` → poi
///
/// Anything else is unclassified and yields `None`.
pub fn classify(element: &Element) -> Option<Category> {
    if element.has_tag("building") {
        return Some(Category::Buildings);
    }
    if element.has_tag("highway") {
        return Some(Category::Roads);
    }
    match element.tag("natural") {
        Some("water") => return Some(Category::Water),
        Some("wood") => return Some(Category::Forests),
        _ => {}
    }
    // kept separate from natural=water; both land in the same bucket
    if element.has_tag("waterway") {
        return Some(Category::Water);
    }
    if POI_KEYS.iter().any(|key| element.has_tag(key)) {
        return Some(Category::Poi);
    }
    None
}

/// Elements grouped per category, each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedResult {
    pub buildings: Vec<Element>,
    pub roads: Vec<Element>,
    pub water: Vec<Element>,
    pub forests: Vec<Element>,
    pub poi: Vec<Element>,
}

impl CategorizedResult {
    pub fn get(&self, category: Category) -> &[Element] {
        match category {
            Category::Buildings => &self.buildings,
            Category::Roads => &self.roads,
            Category::Water => &self.water,
            Category::Forests => &self.forests,
            Category::Poi => &self.poi,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<Element> {
        match category {
            Category::Buildings => &mut self.buildings,
            Category::Roads => &mut self.roads,
            Category::Water => &mut self.water,
            Category::Forests => &mut self.forests,
            Category::Poi => &mut self.poi,
        }
    }

    /// Element count per category, in output order.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.get(category).len()))
            .collect()
    }

    /// Number of classified elements across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|&c| self.get(c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition the fetched elements into categories; unclassified ones are dropped.
pub fn categorize(result: &FetchResult) -> CategorizedResult {
    let mut categorized = CategorizedResult::default();
    for element in &result.elements {
        if let Some(category) = classify(element) {
            categorized.bucket_mut(category).push(element.clone());
        }
    }
    categorized
}

//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::category::CategorizedResult;
use crate::domain::DomainError;

/// Rectangular area given by its south/west/north/east limits in degrees.
///
/// Only constructible through [`BoundingBox::new`], so every instance satisfies
/// `south < north` and `west < east` within the WGS84 coordinate ranges.
/// Deserialization runs the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

/// Unvalidated bounding box as it appears on the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawBoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = DomainError;

    fn try_from(raw: RawBoundingBox) -> Result<Self, Self::Error> {
        Self::new(raw.south, raw.west, raw.north, raw.east)
    }
}

impl BoundingBox {
    /// Vennesla, Norway.
    pub const VENNESLA: Self = Self {
        south: 58.25,
        west: 7.90,
        north: 58.35,
        east: 8.05,
    };

    /// Create a validated bounding box.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, DomainError> {
        let invalid =
            |reason: String| -> Result<Self, DomainError> { Err(DomainError::InvalidBoundingBox { reason }) };

        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return invalid("coordinates must be finite numbers".into());
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return invalid(format!(
                "latitudes must lie within [-90, 90] (south={south}, north={north})"
            ));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return invalid(format!(
                "longitudes must lie within [-180, 180] (west={west}, east={east})"
            ));
        }
        if south >= north {
            return invalid(format!("south ({south}) must be less than north ({north})"));
        }
        if west >= east {
            return invalid(format!("west ({west}) must be less than east ({east})"));
        }

        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::VENNESLA
    }
}

/// Overpass bbox notation: `south,west,north,east`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for BoundingBox {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || DomainError::InvalidBoundingBoxSyntax { input: s.to_string() };

        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| syntax())?;

        match values.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(syntax()),
        }
    }
}

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

/// One mapped feature as returned by Overpass.
///
/// Only `id`, `type` and `tags` are interpreted. Everything else (coordinates,
/// node references, members, geometry) is carried verbatim in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Element {
    /// Value of tag `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(|tags| tags.get(key))
            .map(String::as_str)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }
}

/// Parsed Overpass response: the element list plus whatever service metadata
/// (`version`, `generator`, `osm3s`, `remark`, ...) came with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub elements: Vec<Element>,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl FetchResult {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Server-side remark; Overpass reports runtime errors and truncation here.
    pub fn remark(&self) -> Option<&str> {
        self.meta.get("remark").and_then(Value::as_str)
    }
}

/// Metadata block of a categorized output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub area: String,
    pub bbox: BoundingBox,
    pub total_elements: usize,
}

/// What ends up in the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputDocument {
    Categorized {
        metadata: Metadata,
        categorized: CategorizedResult,
        raw: FetchResult,
    },
    Raw(FetchResult),
}

impl OutputDocument {
    /// Wrap a fetch result together with its categorization and run metadata.
    pub fn categorized(area: impl Into<String>, bbox: BoundingBox, raw: FetchResult) -> Self {
        let categorized = crate::domain::category::categorize(&raw);
        Self::Categorized {
            metadata: Metadata {
                area: area.into(),
                bbox,
                total_elements: raw.elements.len(),
            },
            categorized,
            raw,
        }
    }

    pub fn categorized_result(&self) -> Option<&CategorizedResult> {
        match self {
            Self::Categorized { categorized, .. } => Some(categorized),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> &FetchResult {
        match self {
            Self::Categorized { raw, .. } | Self::Raw(raw) => raw,
        }
    }
}

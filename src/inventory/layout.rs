//! Freezer configuration table: names, container kinds, and grid shapes.
//!
//! The table is data, not logic. Two built-in presets cover the product
//! configurations in use, and a custom table can be supplied from config.
//! Every entry is validated once at construction so the rest of the crate
//! can index grids without re-checking shapes.

#![allow(missing_docs)]

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::{FrzError, Result};

/// Fixed number of physical slots in every freezer.
pub const SLOTS_PER_FREEZER: usize = 24;

/// Half-open range of slot indices attributed to one container type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub start: usize,
    pub end: usize,
}

impl Zone {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub const fn contains(self, slot: usize) -> bool {
        slot >= self.start && slot < self.end
    }

    const fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How a freezer's grid is interpreted for accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Every slot holds a pot.
    Pote,
    /// Every slot holds a box.
    Caixa,
    /// The grid is split between a pot zone and a box zone.
    Split { pote: Zone, caixa: Zone },
}

impl ContainerKind {
    /// The "Metade" configuration: first half pots, second half boxes.
    pub const METADE: Self = Self::Split {
        pote: Zone::new(0, SLOTS_PER_FREEZER / 2),
        caixa: Zone::new(SLOTS_PER_FREEZER / 2, SLOTS_PER_FREEZER),
    };

    /// Short label shown next to the freezer name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pote => "Pote",
            Self::Caixa => "Caixa",
            Self::Split { .. } => "Metade",
        }
    }

    fn validate(self) -> std::result::Result<(), String> {
        if let Self::Split { pote, caixa } = self {
            if pote.is_empty() || caixa.is_empty() {
                return Err("split zones must not be empty".to_string());
            }
            if pote.end > SLOTS_PER_FREEZER || caixa.end > SLOTS_PER_FREEZER {
                return Err(format!("split zones must lie within 0..{SLOTS_PER_FREEZER}"));
            }
            if pote.overlaps(caixa) {
                return Err("split zones must not overlap".to_string());
            }
            if pote.len() + caixa.len() != SLOTS_PER_FREEZER {
                return Err(format!(
                    "split zones must cover all {SLOTS_PER_FREEZER} slots"
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Freezer type as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreezerType {
    Pote,
    Caixa,
    Metade,
}

impl From<FreezerType> for ContainerKind {
    fn from(value: FreezerType) -> Self {
        match value {
            FreezerType::Pote => Self::Pote,
            FreezerType::Caixa => Self::Caixa,
            FreezerType::Metade => Self::METADE,
        }
    }
}

/// One configured freezer entry as written in `[[layout.freezers]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezerSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FreezerType,
    pub cols: usize,
    pub rows: usize,
}

/// A validated freezer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezerConfig {
    pub id: usize,
    pub name: String,
    pub kind: ContainerKind,
    pub cols: usize,
    pub rows: usize,
}

impl FreezerConfig {
    /// Build and validate one entry.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        kind: ContainerKind,
        cols: usize,
        rows: usize,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FrzError::InvalidConfig {
                details: format!("freezer #{} has an empty name", id + 1),
            });
        }
        if cols.checked_mul(rows) != Some(SLOTS_PER_FREEZER) {
            return Err(FrzError::InvalidConfig {
                details: format!(
                    "freezer {name:?}: cols x rows must equal {SLOTS_PER_FREEZER}, got {cols} x {rows}"
                ),
            });
        }
        kind.validate().map_err(|details| FrzError::InvalidConfig {
            details: format!("freezer {name:?}: {details}"),
        })?;
        Ok(Self {
            id,
            name,
            kind,
            cols,
            rows,
        })
    }

    /// Selector label, e.g. `HK/Festa (Metade)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Built-in freezer tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// Named freezers including the half-and-half "HK/Festa".
    #[default]
    Named,
    /// Generic "Freezer N" entries: one box freezer, the rest pots.
    Numbered,
}

impl LayoutPreset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Named => "named",
            Self::Numbered => "numbered",
        }
    }

    /// Entries of this preset in configuration form.
    #[must_use]
    pub fn specs(self) -> Vec<FreezerSpec> {
        const FREEZER_COUNT: usize = 13;
        (0..FREEZER_COUNT)
            .map(|i| {
                let (name, kind) = match (self, i) {
                    (Self::Named, 0) => ("Caixas".to_string(), FreezerType::Caixa),
                    (Self::Named, 12) => ("HK/Festa".to_string(), FreezerType::Metade),
                    (Self::Numbered, 0) => (format!("Freezer {}", i + 1), FreezerType::Caixa),
                    _ => (format!("Freezer {}", i + 1), FreezerType::Pote),
                };
                let (cols, rows) = if kind == FreezerType::Caixa { (8, 3) } else { (6, 4) };
                FreezerSpec {
                    name,
                    kind,
                    cols,
                    rows,
                }
            })
            .collect()
    }
}

impl FromStr for LayoutPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "named" => Ok(Self::Named),
            "numbered" => Ok(Self::Numbered),
            other => Err(format!("unknown layout preset {other:?} (named|numbered)")),
        }
    }
}

/// Ordered, non-empty, validated freezer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    freezers: Vec<FreezerConfig>,
}

impl Layout {
    /// Validate a table given in configuration form.
    pub fn from_specs(specs: &[FreezerSpec]) -> Result<Self> {
        if specs.is_empty() {
            return Err(FrzError::InvalidConfig {
                details: "layout must contain at least one freezer".to_string(),
            });
        }
        let freezers = specs
            .iter()
            .enumerate()
            .map(|(id, spec)| {
                FreezerConfig::new(id, spec.name.clone(), spec.kind.into(), spec.cols, spec.rows)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { freezers })
    }

    /// Layout of a built-in preset.
    #[must_use]
    pub fn preset(preset: LayoutPreset) -> Self {
        let freezers = preset
            .specs()
            .into_iter()
            .enumerate()
            .map(|(id, spec)| FreezerConfig {
                id,
                name: spec.name,
                kind: spec.kind.into(),
                cols: spec.cols,
                rows: spec.rows,
            })
            .collect();
        Self { freezers }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.freezers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.freezers.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FreezerConfig> {
        self.freezers.get(index)
    }

    /// Like [`Layout::get`] but reports an out-of-range index as an error.
    pub fn freezer(&self, index: usize) -> Result<&FreezerConfig> {
        self.freezers.get(index).ok_or(FrzError::FreezerOutOfRange {
            index,
            count: self.freezers.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreezerConfig> {
        self.freezers.iter()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::preset(LayoutPreset::default())
    }
}

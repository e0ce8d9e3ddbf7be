//! Energy sectors and their compiled-in feed metadata
//!
//! The Ontario Energy Board publishes one XML document per sector. Everything
//! needed to read a sector's document (URL, row tag, the two tags used to
//! build a company's display name, unit label) is static and lives here.

use crate::error::{GridTariffError, Result};
use serde::{Deserialize, Serialize};

/// Tariff feed sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Electricity,
    NaturalGas,
}

/// Static per-sector feed constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorMetadata {
    /// Feed URL for this sector's XML document
    pub url: &'static str,
    /// Tag of the repeated row elements under the document root
    pub row_tag: &'static str,
    /// Tag holding the distributor name inside a row
    pub name_tag: &'static str,
    /// Tag holding the rate class (electricity) or service area (gas)
    pub class_tag: &'static str,
    /// Human-readable sector title used in display names
    pub title: &'static str,
    /// Unit label for the sector's rates
    pub unit_of_measure: &'static str,
}

const ELECTRICITY_METADATA: SectorMetadata = SectorMetadata {
    url: "https://www.oeb.ca/_html/calculator/data/BillData.xml",
    row_tag: "BillDataRow",
    name_tag: "Dist",
    class_tag: "Class",
    title: "Electricity",
    unit_of_measure: "CA$/kWh",
};

const NATURAL_GAS_METADATA: SectorMetadata = SectorMetadata {
    url: "https://www.oeb.ca/_html/calculator/data/GasBillData.xml",
    row_tag: "GasBillData",
    name_tag: "Dist",
    class_tag: "SA",
    title: "Natural Gas",
    unit_of_measure: "CA$/m³",
};

/// Both sectors, in listing order
pub const ALL_SECTORS: [Sector; 2] = [Sector::Electricity, Sector::NaturalGas];

impl Sector {
    /// Metadata for this sector's feed
    pub const fn metadata(self) -> &'static SectorMetadata {
        match self {
            Sector::Electricity => &ELECTRICITY_METADATA,
            Sector::NaturalGas => &NATURAL_GAS_METADATA,
        }
    }

    /// Stable snake_case label, as persisted in configuration and attributes
    pub const fn as_str(self) -> &'static str {
        match self {
            Sector::Electricity => "electricity",
            Sector::NaturalGas => "natural_gas",
        }
    }

    /// Recover the sector from a stored display name by its `[...]` suffix
    ///
    /// Display names end in `[Electricity]` or `[Natural Gas]`; the suffix is
    /// the only part of the name with fixed content.
    pub fn from_display_name(display_name: &str) -> Result<Self> {
        for sector in ALL_SECTORS {
            if display_name.ends_with(&format!("[{}]", sector.metadata().title)) {
                return Ok(sector);
            }
        }
        Err(GridTariffError::validation(
            "company.display_name",
            "display name must end in [Electricity] or [Natural Gas]",
        ))
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

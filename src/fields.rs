//! Raw feed tag to descriptive field name tables
//!
//! The OEB feeds use terse XML tags (`RPP1`, `DCT3`, `ULO_onp`). Each sector
//! has a compiled-in table renaming every published tariff tag to a
//! descriptive snake_case field name. Tags in neither the table nor the
//! excluded set are unrecognized: skipped at runtime, a hard failure in the
//! offline `feed_check` validator.

use crate::sector::Sector;

/// Container and bookkeeping tags that carry no tariff data
///
/// `Lic` and `ExtID` are the distributor's licence and external identifiers.
pub const EXCLUDED_TAGS: [&str; 4] = ["BillDataRow", "GasBillData", "Lic", "ExtID"];

/// Electricity feed tags, one entry per published tariff field
const ELECTRICITY_FIELDS: &[(&str, &str)] = &[
    ("Dist", "distributor_name"),
    ("Class", "rate_class"),
    // Tiered (non-TOU) regulated price plan
    ("RPP1", "lower_tier_price"),
    ("RPP2", "higher_tier_price"),
    ("TH_S", "summer_tier_threshold"),
    ("TH_W", "winter_tier_threshold"),
    // Time-of-use regulated price plan
    ("RPPOnP", "time_of_use_on_peak_price"),
    ("RPPMidP", "time_of_use_mid_peak_price"),
    ("RPPOffP", "time_of_use_off_peak_price"),
    // Ultra-low-overnight plan
    ("ULO_onp", "ultra_low_overnight_on_peak_rate"),
    ("ULO_midp", "ultra_low_overnight_mid_peak_rate"),
    ("ULO_offp", "ultra_low_overnight_off_peak_rate"),
    ("ULO_ov", "ultra_low_overnight_overnight_rate"),
    // Fixed and volumetric delivery charges
    ("SC", "service_charge"),
    ("DCT1", "distribution_charge_tier_1"),
    ("DCT2", "distribution_charge_tier_2"),
    ("DCT3", "distribution_charge_tier_3"),
    ("DCT4", "distribution_charge_tier_4"),
    ("DTH1", "distribution_tier_threshold_1"),
    ("DTH2", "distribution_tier_threshold_2"),
    ("DTH3", "distribution_tier_threshold_3"),
    ("LV", "low_voltage_service_rate"),
    ("Loss", "loss_adjustment_factor"),
    // Retail transmission service rates
    ("TxN", "retail_transmission_network_rate"),
    ("TxC", "retail_transmission_connection_rate"),
    // Regulatory line items
    ("WMS", "wholesale_market_service_rate"),
    ("CBR", "capacity_based_recovery_rate"),
    ("RRRP", "rural_remote_rate_protection_charge"),
    ("SSS", "standard_supply_service_charge"),
    ("SME", "smart_metering_entity_charge"),
    ("DRP", "distribution_rate_protection_credit"),
    ("GA", "global_adjustment_rate"),
    ("OER", "ontario_electricity_rebate_percent"),
    ("HST", "harmonized_sales_tax_percent"),
];

/// Natural gas feed tags
const NATURAL_GAS_FIELDS: &[(&str, &str)] = &[
    ("Dist", "distributor_name"),
    ("SA", "service_area"),
    ("GSC", "gas_supply_charge"),
    ("GPA", "gas_price_adjustment"),
    ("TCC", "transportation_charge"),
    ("TPA", "transportation_price_adjustment"),
    ("STC", "storage_charge"),
    ("SPA", "storage_price_adjustment"),
    ("MSC", "monthly_service_charge"),
    ("DelT1", "delivery_charge_tier_1"),
    ("DelT2", "delivery_charge_tier_2"),
    ("DelT3", "delivery_charge_tier_3"),
    ("DelT4", "delivery_charge_tier_4"),
    ("DPA", "delivery_price_adjustment"),
    ("CCR", "federal_carbon_charge"),
    ("FCC", "facility_carbon_charge"),
    ("HST", "harmonized_sales_tax_percent"),
];

/// Full tag table for a sector
pub const fn field_table(sector: Sector) -> &'static [(&'static str, &'static str)] {
    match sector {
        Sector::Electricity => ELECTRICITY_FIELDS,
        Sector::NaturalGas => NATURAL_GAS_FIELDS,
    }
}

/// Descriptive name for a raw feed tag, if the tag is a known tariff field
pub fn descriptive_name(sector: Sector, tag: &str) -> Option<&'static str> {
    field_table(sector)
        .iter()
        .find(|(raw, _)| *raw == tag)
        .map(|(_, name)| *name)
}

/// Whether a tag is a container/bookkeeping tag carrying no tariff data
pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS.contains(&tag)
}

/// Two-way difference between a feed row's tag set and the compiled table
///
/// Produced by comparing the tags observed in a live feed row against
/// [`field_table`] for the same sector. Either side being non-empty means the
/// table is out of date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCoverage {
    /// Tags present in the feed but absent from the table (new data points)
    pub missing_locally: Vec<String>,
    /// Tags present in the table but absent from the feed (removed data points)
    pub stale_locally: Vec<String>,
}

impl FieldCoverage {
    /// True when the table and the feed agree exactly
    pub fn is_complete(&self) -> bool {
        self.missing_locally.is_empty() && self.stale_locally.is_empty()
    }
}

/// Diff the observed tags of one feed row against the sector's table
///
/// Excluded tags are ignored on both sides. Results are sorted so the
/// validator output is stable.
pub fn coverage_gaps<S: AsRef<str>>(sector: Sector, observed_tags: &[S]) -> FieldCoverage {
    let observed: Vec<&str> = observed_tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|tag| !is_excluded_tag(tag))
        .collect();

    let mut missing_locally: Vec<String> = observed
        .iter()
        .filter(|tag| descriptive_name(sector, tag).is_none())
        .map(|tag| (*tag).to_string())
        .collect();
    let mut stale_locally: Vec<String> = field_table(sector)
        .iter()
        .filter(|(raw, _)| !observed.contains(raw))
        .map(|(raw, _)| (*raw).to_string())
        .collect();

    missing_locally.sort_unstable();
    missing_locally.dedup();
    stale_locally.sort_unstable();

    FieldCoverage {
        missing_locally,
        stale_locally,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve() {
        assert_eq!(
            descriptive_name(Sector::Electricity, "RPP1"),
            Some("lower_tier_price")
        );
        assert_eq!(
            descriptive_name(Sector::Electricity, "ULO_onp"),
            Some("ultra_low_overnight_on_peak_rate")
        );
        assert_eq!(
            descriptive_name(Sector::NaturalGas, "GSC"),
            Some("gas_supply_charge")
        );
        assert_eq!(descriptive_name(Sector::Electricity, "GSC"), None);
    }

    #[test]
    fn excluded_tags_are_not_fields() {
        for tag in EXCLUDED_TAGS {
            assert!(is_excluded_tag(tag));
            assert_eq!(descriptive_name(Sector::Electricity, tag), None);
            assert_eq!(descriptive_name(Sector::NaturalGas, tag), None);
        }
    }

    #[test]
    fn no_duplicate_tags_or_names_per_sector() {
        for sector in [Sector::Electricity, Sector::NaturalGas] {
            let table = field_table(sector);
            for (i, (raw, name)) in table.iter().enumerate() {
                for (other_raw, other_name) in &table[i + 1..] {
                    assert_ne!(raw, other_raw, "duplicate tag in {sector}");
                    assert_ne!(name, other_name, "duplicate name in {sector}");
                }
            }
        }
    }

    #[test]
    fn coverage_gaps_both_directions() {
        let mut observed: Vec<String> = field_table(Sector::NaturalGas)
            .iter()
            .map(|(raw, _)| (*raw).to_string())
            .collect();
        observed.push("GasBillData".to_string());
        observed.push("Lic".to_string());
        assert!(coverage_gaps(Sector::NaturalGas, &observed).is_complete());

        observed.push("NewTag".to_string());
        observed.retain(|t| t != "GSC");
        let coverage = coverage_gaps(Sector::NaturalGas, &observed);
        assert_eq!(coverage.missing_locally, vec!["NewTag".to_string()]);
        assert_eq!(coverage.stale_locally, vec!["GSC".to_string()]);
        assert!(!coverage.is_complete());
    }
}

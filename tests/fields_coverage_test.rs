use gridtariff::feed::parse_first_row_tags;
use gridtariff::fields::{EXCLUDED_TAGS, coverage_gaps, field_table};
use gridtariff::sector::{ALL_SECTORS, Sector};

/// Build a feed body whose first row carries exactly the given tags.
fn feed_with_tags(sector: Sector, tags: &[&str]) -> String {
    let row_tag = sector.metadata().row_tag;
    let mut body = String::from("<NewDataSet>\n  <");
    body.push_str(row_tag);
    body.push_str(">\n");
    for tag in tags {
        body.push_str(&format!("    <{}>1.0</{}>\n", tag, tag));
    }
    body.push_str(&format!("  </{}>\n</NewDataSet>", row_tag));
    body
}

#[test]
fn complete_row_passes_for_both_sectors() {
    for sector in ALL_SECTORS {
        let mut tags: Vec<&str> = field_table(sector).iter().map(|(raw, _)| *raw).collect();
        tags.push("Lic");
        tags.push("ExtID");
        let body = feed_with_tags(sector, &tags);
        let observed = parse_first_row_tags(sector, &body).unwrap();
        let coverage = coverage_gaps(sector, &observed);
        assert!(coverage.is_complete(), "{}: {:?}", sector, coverage);
    }
}

#[test]
fn new_feed_tag_is_reported() {
    let mut tags: Vec<&str> = field_table(Sector::Electricity)
        .iter()
        .map(|(raw, _)| *raw)
        .collect();
    tags.push("BrandNew");
    let body = feed_with_tags(Sector::Electricity, &tags);
    let observed = parse_first_row_tags(Sector::Electricity, &body).unwrap();
    let coverage = coverage_gaps(Sector::Electricity, &observed);
    assert_eq!(coverage.missing_locally, vec!["BrandNew".to_string()]);
    assert!(coverage.stale_locally.is_empty());
}

#[test]
fn removed_feed_tag_is_reported() {
    let tags: Vec<&str> = field_table(Sector::NaturalGas)
        .iter()
        .map(|(raw, _)| *raw)
        .filter(|raw| *raw != "GSC")
        .collect();
    let body = feed_with_tags(Sector::NaturalGas, &tags);
    let observed = parse_first_row_tags(Sector::NaturalGas, &body).unwrap();
    let coverage = coverage_gaps(Sector::NaturalGas, &observed);
    assert!(coverage.missing_locally.is_empty());
    assert_eq!(coverage.stale_locally, vec!["GSC".to_string()]);
}

#[test]
fn excluded_tags_never_flag_either_side() {
    for sector in ALL_SECTORS {
        let observed: Vec<String> = field_table(sector)
            .iter()
            .map(|(raw, _)| (*raw).to_string())
            .chain(EXCLUDED_TAGS.iter().map(|t| (*t).to_string()))
            .collect();
        assert!(coverage_gaps(sector, &observed).is_complete());
    }
}

#[test]
fn every_peak_rate_field_exists_in_the_electricity_table() {
    use gridtariff::peak::PeakState;
    let names: Vec<&str> = field_table(Sector::Electricity)
        .iter()
        .map(|(_, name)| *name)
        .collect();
    for peak in [
        PeakState::OnPeak,
        PeakState::MidPeak,
        PeakState::OffPeak,
        PeakState::UloOnPeak,
        PeakState::UloMidPeak,
        PeakState::UloOffPeak,
        PeakState::UloOvernight,
    ] {
        let field = peak.rate_field().unwrap();
        assert!(names.contains(&field), "{} missing", field);
    }
}

#[test]
fn gas_supply_charge_exists_in_the_gas_table() {
    assert!(
        field_table(Sector::NaturalGas)
            .iter()
            .any(|(_, name)| *name == "gas_supply_charge")
    );
}

//! OEB feed fetching and row mapping
//!
//! One bounded-timeout GET per cycle against the sector's XML feed, then a
//! scan for the row whose synthesized display name exactly matches the
//! configured company. Matching is case- and punctuation-sensitive; the
//! display name is the identity key. Parsing is split out as pure functions
//! over the response body so tests never touch the network.

use crate::error::{GridTariffError, Result};
use crate::fields;
use crate::sector::{ALL_SECTORS, Sector};
use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// One mapped field value from a feed row
///
/// The feed carries everything as element text; values that parse as floats
/// become numbers, everything else stays text, and elements with no text at
/// all map to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    fn from_text(text: Option<&str>) -> Self {
        match text {
            None | Some("") => FieldValue::Empty,
            Some(s) => match s.parse::<f64>() {
                Ok(n) => FieldValue::Number(n),
                Err(_) => FieldValue::Text(s.to_string()),
            },
        }
    }

    /// Numeric view, if this value is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// Descriptive-field-name view of one matched feed row
pub type CompanyData = BTreeMap<String, FieldValue>;

/// Synthesize the display name identifying one feed row
///
/// Format is fixed: `"{name} ({class}) [{SectorTitle}]"`.
pub fn format_company_name(name: &str, class: &str, sector: Sector) -> String {
    format!("{} ({}) [{}]", name, class, sector.metadata().title)
}

/// A feed row as a flat list of (tag, text) children, document order
type RawRow = Vec<(String, Option<String>)>;

fn parse_rows(xml: &str, row_tag: &str) -> Result<Vec<RawRow>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows: Vec<RawRow> = Vec::new();
    let mut current_row: Option<RawRow> = None;
    let mut current_tag: Option<String> = None;
    let mut current_text: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if current_row.is_none() {
                    if tag == row_tag {
                        current_row = Some(Vec::new());
                    }
                } else {
                    current_tag = Some(tag);
                    current_text = None;
                }
            }
            Event::Empty(e) => {
                if let Some(row) = current_row.as_mut() {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    row.push((tag, None));
                }
            }
            Event::Text(t) => {
                if current_tag.is_some() {
                    current_text = Some(t.unescape()?.into_owned());
                }
            }
            Event::End(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if current_tag.as_deref() == Some(tag.as_str()) {
                    if let Some(row) = current_row.as_mut() {
                        row.push((tag, current_text.take()));
                    }
                    current_tag = None;
                } else if tag == row_tag {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}

fn row_display_name(row: &RawRow, sector: Sector) -> Option<String> {
    let meta = sector.metadata();
    let text_of = |wanted: &str| {
        row.iter()
            .find(|(tag, _)| tag == wanted)
            .and_then(|(_, text)| text.as_deref())
    };
    let name = text_of(meta.name_tag)?;
    let class = text_of(meta.class_tag)?;
    Some(format_company_name(name, class, sector))
}

/// Every display name in a sector's feed body, document order
pub fn parse_company_names(sector: Sector, xml: &str) -> Result<Vec<String>> {
    let rows = parse_rows(xml, sector.metadata().row_tag)?;
    Ok(rows
        .iter()
        .filter_map(|row| row_display_name(row, sector))
        .collect())
}

/// Merge per-sector name listings into one directory
///
/// Global alphabetical order across sectors; a name appearing in more than
/// one listing is kept once.
pub fn merge_company_lists(lists: Vec<Vec<String>>) -> Vec<String> {
    let mut names: Vec<String> = lists.into_iter().flatten().collect();
    names.sort();
    names.dedup();
    names
}

/// Map the row matching `target` out of a sector's feed body
///
/// Exact string equality against the synthesized display name; no fuzzy
/// matching, no case folding. Tags outside the sector's field table are
/// dropped here (the `feed_check` validator exists to catch them).
pub fn parse_company_data(sector: Sector, xml: &str, target: &str) -> Result<CompanyData> {
    for row in parse_rows(xml, sector.metadata().row_tag)? {
        if row_display_name(&row, sector).as_deref() != Some(target) {
            continue;
        }
        let mut data = CompanyData::new();
        for (tag, text) in &row {
            if fields::is_excluded_tag(tag) {
                continue;
            }
            if let Some(field) = fields::descriptive_name(sector, tag) {
                data.insert(field.to_string(), FieldValue::from_text(text.as_deref()));
            }
        }
        return Ok(data);
    }
    Err(GridTariffError::not_found(target))
}

/// Tags observed in the first row of a sector's feed body
///
/// Used by the offline validator to diff the live feed against the compiled
/// field table.
pub fn parse_first_row_tags(sector: Sector, xml: &str) -> Result<Vec<String>> {
    let mut rows = parse_rows(xml, sector.metadata().row_tag)?;
    let first = rows.drain(..).next().ok_or_else(|| {
        GridTariffError::parse(format!("feed for {} contains no rows", sector))
    })?;
    Ok(first.into_iter().map(|(tag, _)| tag).collect())
}

/// Capability to fetch tariff data for a configured company
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch and map the row for `company_display_name` in `sector`
    async fn fetch(&self, sector: Sector, company_display_name: &str) -> Result<CompanyData>;

    /// All company display names across both sectors, sorted and deduplicated
    ///
    /// Used once at setup time to populate a selection list; not part of the
    /// steady-state polling path.
    async fn list_companies(&self) -> Result<Vec<String>>;
}

/// HTTP-backed [`RateSource`] against the live OEB feeds
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    /// Build a client with a hard per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gridtariff/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn get_feed(&self, sector: Sector) -> Result<String> {
        let url = sector.metadata().url;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GridTariffError::transport(format!(
                "feed {} returned HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response.text().await?)
    }

    /// Fetch one sector's raw feed body
    pub async fn fetch_feed_body(&self, sector: Sector) -> Result<String> {
        self.get_feed(sector).await
    }
}

#[async_trait]
impl RateSource for FeedClient {
    async fn fetch(&self, sector: Sector, company_display_name: &str) -> Result<CompanyData> {
        let body = self.get_feed(sector).await?;
        parse_company_data(sector, &body, company_display_name)
    }

    async fn list_companies(&self) -> Result<Vec<String>> {
        let mut per_sector = Vec::new();
        for sector in ALL_SECTORS {
            let body = self.get_feed(sector).await?;
            per_sector.push(parse_company_names(sector, &body)?);
        }
        Ok(merge_company_lists(per_sector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<NewDataSet>
  <BillDataRow>
    <Dist>Alectra Utilities</Dist>
    <Class>RESIDENTIAL</Class>
    <RPPOnP>0.158</RPPOnP>
    <RPPMidP>0.122</RPPMidP>
    <RPPOffP>0.076</RPPOffP>
    <RPP1>0.098</RPP1>
    <Lic>ED-2002-0561</Lic>
    <Mystery>42</Mystery>
    <DRP/>
  </BillDataRow>
  <BillDataRow>
    <Dist>Hydro One Networks</Dist>
    <Class>RESIDENTIAL - R1</Class>
    <RPPOnP>0.158</RPPOnP>
  </BillDataRow>
</NewDataSet>"#;

    #[test]
    fn synthesizes_display_names_in_document_order() {
        let names = parse_company_names(Sector::Electricity, SAMPLE).unwrap();
        assert_eq!(
            names,
            vec![
                "Alectra Utilities (RESIDENTIAL) [Electricity]",
                "Hydro One Networks (RESIDENTIAL - R1) [Electricity]",
            ]
        );
    }

    #[test]
    fn exact_match_maps_row() {
        let data = parse_company_data(
            Sector::Electricity,
            SAMPLE,
            "Alectra Utilities (RESIDENTIAL) [Electricity]",
        )
        .unwrap();
        assert_eq!(
            data.get("time_of_use_on_peak_price"),
            Some(&FieldValue::Number(0.158))
        );
        assert_eq!(data.get("lower_tier_price"), Some(&FieldValue::Number(0.098)));
        assert_eq!(
            data.get("distributor_name"),
            Some(&FieldValue::Text("Alectra Utilities".to_string()))
        );
        // Empty element maps to Empty, licence tag is excluded, unknown tag dropped.
        assert_eq!(
            data.get("distribution_rate_protection_credit"),
            Some(&FieldValue::Empty)
        );
        assert!(!data.values().any(|v| *v == FieldValue::Text("ED-2002-0561".into())));
        assert!(!data.contains_key("Mystery"));
    }

    #[test]
    fn match_is_case_sensitive() {
        let err = parse_company_data(
            Sector::Electricity,
            SAMPLE,
            "alectra utilities (residential) [electricity]",
        )
        .unwrap_err();
        assert!(matches!(err, GridTariffError::NotFound { .. }));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_company_names(
            Sector::Electricity,
            "<NewDataSet><BillDataRow></Oops></NewDataSet>",
        )
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, GridTariffError::Parse { .. }));
    }

    #[test]
    fn first_row_tags_include_excluded_and_unknown() {
        let tags = parse_first_row_tags(Sector::Electricity, SAMPLE).unwrap();
        assert!(tags.contains(&"Lic".to_string()));
        assert!(tags.contains(&"Mystery".to_string()));
        assert!(tags.contains(&"DRP".to_string()));
    }

    #[test]
    fn merged_directory_is_sorted_and_deduplicated() {
        let electricity = vec![
            "Hydro One Networks (RESIDENTIAL - R1) [Electricity]".to_string(),
            "Alectra Utilities (RESIDENTIAL) [Electricity]".to_string(),
        ];
        let gas = vec![
            "Enbridge Gas (Union South) [Natural Gas]".to_string(),
            "Alectra Utilities (RESIDENTIAL) [Electricity]".to_string(),
        ];
        let merged = merge_company_lists(vec![electricity, gas]);
        assert_eq!(
            merged,
            vec![
                "Alectra Utilities (RESIDENTIAL) [Electricity]",
                "Enbridge Gas (Union South) [Natural Gas]",
                "Hydro One Networks (RESIDENTIAL - R1) [Electricity]",
            ]
        );
    }

    #[test]
    fn field_value_coercion() {
        assert_eq!(FieldValue::from_text(Some("1.5")), FieldValue::Number(1.5));
        assert_eq!(
            FieldValue::from_text(Some("n/a")),
            FieldValue::Text("n/a".to_string())
        );
        assert_eq!(FieldValue::from_text(None), FieldValue::Empty);
        assert_eq!(FieldValue::from_text(Some("")), FieldValue::Empty);
    }
}

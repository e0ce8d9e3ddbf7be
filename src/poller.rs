//! Polling coordinator and read interface
//!
//! One poller per configured company. Each refresh cycle fetches the
//! company's feed row and swaps a complete, immutable snapshot into a watch
//! channel; readers always see either the previous whole snapshot or the new
//! one, never a partial mapping. On any fetch failure after the first
//! success the previous snapshot stays in place (stale-but-available) and
//! the error is only logged; the host scheduler retries on its next tick.

use crate::config::Config;
use crate::error::{GridTariffError, Result};
use crate::feed::{CompanyData, FieldValue, RateSource};
use crate::holidays::OntarioHolidays;
use crate::logging::{LogContext, get_logger_with_context};
use crate::peak::{OntarioPeakCalculator, PeakCalculator, PeakState, Season, TariffPlan};
use crate::sector::Sector;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{Duration, Instant};

/// Reading value shown when the resolved rate field is missing
///
/// Happens when the snapshot predates a feed change or the plan's fields are
/// absent for this company; reads degrade to the sentinel instead of failing.
pub const UNKNOWN_RATE: &str = "unknown";

/// Immutable result of one successful fetch cycle
#[derive(Debug, Clone)]
pub struct RatesSnapshot {
    /// Company display name the row was matched on
    pub company: String,
    /// Sector the row came from
    pub sector: Sector,
    /// Descriptive-field-name mapping of the matched row
    pub data: CompanyData,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// One read of the current state: active rate plus attributes
#[derive(Debug, Clone)]
pub struct RateReading {
    /// Active rate for the current pricing period, or the sentinel
    pub value: FieldValue,
    /// Active pricing-period label
    pub active_peak: PeakState,
    /// Current pricing season
    pub season: Season,
    /// Every mapped field plus company/sector/peak/season attributes
    pub attributes: BTreeMap<String, FieldValue>,
}

/// Timer-driven poller owning one company's snapshot
pub struct RatesPoller {
    source: Arc<dyn RateSource>,
    company: String,
    sector: Sector,
    plan: TariffPlan,
    timezone: Tz,
    min_interval: Duration,
    last_refresh: Option<Instant>,
    snapshot_tx: watch::Sender<Option<Arc<RatesSnapshot>>>,
    logger: crate::logging::StructuredLogger,
    peak: OntarioPeakCalculator<OntarioHolidays>,
}

impl RatesPoller {
    /// Build a poller from validated configuration and a rate source
    pub fn new(config: &Config, source: Arc<dyn RateSource>) -> Result<Self> {
        let sector = config.sector()?;
        let plan = if config.company.ulo_enabled {
            TariffPlan::UltraLowOvernight
        } else {
            TariffPlan::TimeOfUse
        };
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| GridTariffError::validation("timezone", "not a recognized IANA timezone"))?;
        let (snapshot_tx, _) = watch::channel(None);
        let logger = get_logger_with_context(
            LogContext::new("poller").with_company(config.company.display_name.clone()),
        );
        Ok(Self {
            source,
            company: config.company.display_name.clone(),
            sector,
            plan,
            timezone,
            min_interval: Duration::from_secs(config.polling.interval_secs),
            last_refresh: None,
            snapshot_tx,
            logger,
            peak: OntarioPeakCalculator::new(OntarioHolidays::new(), sector, plan),
        })
    }

    /// Subscribe to snapshot updates
    ///
    /// Readers borrow the latest `Arc<RatesSnapshot>`; an in-flight refresh
    /// never tears what they see.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RatesSnapshot>>> {
        self.snapshot_tx.subscribe()
    }

    /// Latest snapshot, if any fetch has succeeded yet
    pub fn snapshot(&self) -> Option<Arc<RatesSnapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    /// Refresh the snapshot if the minimum interval has elapsed
    ///
    /// The first-ever fetch propagates its error (there is no snapshot to
    /// fall back on); later failures keep the stale snapshot and only log.
    pub async fn refresh(&mut self) -> Result<()> {
        if let Some(last) = self.last_refresh {
            if last.elapsed() < self.min_interval {
                self.logger.debug("Refresh throttled; keeping current snapshot");
                return Ok(());
            }
        }

        // The throttle window is measured from cycle start, not completion.
        let started = Instant::now();
        match self.source.fetch(self.sector, &self.company).await {
            Ok(data) => {
                self.last_refresh = Some(started);
                let snapshot = Arc::new(RatesSnapshot {
                    company: self.company.clone(),
                    sector: self.sector,
                    data,
                    fetched_at: Utc::now(),
                });
                self.snapshot_tx.send_replace(Some(snapshot));
                self.logger.info("Tariff snapshot refreshed");
                Ok(())
            }
            Err(err) => {
                if self.snapshot_tx.borrow().is_none() {
                    return Err(err);
                }
                self.logger
                    .error(&format!("Feed refresh failed, keeping stale snapshot: {}", err));
                Ok(())
            }
        }
    }

    /// Local wall-clock time in the configured timezone
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    /// Read the current rate and attributes at the given local instant
    ///
    /// The peak label is recomputed on every call; only the field mapping
    /// comes from the snapshot.
    pub fn current_reading(&self, now: NaiveDateTime) -> RateReading {
        let active_peak = self.peak.active_peak(now);
        let season = Season::of(now.date());
        let snapshot = self.snapshot();
        let data = snapshot.as_ref().map(|s| &s.data);

        let rate_field = match self.sector {
            // Gas has no time-varying tariff; the reading is the supply charge.
            Sector::NaturalGas => Some("gas_supply_charge"),
            Sector::Electricity => active_peak.rate_field(),
        };
        let value = rate_field
            .and_then(|field| data.and_then(|d| d.get(field)))
            .cloned()
            .unwrap_or_else(|| FieldValue::Text(UNKNOWN_RATE.to_string()));

        let mut attributes: BTreeMap<String, FieldValue> = BTreeMap::new();
        attributes.insert(
            "energy_company".to_string(),
            FieldValue::Text(self.company.clone()),
        );
        attributes.insert(
            "energy_sector".to_string(),
            FieldValue::Text(self.sector.as_str().to_string()),
        );
        attributes.insert(
            "active_peak".to_string(),
            FieldValue::Text(active_peak.as_str().to_string()),
        );
        attributes.insert(
            "season".to_string(),
            FieldValue::Text(season.as_str().to_string()),
        );
        attributes.insert(
            "tariff_plan".to_string(),
            FieldValue::Text(self.plan.as_str().to_string()),
        );
        if let Some(data) = data {
            for (field, value) in data {
                attributes.insert(field.clone(), value.clone());
            }
        }

        RateReading {
            value,
            active_peak,
            season,
            attributes,
        }
    }
}

//! Live market objects built from a market file.
//!
//! Curves sit behind handles and flat curves keep their quotes, so
//! scenarios can move the market through the notification graph and the
//! trades reprice lazily.

use std::collections::HashMap;
use std::sync::Arc;

use fra_config::{CurveConfig, FraConfig, IndexConfig, MarketFile, Validate};
use fra_core::handle::Handle;
use fra_core::settings::Settings;
use fra_core::types::Date;
use fra_curves::{
    DiscountCurve, FlatForward, IborConventions, IborIndex, SimpleQuote, YieldTermStructure,
};
use fra_instruments::ForwardRateAgreement;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// A priced market: settings, curves, indices and trades wired together.
pub struct LiveMarket {
    settings: Arc<Settings>,
    quotes: Vec<(String, Arc<SimpleQuote>)>,
    curves: HashMap<String, Handle<dyn YieldTermStructure>>,
    indices: HashMap<String, Arc<IborIndex>>,
    trades: Vec<(String, ForwardRateAgreement)>,
}

impl LiveMarket {
    /// Validates the file and builds every object in it.
    ///
    /// With `only` set, just that trade is built.
    pub fn build(file: &MarketFile, only: Option<&str>) -> CliResult<Self> {
        file.validate_or_error()?;
        if let Some(id) = only {
            if file.fra(id).is_none() {
                return Err(CliError::UnknownTrade(id.to_string()));
            }
        }

        let settings = Arc::new(Settings::new(file.evaluation_date));
        settings.set_include_reference_date_events(file.include_reference_date_events);

        let mut market = Self {
            settings,
            quotes: Vec::new(),
            curves: HashMap::new(),
            indices: HashMap::new(),
            trades: Vec::new(),
        };

        for curve in &file.curves {
            market.add_curve(curve)?;
        }
        for index in &file.indices {
            market.add_index(index)?;
        }
        for fra in file.fras.iter().filter(|f| only.map_or(true, |id| f.id == id)) {
            market.add_trade(fra)?;
        }

        info!(
            evaluation_date = %file.evaluation_date,
            curves = market.curves.len(),
            indices = market.indices.len(),
            trades = market.trades.len(),
            "market built"
        );
        Ok(market)
    }

    fn add_curve(&mut self, config: &CurveConfig) -> CliResult<()> {
        let curve: Arc<dyn YieldTermStructure> = match config {
            CurveConfig::Flat(c) => {
                let quote = Arc::new(SimpleQuote::new(c.rate));
                self.quotes.push((c.name.clone(), quote.clone()));
                match c.reference_date {
                    Some(reference_date) => Arc::new(FlatForward::fixed(
                        reference_date,
                        quote,
                        c.day_count,
                        c.compounding,
                        c.calendar,
                    )),
                    None => Arc::new(FlatForward::floating(
                        self.settings.clone(),
                        c.settlement_days,
                        quote,
                        c.day_count,
                        c.compounding,
                        c.calendar,
                    )),
                }
            }
            CurveConfig::Discount(c) => Arc::new(
                DiscountCurve::builder()
                    .pillars(c.pillars.iter().map(|p| (p.date, p.discount_factor)))
                    .day_counter(c.day_count)
                    .calendar(c.calendar)
                    .extrapolate(c.extrapolate)
                    .build()?,
            ),
        };
        debug!(curve = config.name(), "curve built");
        self.curves
            .insert(config.name().to_string(), Handle::new(curve, "yield curve"));
        Ok(())
    }

    fn add_index(&mut self, config: &IndexConfig) -> CliResult<()> {
        let mut conventions = IborConventions::euribor(config.tenor);
        conventions.family.clone_from(&config.family);
        if let Some(days) = config.fixing_days {
            conventions.fixing_days = days;
        }
        if let Some(calendar) = config.calendar {
            conventions.calendar = calendar;
        }
        if let Some(convention) = config.convention {
            conventions.convention = convention;
        }
        if let Some(eom) = config.end_of_month {
            conventions.end_of_month = eom;
        }
        if let Some(day_count) = config.day_count {
            conventions.day_count = day_count;
        }

        let forwarding = self.curve(&config.forwarding_curve)?;
        let index = IborIndex::new(conventions, forwarding, self.settings.clone());
        index.add_fixings(config.fixings.iter().map(|f| (f.date, f.value)), false)?;
        debug!(index = index.name(), fixings = index.fixing_count(), "index built");
        self.indices.insert(config.name.clone(), Arc::new(index));
        Ok(())
    }

    fn add_trade(&mut self, config: &FraConfig) -> CliResult<()> {
        let mut builder = ForwardRateAgreement::builder()
            .value_date(config.value_date)
            .position(config.position)
            .strike(config.strike)
            .notional(config.notional)
            .use_indexed_coupon(config.use_indexed_coupon)
            .fixing_days(config.fixing_days)
            .business_day_convention(config.business_day_convention)
            .settings(self.settings.clone());
        if let Some(maturity) = config.maturity_date {
            builder = builder.maturity_date(maturity);
        }
        if let Some(name) = &config.index {
            builder = builder.index(self.index(name)?);
        }
        if let Some(name) = &config.discount_curve {
            builder = builder.discount_curve(self.curve(name)?);
        }
        self.trades.push((config.id.clone(), builder.build()?));
        Ok(())
    }

    fn curve(&self, name: &str) -> CliResult<Handle<dyn YieldTermStructure>> {
        self.curves
            .get(name)
            .cloned()
            .ok_or_else(|| CliError::UnknownReference {
                kind: "curve",
                name: name.to_string(),
            })
    }

    fn index(&self, name: &str) -> CliResult<Arc<IborIndex>> {
        self.indices
            .get(name)
            .cloned()
            .ok_or_else(|| CliError::UnknownReference {
                kind: "index",
                name: name.to_string(),
            })
    }

    /// The evaluation date in force.
    pub fn evaluation_date(&self) -> Date {
        self.settings.evaluation_date()
    }

    /// Moves the evaluation date; every dependent trade goes stale.
    pub fn set_evaluation_date(&self, date: Date) {
        self.settings.set_evaluation_date(date);
    }

    /// Shifts every flat curve quote by `shift`.
    pub fn shift_flat_curves(&self, shift: f64) -> CliResult<()> {
        for (name, quote) in &self.quotes {
            let rate = quote.value()?;
            quote.set_value(rate + shift);
            debug!(curve = %name, from = rate, to = rate + shift, "quote shifted");
        }
        Ok(())
    }

    /// Trades in file order.
    pub fn trades(&self) -> &[(String, ForwardRateAgreement)] {
        &self.trades
    }
}

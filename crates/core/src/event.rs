//! Analytics events — plain (default) and monetized (revenue) variants with
//! validated, order-preserving parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{TracelinkError, TracelinkResult};
use crate::param::{number_value, ParamValue};

/// Kind of tracked event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Default,
    Revenue,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Default => "default",
            EventKind::Revenue => "revenue",
        }
    }
}

/// Supported currency codes for revenue events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RevenueCurrency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Chf,
    Cad,
    Aud,
    Cny,
    Inr,
    Aed,
    Try,
    Irr,
}

impl RevenueCurrency {
    /// ISO-style uppercase code used on the wire.
    pub fn as_code(self) -> &'static str {
        match self {
            RevenueCurrency::Usd => "USD",
            RevenueCurrency::Eur => "EUR",
            RevenueCurrency::Gbp => "GBP",
            RevenueCurrency::Jpy => "JPY",
            RevenueCurrency::Chf => "CHF",
            RevenueCurrency::Cad => "CAD",
            RevenueCurrency::Aud => "AUD",
            RevenueCurrency::Cny => "CNY",
            RevenueCurrency::Inr => "INR",
            RevenueCurrency::Aed => "AED",
            RevenueCurrency::Try => "TRY",
            RevenueCurrency::Irr => "IRR",
        }
    }
}

impl fmt::Display for RevenueCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for RevenueCurrency {
    type Err = TracelinkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "USD" => Ok(RevenueCurrency::Usd),
            "EUR" => Ok(RevenueCurrency::Eur),
            "GBP" => Ok(RevenueCurrency::Gbp),
            "JPY" => Ok(RevenueCurrency::Jpy),
            "CHF" => Ok(RevenueCurrency::Chf),
            "CAD" => Ok(RevenueCurrency::Cad),
            "AUD" => Ok(RevenueCurrency::Aud),
            "CNY" => Ok(RevenueCurrency::Cny),
            "INR" => Ok(RevenueCurrency::Inr),
            "AED" => Ok(RevenueCurrency::Aed),
            "TRY" => Ok(RevenueCurrency::Try),
            "IRR" => Ok(RevenueCurrency::Irr),
            other => Err(TracelinkError::Config(format!(
                "unsupported currency code: {other}"
            ))),
        }
    }
}

/// Event parameter map. Insertion order is preserved through to the wire so
/// payloads are deterministic.
pub type EventParams = IndexMap<String, ParamValue>;

/// An immutable analytics event.
///
/// Constructed once via [`Event::default_event`] or [`Event::revenue_event`],
/// consumed once by the bridge for serialization, then discarded. Events
/// carry no identity and are never persisted by this crate.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    name: String,
    params: Option<EventParams>,
    revenue_amount: Option<f64>,
    revenue_currency: Option<RevenueCurrency>,
}

impl Event {
    /// Unified fallible constructor.
    ///
    /// A revenue event without both amount and currency fails with
    /// [`TracelinkError::MissingRevenueFields`]; a default event carrying
    /// either revenue field fails with [`TracelinkError::Config`]. The typed
    /// factories rule both cases out positionally.
    pub fn new(
        kind: EventKind,
        name: impl Into<String>,
        params: Option<EventParams>,
        revenue_amount: Option<f64>,
        revenue_currency: Option<RevenueCurrency>,
    ) -> TracelinkResult<Self> {
        match kind {
            EventKind::Revenue => {
                if revenue_amount.is_none() || revenue_currency.is_none() {
                    return Err(TracelinkError::MissingRevenueFields);
                }
            }
            EventKind::Default => {
                if revenue_amount.is_some() || revenue_currency.is_some() {
                    return Err(TracelinkError::Config(
                        "default events must not carry revenue fields".into(),
                    ));
                }
            }
        }

        Ok(Self {
            kind,
            name: name.into(),
            params,
            revenue_amount,
            revenue_currency,
        })
    }

    /// A standard event without revenue tracking.
    pub fn default_event(name: impl Into<String>, params: Option<EventParams>) -> Self {
        Self {
            kind: EventKind::Default,
            name: name.into(),
            params,
            revenue_amount: None,
            revenue_currency: None,
        }
    }

    /// A revenue event. Both revenue fields are required positionally, so
    /// this path cannot produce [`TracelinkError::MissingRevenueFields`].
    pub fn revenue_event(
        name: impl Into<String>,
        currency: RevenueCurrency,
        amount: f64,
        params: Option<EventParams>,
    ) -> Self {
        Self {
            kind: EventKind::Revenue,
            name: name.into(),
            params,
            revenue_amount: Some(amount),
            revenue_currency: Some(currency),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> Option<&EventParams> {
        self.params.as_ref()
    }

    pub fn revenue_amount(&self) -> Option<f64> {
        self.revenue_amount
    }

    pub fn revenue_currency(&self) -> Option<RevenueCurrency> {
        self.revenue_currency
    }

    /// Structured wire value: `{type, name, params?, revenue?, currency?}`.
    ///
    /// Parameters flatten to raw primitives here; the [`ParamValue`] wrapper
    /// is input-side validation only. `params` is omitted when absent, and
    /// the revenue keys appear only on revenue events.
    pub fn to_transport_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind.as_str()));
        map.insert("name".into(), Value::from(self.name.clone()));

        if let Some(params) = &self.params {
            let mut flat = Map::new();
            for (key, value) in params {
                flat.insert(key.clone(), value.to_transport_value());
            }
            map.insert("params".into(), Value::Object(flat));
        }

        if self.kind == EventKind::Revenue {
            if let Some(amount) = self.revenue_amount {
                map.insert("revenue".into(), number_value(amount));
            }
            if let Some(currency) = self.revenue_currency {
                map.insert("currency".into(), Value::from(currency.as_code()));
            }
        }

        Value::Object(map)
    }
}

//! Overview dashboard dataset

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::order::amount;

const CREATED_FORMAT: &str = "%b %-d, %Y %H:%M";

/// A headline stat card with its trend indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub value: String,
    /// Trend text, e.g. `21k* Increase`
    pub change: String,
    pub increasing: bool,
}

/// One labelled value in a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Period-over-period change between two consecutive series values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    pub absolute: f64,
    /// Percent of the previous value; 0 when the previous value is 0
    pub percent: f64,
}

impl Change {
    pub fn between(previous: f64, current: f64) -> Self {
        let absolute = current - previous;
        let percent = if previous == 0.0 {
            0.0
        } else {
            absolute / previous * 100.0
        };
        Self { absolute, percent }
    }

    pub fn is_increase(&self) -> bool {
        self.absolute >= 0.0
    }

    /// Tooltip text, e.g. `↑ $1100 (57.9%)`
    pub fn label(&self) -> String {
        format!(
            "{} ${} ({:.1}%)",
            if self.is_increase() { "↑" } else { "↓" },
            self.absolute.abs(),
            self.percent
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Uploaded,
    Drafted,
    Return,
}

impl ListingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ListingStatus::Uploaded => "Uploaded",
            ListingStatus::Drafted => "Drafted",
            ListingStatus::Return => "Return",
        }
    }
}

/// Entry in the "newest products" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewestProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ListingStatus,
    #[serde(with = "amount")]
    pub price: f64,
    #[serde(with = "created_at")]
    pub created: NaiveDateTime,
}

/// Everything the overview screen renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(default)]
    pub headlines: Vec<Headline>,
    #[serde(default)]
    pub sales: Vec<SeriesPoint>,
    #[serde(default)]
    pub audience: Vec<SeriesPoint>,
    #[serde(default)]
    pub newest_products: Vec<NewestProduct>,
}

impl Overview {
    /// Change from the previous month for each sales point; `None` for the first
    pub fn sales_changes(&self) -> Vec<Option<Change>> {
        let mut previous = None;
        self.sales
            .iter()
            .map(|point| {
                let change = previous.map(|prev| Change::between(prev, point.value));
                previous = Some(point.value);
                change
            })
            .collect()
    }

    pub fn total_sales(&self) -> f64 {
        self.sales.iter().map(|p| p.value).sum()
    }

    /// Audience share per segment in percent, 0 for an empty audience
    pub fn audience_shares(&self) -> Vec<(&str, f64)> {
        let total: f64 = self.audience.iter().map(|p| p.value).sum();
        self.audience
            .iter()
            .map(|p| {
                let share = if total == 0.0 {
                    0.0
                } else {
                    p.value / total * 100.0
                };
                (p.label.as_str(), share)
            })
            .collect()
    }
}

mod created_at {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(CREATED_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), "%b %d, %Y %H:%M").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview() -> Overview {
        let json = r#"{
            "headlines": [
                {"title":"Total Sales","value":"$28.912","change":"$7k* Decrease","increasing":false}
            ],
            "sales": [
                {"label":"Jan","value":1200},
                {"label":"Feb","value":1900},
                {"label":"Mar","value":0},
                {"label":"Apr","value":500}
            ],
            "audience": [
                {"label":"Female","value":25},
                {"label":"Male","value":15},
                {"label":"Others","value":10}
            ],
            "newestProducts": [
                {"name":"Smart CCTV","description":"Protect your home","status":"Return",
                 "price":"$86.27","created":"Dec 4, 2019 21:42"}
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sales_changes() {
        let changes = overview().sales_changes();
        assert_eq!(changes[0], None);
        let feb = changes[1].unwrap();
        assert_eq!(feb.absolute, 700.0);
        assert!((feb.percent - 58.333).abs() < 0.01);
        assert!(feb.is_increase());
        assert!(!changes[2].unwrap().is_increase());
        // Previous value of zero reports 0 percent
        assert_eq!(changes[3].unwrap().percent, 0.0);
    }

    #[test]
    fn test_change_label() {
        assert_eq!(Change::between(1900.0, 3000.0).label(), "↑ $1100 (57.9%)");
        assert_eq!(Change::between(5000.0, 2000.0).label(), "↓ $3000 (-60.0%)");
    }

    #[test]
    fn test_audience_shares() {
        let ov = overview();
        let shares = ov.audience_shares();
        assert_eq!(shares[0], ("Female", 50.0));
        assert!(Overview::default().audience_shares().is_empty());
    }

    #[test]
    fn test_newest_products_parse() {
        let overview = overview();
        let product = &overview.newest_products[0];
        assert_eq!(product.status, ListingStatus::Return);
        assert_eq!(product.price, 86.27);
        assert_eq!(product.created.format("%Y-%m-%d %H:%M").to_string(), "2019-12-04 21:42");
    }
}

//! Paid promotion plans

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_money, Chart, Listing, ScreenFilter, StatCard};
use crate::records::{mean_by, sort, Choice, Comparator, Filter, OptionSet, Record, Search, Tally};

/// Plan prices are quoted in Ghana cedis
pub const CURRENCY: &str = "GHS ";

/// A promotion plan a seller can buy for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionPlan {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Plan type sent to the backend, e.g. `basic`, `premium`
    #[serde(rename = "type")]
    pub kind: String,
    /// Duration in days
    pub duration: u32,
    pub price: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl PromotionPlan {
    pub fn status(&self) -> PlanStatus {
        if self.is_active {
            PlanStatus::Active
        } else {
            PlanStatus::Inactive
        }
    }

    /// Enabled feature names
    pub fn enabled_features(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }

    /// One-line summary used on plan cards and in the product form
    pub fn summary(&self) -> String {
        format!(
            "{} ({} days) {}",
            self.name,
            self.duration,
            format_money(CURRENCY, self.price)
        )
    }
}

impl Record for PromotionPlan {
    const KIND: &'static str = "promotion plan";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    Active,
    Inactive,
}

impl OptionSet for PlanStatus {
    fn options() -> &'static [Self] {
        &[PlanStatus::Active, PlanStatus::Inactive]
    }

    fn label(&self) -> &'static str {
        match self {
            PlanStatus::Active => "Active",
            PlanStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PlanStatus::Active),
            "inactive" => Ok(PlanStatus::Inactive),
            _ => Err(format!("unknown plan status '{s}' (expected all, active, inactive)")),
        }
    }
}

/// Search on plan name plus an active/inactive filter
#[derive(Debug, Clone, Default)]
pub struct PromotionFilter {
    pub search: Search,
    pub status: Choice<PlanStatus>,
}

impl Filter<PromotionPlan> for PromotionFilter {
    fn matches(&self, plan: &PromotionPlan) -> bool {
        self.search.matches_any([plan.name.as_str()]) && self.status.matches(&plan.status())
    }
}

impl ScreenFilter<PromotionPlan> for PromotionFilter {
    fn search(&self) -> &Search {
        &self.search
    }

    fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    fn controls(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Status", self.status.label())]
    }

    fn cycle(&mut self, slot: usize) {
        if slot == 0 {
            self.status = self.status.cycle();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionSort {
    PriceAsc,
    PriceDesc,
    DurationDesc,
    NameAsc,
}

impl Comparator<PromotionPlan> for PromotionSort {
    fn compare(&self, a: &PromotionPlan, b: &PromotionPlan) -> Ordering {
        match self {
            PromotionSort::PriceAsc => sort::by_number(a.price, b.price),
            PromotionSort::PriceDesc => sort::by_number(b.price, a.price),
            PromotionSort::DurationDesc => b.duration.cmp(&a.duration),
            PromotionSort::NameAsc => sort::by_text(&a.name, &b.name),
        }
    }
}

impl OptionSet for PromotionSort {
    fn options() -> &'static [Self] {
        &[
            PromotionSort::PriceAsc,
            PromotionSort::PriceDesc,
            PromotionSort::DurationDesc,
            PromotionSort::NameAsc,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            PromotionSort::PriceAsc => "Price (Low-High)",
            PromotionSort::PriceDesc => "Price (High-Low)",
            PromotionSort::DurationDesc => "Longest",
            PromotionSort::NameAsc => "Name (A-Z)",
        }
    }
}

impl FromStr for PromotionSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(PromotionSort::PriceAsc),
            "price-desc" => Ok(PromotionSort::PriceDesc),
            "duration-desc" => Ok(PromotionSort::DurationDesc),
            "name-asc" => Ok(PromotionSort::NameAsc),
            other => Err(format!(
                "unknown sort '{other}' (expected price-asc, price-desc, duration-desc, name-asc)"
            )),
        }
    }
}

impl Listing for PromotionPlan {
    type Filter = PromotionFilter;
    type Sort = PromotionSort;

    const TITLE: &'static str = "Promotion Plans";
    const HEADERS: &'static [&'static str] =
        &["Plan", "Type", "Duration", "Price", "Status", "Features"];
    const WIDTHS: &'static [u16] = &[18, 12, 10, 14, 10, 36];

    fn cells(&self) -> Vec<String> {
        let features: Vec<String> = self
            .features
            .iter()
            .map(|(name, on)| format!("{} {name}", if *on { "✓" } else { "✗" }))
            .collect();
        vec![
            self.name.clone(),
            self.kind.clone(),
            format!("{} days", self.duration),
            format_money(CURRENCY, self.price),
            self.status().label().to_string(),
            features.join("  "),
        ]
    }

    fn stat_cards(plans: &[Self], _now: DateTime<Utc>) -> Vec<StatCard> {
        let active = plans.iter().filter(|p| p.is_active).count();
        vec![
            StatCard::new("Total Plans", plans.len()),
            StatCard::new("Active Plans", active),
            StatCard::new(
                "Avg. Price",
                format_money(CURRENCY, mean_by(plans, |p| p.price)),
            ),
        ]
    }

    fn charts(plans: &[Self], _now: DateTime<Utc>) -> Vec<Chart> {
        vec![Chart {
            title: "Plans by Type",
            tally: Tally::from_keys(plans.iter().map(|p| p.kind.as_str())),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordView;

    fn plans() -> Vec<PromotionPlan> {
        let json = r#"[
            {"_id":"p1","name":"Basic Boost","description":"","type":"basic","duration":7,"price":20,"isActive":true,
             "features":{"homepage":false,"badge":true}},
            {"id":"p2","name":"Premium Spotlight","type":"premium","duration":30,"price":80,"isActive":false,
             "features":{"homepage":true,"badge":true}},
            {"_id":"p3","name":"Standard","type":"standard","duration":14,"price":50,"isActive":true}
        ]"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_accepts_either_id_field() {
        let plans = plans();
        assert_eq!(plans[1].id, "p2");
        assert_eq!(plans[1].kind, "premium");
        assert!(plans[2].features.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let view = RecordView::new(plans());
        let mut filter = PromotionFilter::default();
        filter.cycle(0);
        filter.cycle(0);
        assert_eq!(filter.status, Choice::Only(PlanStatus::Inactive));
        let rows = view.filtered(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p2");
    }

    #[test]
    fn test_stats() {
        let cards = PromotionPlan::stat_cards(&plans(), Utc::now());
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].value, "2");
        assert_eq!(cards[2].value, "GHS 50.00");
        let empty = PromotionPlan::stat_cards(&[], Utc::now());
        assert_eq!(empty[2].value, "GHS 0.00");
    }

    #[test]
    fn test_feature_checklist() {
        let plans = plans();
        assert_eq!(plans[0].enabled_features().collect::<Vec<_>>(), vec!["badge"]);
        assert_eq!(plans[0].cells()[5], "✓ badge  ✗ homepage");
        assert_eq!(plans[0].summary(), "Basic Boost (7 days) GHS 20.00");
    }

    #[test]
    fn test_sort_by_duration() {
        let view = RecordView::new(plans());
        let rows = view.query(&PromotionFilter::default(), Some(&PromotionSort::DurationDesc));
        let ids: Vec<&str> = rows.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }
}

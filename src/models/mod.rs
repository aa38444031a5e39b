//! Marketplace domain records
//!
//! Each record kind carries its screen's behavior alongside its shape:
//! - Filter state (search text plus enumerated/range filters)
//! - The fixed set of sort options
//! - Stat cards and chart tallies computed from the full record set
//! - Table columns for the TUI and CLI listings

pub mod category;
pub mod order;
pub mod overview;
pub mod product;
pub mod promotion;
pub mod user;

pub use category::{Category, CategoryDraft, CategoryFilter, CategoryPatch, CategorySort};
pub use order::{Order, OrderFilter, OrderSort, OrderStatus, OrderTab, PaymentStatus};
pub use overview::{Change, Headline, ListingStatus, NewestProduct, Overview, SeriesPoint};
pub use product::{Owner, Product, ProductFilter, ProductPatch, ProductSort};
pub use promotion::{PlanStatus, PromotionFilter, PromotionPlan, PromotionSort};
pub use user::{Role, User, UserFilter, UserSort};

use chrono::{DateTime, Utc};

use crate::records::{Comparator, Filter, OptionSet, Record, Search, Tally};

/// A summary value shown above a record table
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

impl StatCard {
    pub fn new(title: &'static str, value: impl ToString) -> Self {
        Self {
            title,
            value: value.to_string(),
        }
    }
}

/// A titled bar/pie chart series
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub tally: Tally,
}

/// Filter state a screen lets the user edit
pub trait ScreenFilter<R>: Filter<R> + Default {
    fn search(&self) -> &Search;

    fn search_mut(&mut self) -> &mut Search;

    /// Enumerated filter controls as (name, current label)
    fn controls(&self) -> Vec<(&'static str, &'static str)>;

    /// Advance the control at `slot` to its next option
    fn cycle(&mut self, slot: usize);
}

/// A record kind that can be listed on a management screen
pub trait Listing: Record + Sized {
    type Filter: ScreenFilter<Self>;
    type Sort: Comparator<Self> + OptionSet;

    /// Screen title
    const TITLE: &'static str;
    /// Table column headers
    const HEADERS: &'static [&'static str];
    /// Column widths in percent, parallel to `HEADERS`
    const WIDTHS: &'static [u16];

    /// Sort applied when the screen mounts; `None` keeps source order
    fn default_sort() -> Option<Self::Sort> {
        None
    }

    /// Table cells, parallel to `HEADERS`
    fn cells(&self) -> Vec<String>;

    fn stat_cards(records: &[Self], now: DateTime<Utc>) -> Vec<StatCard>;

    fn charts(records: &[Self], now: DateTime<Utc>) -> Vec<Chart>;
}

/// None → first option → … → last option → None
pub fn cycle_sort<S: OptionSet>(current: Option<S>) -> Option<S> {
    let options = S::options();
    match current {
        None => options.first().copied(),
        Some(sort) => {
            let index = options.iter().position(|o| *o == sort).unwrap_or(0);
            options.get(index + 1).copied()
        }
    }
}

/// Format a currency amount the way the dashboard displays it
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_sort_wraps_through_none() {
        let mut sort = None;
        let mut seen = Vec::new();
        for _ in 0..UserSort::options().len() {
            sort = cycle_sort::<UserSort>(sort);
            seen.push(sort.expect("option"));
        }
        assert_eq!(seen, UserSort::options());
        assert_eq!(cycle_sort(sort), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("$", 43.444), "$43.44");
        assert_eq!(format_money("GHS ", 50.0), "GHS 50.00");
    }
}

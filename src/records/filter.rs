//! Filter predicates for record views
//!
//! A screen's filter state implements [`Filter`]; the building blocks here
//! cover the three shapes every screen uses: text search, enumerated
//! exact-match with an "all" sentinel, and boundary-inclusive ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};

/// Predicate deciding whether a record appears in the filtered view
pub trait Filter<R> {
    fn matches(&self, record: &R) -> bool;
}

/// A fixed, ordered set of options a user can cycle through
pub trait OptionSet: Copy + PartialEq + 'static {
    fn options() -> &'static [Self];

    fn label(&self) -> &'static str;

    /// The option after this one, wrapping around
    fn next(self) -> Self {
        let options = Self::options();
        let index = options.iter().position(|o| *o == self).unwrap_or(0);
        options[(index + 1) % options.len()]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text search
// ─────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    text: String,
    needle: String,
}

impl Search {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let needle = text.to_lowercase();
        Self { text, needle }
    }

    /// The raw text as typed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
        self.needle = self.text.to_lowercase();
    }

    pub fn pop(&mut self) {
        self.text.pop();
        self.needle = self.text.to_lowercase();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.needle.clear();
    }

    /// True when the search is empty or any field contains it
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.needle.is_empty() {
            return true;
        }
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enumerated filters
// ─────────────────────────────────────────────────────────────────────────────

/// Exact-match filter with an "all" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: OptionSet> Choice<T> {
    /// All → first option → … → last option → All
    pub fn cycle(self) -> Self {
        let options = T::options();
        match self {
            Choice::All => options.first().map_or(Choice::All, |o| Choice::Only(*o)),
            Choice::Only(current) => {
                let index = options.iter().position(|o| *o == current).unwrap_or(0);
                options
                    .get(index + 1)
                    .map_or(Choice::All, |o| Choice::Only(*o))
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Choice::All => "All",
            Choice::Only(value) => value.label(),
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Range filters
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed price buckets used by the product screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    #[default]
    All,
    Under100,
    From100To500,
    Over500,
}

impl PriceRange {
    /// The three non-sentinel buckets, in chart order
    pub const BUCKETS: [PriceRange; 3] = [
        PriceRange::Under100,
        PriceRange::From100To500,
        PriceRange::Over500,
    ];

    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Under100 => price < 100.0,
            PriceRange::From100To500 => (100.0..=500.0).contains(&price),
            PriceRange::Over500 => price > 500.0,
        }
    }

    /// Filter key as accepted on the command line
    pub fn key(&self) -> &'static str {
        match self {
            PriceRange::All => "all",
            PriceRange::Under100 => "under100",
            PriceRange::From100To500 => "100to500",
            PriceRange::Over500 => "over500",
        }
    }

    /// Short label for chart axes
    pub fn chart_label(&self) -> &'static str {
        match self {
            PriceRange::All => "All",
            PriceRange::Under100 => "Under $100",
            PriceRange::From100To500 => "$100-$500",
            PriceRange::Over500 => "Over $500",
        }
    }
}

impl OptionSet for PriceRange {
    fn options() -> &'static [Self] {
        &[
            PriceRange::All,
            PriceRange::Under100,
            PriceRange::From100To500,
            PriceRange::Over500,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "All Prices",
            PriceRange::Under100 => "Under $100",
            PriceRange::From100To500 => "$100 - $500",
            PriceRange::Over500 => "Over $500",
        }
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::options()
            .iter()
            .find(|r| r.key() == s)
            .copied()
            .ok_or_else(|| {
                format!("unknown price range '{s}' (expected all, under100, 100to500, over500)")
            })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Creation-date recency window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recency {
    #[default]
    All,
    LastDays(i64),
}

impl Recency {
    pub const LAST_WEEK: Recency = Recency::LastDays(7);
    pub const LAST_MONTH: Recency = Recency::LastDays(30);
    /// Longest window accepted from user input
    pub const MAX_DAYS: i64 = 36_500;

    /// True when `created` falls inside the window ending at `now` (inclusive)
    ///
    /// A window reaching past the representable range behaves like [`Recency::All`].
    pub fn contains(&self, created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Recency::All => true,
            Recency::LastDays(days) => TimeDelta::try_days(*days)
                .and_then(|window| now.checked_sub_signed(window))
                .map_or(true, |start| created >= start),
        }
    }
}

impl OptionSet for Recency {
    fn options() -> &'static [Self] {
        &[Recency::All, Recency::LAST_WEEK]
    }

    fn label(&self) -> &'static str {
        match self {
            Recency::All => "All Time",
            Recency::LastDays(7) => "Last 7 Days",
            Recency::LastDays(30) => "Last 30 Days",
            Recency::LastDays(_) => "Recent",
        }
    }
}

impl FromStr for Recency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Recency::All),
            "recent" => Ok(Recency::LAST_WEEK),
            other => {
                let days: i64 = other
                    .strip_suffix('d')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| {
                        format!("unknown date filter '{other}' (expected all, recent, or <N>d)")
                    })?;
                if !(0..=Self::MAX_DAYS).contains(&days) {
                    return Err(format!(
                        "date filter '{other}' must be between 0d and {}d",
                        Self::MAX_DAYS
                    ));
                }
                Ok(Recency::LastDays(days))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Role {
        Admin,
        User,
    }

    impl OptionSet for Role {
        fn options() -> &'static [Self] {
            &[Role::Admin, Role::User]
        }

        fn label(&self) -> &'static str {
            match self {
                Role::Admin => "admin",
                Role::User => "user",
            }
        }
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let search = Search::default();
        assert!(search.matches_any(["anything"]));
        assert!(search.matches_any(std::iter::empty::<&str>()));
    }

    #[test]
    fn test_search_is_case_insensitive_over_any_field() {
        let search = Search::new("LEVIN");
        assert!(search.matches_any(["#H1", "Allison Levin"]));
        assert!(!search.matches_any(["#H1", "Makenna Mango"]));
    }

    #[test]
    fn test_search_editing() {
        let mut search = Search::default();
        search.push('A');
        search.push('b');
        assert_eq!(search.text(), "Ab");
        assert!(search.matches_any(["cab"]));
        search.pop();
        assert_eq!(search.text(), "A");
        search.clear();
        assert!(search.is_empty());
    }

    #[test]
    fn test_choice_all_sentinel() {
        assert!(Choice::All.matches(&Role::Admin));
        assert!(Choice::Only(Role::Admin).matches(&Role::Admin));
        assert!(!Choice::Only(Role::Admin).matches(&Role::User));
    }

    #[test]
    fn test_choice_cycles_through_all() {
        let c = Choice::<Role>::All;
        let c = c.cycle();
        assert_eq!(c, Choice::Only(Role::Admin));
        let c = c.cycle();
        assert_eq!(c, Choice::Only(Role::User));
        assert_eq!(c.cycle(), Choice::All);
        assert_eq!(Choice::<Role>::All.label(), "All");
    }

    #[test]
    fn test_price_range_boundaries() {
        assert!(PriceRange::Under100.contains(99.99));
        assert!(!PriceRange::Under100.contains(100.0));
        assert!(PriceRange::From100To500.contains(100.0));
        assert!(PriceRange::From100To500.contains(500.0));
        assert!(!PriceRange::From100To500.contains(500.01));
        assert!(PriceRange::Over500.contains(500.01));
        assert!(PriceRange::All.contains(-1.0));
    }

    #[test]
    fn test_price_range_parse() {
        assert_eq!("100to500".parse::<PriceRange>(), Ok(PriceRange::From100To500));
        assert_eq!("all".parse::<PriceRange>(), Ok(PriceRange::All));
        assert!("cheap".parse::<PriceRange>().is_err());
        assert_eq!(PriceRange::Over500.next(), PriceRange::All);
    }

    #[test]
    fn test_recency_window_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 10, 23, 12, 0, 0).unwrap();
        let exactly_week = now - Duration::days(7);
        let older = exactly_week - Duration::seconds(1);
        assert!(Recency::LAST_WEEK.contains(exactly_week, now));
        assert!(!Recency::LAST_WEEK.contains(older, now));
        assert!(Recency::All.contains(older, now));
    }

    #[test]
    fn test_recency_parse() {
        assert_eq!("recent".parse::<Recency>(), Ok(Recency::LAST_WEEK));
        assert_eq!("30d".parse::<Recency>(), Ok(Recency::LastDays(30)));
        assert!("soon".parse::<Recency>().is_err());
    }

    #[test]
    fn test_recency_parse_rejects_out_of_range_days() {
        assert!("-5d".parse::<Recency>().is_err());
        assert!("99999999999999d".parse::<Recency>().is_err());
        assert_eq!("36500d".parse::<Recency>(), Ok(Recency::LastDays(Recency::MAX_DAYS)));
    }

    #[test]
    fn test_recency_overflowing_window_matches_everything() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert!(Recency::LastDays(i64::MAX).contains(now, now));
        assert!(Recency::LastDays(99_999_999_999_999).contains(DateTime::<Utc>::MIN_UTC, now));
    }
}

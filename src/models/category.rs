//! Product categories and the category editor

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Chart, Listing, ScreenFilter, StatCard};
use crate::error::{DeskError, Result};
use crate::records::{
    day_label, max_by, mean_by, sort, Comparator, Filter, OptionSet, Patch, Recency, Record,
    Search, Tally,
};

/// A top-level product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn has_subcategory(&self, name: &str) -> bool {
        self.subcategories.iter().any(|s| s == name)
    }
}

impl Record for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Edit merged into an existing category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPatch {
    pub name: String,
    pub image: String,
    pub subcategories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Patch<Category> for CategoryPatch {
    fn apply(self, category: &mut Category) {
        category.name = self.name;
        category.image = self.image;
        category.subcategories = self.subcategories;
        category.updated_at = Some(self.updated_at);
    }
}

/// Working state of the create/edit modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    /// Set when editing an existing category
    pub editing: Option<String>,
    pub name: String,
    pub image: String,
    pub subcategories: Vec<String>,
}

impl CategoryDraft {
    /// Draft pre-filled from an existing category
    pub fn edit(category: &Category) -> Self {
        Self {
            editing: Some(category.id.clone()),
            name: category.name.clone(),
            image: category.image.clone(),
            subcategories: category.subcategories.clone(),
        }
    }

    /// Add a trimmed subcategory; blanks and duplicates are ignored
    ///
    /// Returns whether the list changed.
    pub fn add_subcategory(&mut self, input: &str) -> bool {
        let name = input.trim();
        if name.is_empty() || self.subcategories.iter().any(|s| s == name) {
            return false;
        }
        self.subcategories.push(name.to_string());
        true
    }

    pub fn remove_subcategory(&mut self, name: &str) -> bool {
        let before = self.subcategories.len();
        self.subcategories.retain(|s| s != name);
        self.subcategories.len() != before
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DeskError::Validation("Category name is required".into()));
        }
        if self.image.trim().is_empty() {
            return Err(DeskError::Validation("Category image is required".into()));
        }
        Ok(())
    }

    /// A brand-new category with a fresh id, stamped `now`
    pub fn into_category(self, now: DateTime<Utc>) -> Result<Category> {
        self.validate()?;
        Ok(Category {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            image: self.image.trim().to_string(),
            subcategories: self.subcategories,
            created_at: now,
            updated_at: Some(now),
        })
    }

    pub fn into_patch(self, now: DateTime<Utc>) -> Result<CategoryPatch> {
        self.validate()?;
        Ok(CategoryPatch {
            name: self.name.trim().to_string(),
            image: self.image.trim().to_string(),
            subcategories: self.subcategories,
            updated_at: now,
        })
    }
}

/// Search on name plus a creation-date window
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    pub search: Search,
    pub created: Recency,
    /// Reference instant for the recency window
    pub now: DateTime<Utc>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            search: Search::default(),
            created: Recency::All,
            now: Utc::now(),
        }
    }
}

impl Filter<Category> for CategoryFilter {
    fn matches(&self, category: &Category) -> bool {
        self.search.matches_any([category.name.as_str()])
            && self.created.contains(category.created_at, self.now)
    }
}

impl ScreenFilter<Category> for CategoryFilter {
    fn search(&self) -> &Search {
        &self.search
    }

    fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    fn controls(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Date", self.created.label())]
    }

    fn cycle(&mut self, slot: usize) {
        if slot == 0 {
            self.created = self.created.next();
            self.now = Utc::now();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySort {
    NameAsc,
    NameDesc,
    Newest,
    MostSubcategories,
}

impl Comparator<Category> for CategorySort {
    fn compare(&self, a: &Category, b: &Category) -> Ordering {
        match self {
            CategorySort::NameAsc => sort::by_text(&a.name, &b.name),
            CategorySort::NameDesc => sort::by_text(&b.name, &a.name),
            CategorySort::Newest => b.created_at.cmp(&a.created_at),
            CategorySort::MostSubcategories => b.subcategories.len().cmp(&a.subcategories.len()),
        }
    }
}

impl OptionSet for CategorySort {
    fn options() -> &'static [Self] {
        &[
            CategorySort::NameAsc,
            CategorySort::NameDesc,
            CategorySort::Newest,
            CategorySort::MostSubcategories,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            CategorySort::NameAsc => "Name (A-Z)",
            CategorySort::NameDesc => "Name (Z-A)",
            CategorySort::Newest => "Newest",
            CategorySort::MostSubcategories => "Most Subcategories",
        }
    }
}

impl FromStr for CategorySort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(CategorySort::NameAsc),
            "name-desc" => Ok(CategorySort::NameDesc),
            "created-desc" => Ok(CategorySort::Newest),
            "subcategories-desc" => Ok(CategorySort::MostSubcategories),
            other => Err(format!(
                "unknown sort '{other}' (expected name-asc, name-desc, created-desc, subcategories-desc)"
            )),
        }
    }
}

/// Stat card values for the category screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStats {
    pub total: usize,
    pub most_subcategories: usize,
    pub average_subcategories: f64,
    pub new_this_month: usize,
}

impl CategoryStats {
    pub fn compute(categories: &[Category], now: DateTime<Utc>) -> Self {
        Self {
            total: categories.len(),
            most_subcategories: max_by(categories, |c| c.subcategories.len()),
            average_subcategories: mean_by(categories, |c| c.subcategories.len() as f64),
            new_this_month: categories
                .iter()
                .filter(|c| Recency::LAST_MONTH.contains(c.created_at, now))
                .count(),
        }
    }
}

impl Listing for Category {
    type Filter = CategoryFilter;
    type Sort = CategorySort;

    const TITLE: &'static str = "Category Management";
    const HEADERS: &'static [&'static str] = &["Name", "Subcategories", "Image", "Created"];
    const WIDTHS: &'static [u16] = &[22, 43, 20, 15];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            if self.subcategories.is_empty() {
                "-".to_string()
            } else {
                self.subcategories.join(", ")
            },
            self.image.clone(),
            self.created_at.format("%Y-%m-%d").to_string(),
        ]
    }

    fn stat_cards(categories: &[Self], now: DateTime<Utc>) -> Vec<StatCard> {
        let stats = CategoryStats::compute(categories, now);
        vec![
            StatCard::new("Total Categories", stats.total),
            StatCard::new("Most Subcategories", stats.most_subcategories),
            StatCard::new(
                "Avg. Subcategories",
                format!("{:.1}", stats.average_subcategories),
            ),
            StatCard::new("New This Month", stats.new_this_month),
        ]
    }

    fn charts(categories: &[Self], _now: DateTime<Utc>) -> Vec<Chart> {
        vec![
            Chart {
                title: "Subcategories per Category",
                tally: Tally::per_entry(
                    categories
                        .iter()
                        .map(|c| (c.name.as_str(), c.subcategories.len())),
                ),
            },
            Chart {
                title: "Creation Trend",
                tally: Tally::from_keys(categories.iter().map(|c| day_label(c.created_at))),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordView;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 23, 12, 0, 0).unwrap()
    }

    fn category(id: &str, name: &str, subs: &[&str], days_ago: i64) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            image: format!("https://cdn.example.com/{id}.png"),
            subcategories: subs.iter().map(|s| s.to_string()).collect(),
            created_at: now() - Duration::days(days_ago),
            updated_at: None,
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            category("c1", "Electronics", &["Phones", "Laptops", "Audio"], 2),
            category("c2", "Fashion", &["Shoes"], 10),
            category("c3", "Home", &[], 45),
        ]
    }

    #[test]
    fn test_recent_filter() {
        let view = RecordView::new(categories());
        let filter = CategoryFilter {
            search: Search::default(),
            created: Recency::LAST_WEEK,
            now: now(),
        };
        let rows = view.filtered(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "c1");
    }

    #[test]
    fn test_stats() {
        let stats = CategoryStats::compute(&categories(), now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.most_subcategories, 3);
        assert!((stats.average_subcategories - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.new_this_month, 2);
        let cards = Category::stat_cards(&categories(), now());
        assert_eq!(cards[2].value, "1.3");
    }

    #[test]
    fn test_empty_stats() {
        let cards = Category::stat_cards(&[], now());
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["0", "0", "0.0", "0"]);
    }

    #[test]
    fn test_charts_keep_zero_buckets() {
        let charts = Category::charts(&categories(), now());
        assert_eq!(charts[0].tally.counts(), [3, 1, 0]);
        assert_eq!(charts[1].tally.labels(), ["Oct 21", "Oct 13", "Sep 8"]);
    }

    #[test]
    fn test_same_name_categories_get_separate_bars() {
        let categories = vec![
            category("c1", "Outlet", &["Shoes", "Bags"], 1),
            category("c2", "Outlet", &["Audio"], 3),
        ];
        let charts = Category::charts(&categories, now());
        assert_eq!(charts[0].tally.labels(), ["Outlet", "Outlet"]);
        assert_eq!(charts[0].tally.counts(), [2, 1]);
    }

    #[test]
    fn test_draft_subcategory_editing() {
        let mut draft = CategoryDraft::default();
        assert!(draft.add_subcategory("  Phones "));
        assert!(!draft.add_subcategory("Phones"));
        assert!(!draft.add_subcategory("   "));
        assert!(draft.add_subcategory("Audio"));
        assert_eq!(draft.subcategories, vec!["Phones", "Audio"]);
        assert!(draft.remove_subcategory("Phones"));
        assert!(!draft.remove_subcategory("Phones"));
        assert_eq!(draft.subcategories, vec!["Audio"]);
    }

    #[test]
    fn test_draft_requires_name_and_image() {
        let draft = CategoryDraft {
            name: "Toys".into(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("image"));
        let draft = CategoryDraft {
            image: "x.png".into(),
            ..Default::default()
        };
        assert!(draft.validate().unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_create_assigns_id_and_timestamps() {
        let draft = CategoryDraft {
            name: " Toys ".into(),
            image: "toys.png".into(),
            ..Default::default()
        };
        let created = draft.into_category(now()).unwrap();
        assert_eq!(created.name, "Toys");
        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, now());
        assert_eq!(created.updated_at, Some(now()));
    }

    #[test]
    fn test_edit_merges_and_bumps_updated_at() {
        let mut view = RecordView::new(categories());
        let mut draft = CategoryDraft::edit(view.get("c2").unwrap());
        draft.add_subcategory("Bags");
        let later = now() + Duration::hours(1);
        let id = draft.editing.clone().unwrap();
        let updated = view.update(&id, draft.into_patch(later).unwrap()).unwrap();
        assert_eq!(updated.subcategories, vec!["Shoes", "Bags"]);
        assert_eq!(updated.updated_at, Some(later));
        assert_eq!(updated.created_at, now() - Duration::days(10));
    }
}

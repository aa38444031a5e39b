//! Product catalog records

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_money, Chart, Listing, ScreenFilter, StatCard};
use crate::records::{
    mean_by, sort, sum_by, Comparator, Filter, OptionSet, Patch, PriceRange, Record, Search, Tally,
};

/// A product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subcategory: String,
    pub price: f64,
    /// Discount percentage, absent when the product is not discounted
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Listing status as reported by the backend (e.g. `draft`, `active`)
    #[serde(default)]
    pub status: Option<String>,
}

/// Seller of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
}

impl Product {
    pub fn seller(&self) -> &str {
        self.owner.as_ref().map_or("unknown", |o| o.username.as_str())
    }

    pub fn is_discounted(&self) -> bool {
        self.discount.is_some()
    }
}

impl Record for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial product update, also sent as the `PATCH /products/{id}` body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }
}

impl Patch<Product> for ProductPatch {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(discount) = self.discount {
            product.discount = Some(discount);
        }
        if let Some(subcategory) = self.subcategory {
            product.subcategory = subcategory;
        }
    }
}

/// Search on name, plus a price-range filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Search,
    pub price: PriceRange,
}

impl Filter<Product> for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        self.search.matches_any([product.name.as_str()]) && self.price.contains(product.price)
    }
}

impl ScreenFilter<Product> for ProductFilter {
    fn search(&self) -> &Search {
        &self.search
    }

    fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    fn controls(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Price", self.price.label())]
    }

    fn cycle(&mut self, slot: usize) {
        if slot == 0 {
            self.price = self.price.next();
        }
    }
}

/// Product table orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    MostViewed,
    NameAsc,
}

impl Comparator<Product> for ProductSort {
    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSort::PriceAsc => sort::by_number(a.price, b.price),
            ProductSort::PriceDesc => sort::by_number(b.price, a.price),
            ProductSort::MostViewed => b.views.cmp(&a.views),
            ProductSort::NameAsc => sort::by_text(&a.name, &b.name),
        }
    }
}

impl OptionSet for ProductSort {
    fn options() -> &'static [Self] {
        &[
            ProductSort::PriceAsc,
            ProductSort::PriceDesc,
            ProductSort::MostViewed,
            ProductSort::NameAsc,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            ProductSort::PriceAsc => "Price (Low-High)",
            ProductSort::PriceDesc => "Price (High-Low)",
            ProductSort::MostViewed => "Most Viewed",
            ProductSort::NameAsc => "Name (A-Z)",
        }
    }
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(ProductSort::PriceAsc),
            "price-desc" => Ok(ProductSort::PriceDesc),
            "views-desc" => Ok(ProductSort::MostViewed),
            "name-asc" => Ok(ProductSort::NameAsc),
            other => Err(format!(
                "unknown sort '{other}' (expected price-asc, price-desc, views-desc, name-asc)"
            )),
        }
    }
}

/// Stat card values for the product screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductStats {
    pub total: usize,
    pub discounted: usize,
    pub average_price: f64,
    pub total_views: u64,
}

impl ProductStats {
    pub fn compute(products: &[Product]) -> Self {
        Self {
            total: products.len(),
            discounted: products.iter().filter(|p| p.is_discounted()).count(),
            average_price: mean_by(products, |p| p.price),
            total_views: sum_by(products, |p| p.views as f64) as u64,
        }
    }
}

/// Product counts per fixed price bucket
pub fn price_distribution(products: &[Product]) -> Tally {
    Tally::from_pairs(PriceRange::BUCKETS.iter().map(|range| {
        let count = products.iter().filter(|p| range.contains(p.price)).count();
        (range.chart_label(), count)
    }))
}

impl Listing for Product {
    type Filter = ProductFilter;
    type Sort = ProductSort;

    const TITLE: &'static str = "Product Management";
    const HEADERS: &'static [&'static str] =
        &["Product", "Subcategory", "Price", "Discount", "Views", "Rating", "Seller"];
    const WIDTHS: &'static [u16] = &[26, 16, 11, 10, 9, 12, 16];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.subcategory.clone(),
            format_money("$", self.price),
            self.discount
                .map_or_else(|| "None".to_string(), |d| format!("{d}%")),
            self.views.to_string(),
            if self.rating > 0.0 {
                format!("{:.1} ★", self.rating)
            } else {
                "No ratings".to_string()
            },
            self.seller().to_string(),
        ]
    }

    fn stat_cards(products: &[Self], _now: DateTime<Utc>) -> Vec<StatCard> {
        let stats = ProductStats::compute(products);
        vec![
            StatCard::new("Total Products", stats.total),
            StatCard::new("Discounted", stats.discounted),
            StatCard::new("Avg. Price", format_money("$", stats.average_price)),
            StatCard::new("Total Views", stats.total_views),
        ]
    }

    fn charts(products: &[Self], _now: DateTime<Utc>) -> Vec<Chart> {
        vec![
            Chart {
                title: "Categories",
                tally: Tally::from_keys(products.iter().map(|p| p.subcategory.as_str())),
            },
            Chart {
                title: "Price Distribution",
                tally: price_distribution(products),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordView;

    fn product(id: &str, name: &str, subcategory: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            subcategory: subcategory.to_string(),
            price,
            discount: None,
            views: 10,
            rating: 0.0,
            images: Vec::new(),
            owner: None,
            created_at: None,
            status: None,
        }
    }

    fn products() -> Vec<Product> {
        let mut cheap = product("p1", "Earbuds Jack", "Audio", 50.0);
        cheap.discount = Some(10.0);
        vec![
            cheap,
            product("p2", "Bluetooth speaker", "Audio", 150.0),
            product("p3", "Smart CCTV", "Security", 600.0),
        ]
    }

    #[test]
    fn test_price_range_filter_scenario() {
        let view = RecordView::new(products());
        let filter = ProductFilter {
            search: Search::default(),
            price: PriceRange::From100To500,
        };
        let rows = view.filtered(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 150.0);
    }

    #[test]
    fn test_stats() {
        let stats = ProductStats::compute(&products());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.discounted, 1);
        assert!((stats.average_price - 266.67).abs() < 0.01);
        assert_eq!(stats.total_views, 30);
    }

    #[test]
    fn test_empty_catalog_average_is_zero() {
        let stats = ProductStats::compute(&[]);
        assert_eq!(stats.average_price, 0.0);
        let cards = Product::stat_cards(&[], Utc::now());
        assert_eq!(cards[2].value, "$0.00");
    }

    #[test]
    fn test_charts() {
        let charts = Product::charts(&products(), Utc::now());
        assert_eq!(charts[0].tally.labels(), ["Audio", "Security"]);
        assert_eq!(charts[0].tally.counts(), [2, 1]);
        assert_eq!(charts[1].tally.labels(), ["Under $100", "$100-$500", "Over $500"]);
        assert_eq!(charts[1].tally.counts(), [1, 1, 1]);
    }

    #[test]
    fn test_price_sort_reverses() {
        let view = RecordView::new(products());
        let asc = view.query(&ProductFilter::default(), Some(&ProductSort::PriceAsc));
        let desc = view.query(&ProductFilter::default(), Some(&ProductSort::PriceDesc));
        let asc_ids: Vec<&str> = asc.iter().map(|p| p.id.as_str()).collect();
        let mut desc_ids: Vec<&str> = desc.iter().map(|p| p.id.as_str()).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn test_patch_merges_fields() {
        let mut view = RecordView::new(products());
        let patch = ProductPatch {
            price: Some(120.0),
            discount: Some(5.0),
            ..Default::default()
        };
        let updated = view.update("p3", patch).unwrap();
        assert_eq!(updated.price, 120.0);
        assert_eq!(updated.discount, Some(5.0));
        assert_eq!(updated.name, "Smart CCTV");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            name: Some("New".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"name":"New"}"#);
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn test_cells_formatting() {
        let mut p = product("p9", "Mouse", "Accessories", 21.13);
        p.rating = 4.3;
        let cells = p.cells();
        assert_eq!(cells[2], "$21.13");
        assert_eq!(cells[3], "None");
        assert_eq!(cells[5], "4.3 ★");
        assert_eq!(cells[6], "unknown");
    }
}

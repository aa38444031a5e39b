//! Customer orders (order tracking screen)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{format_money, Chart, Listing, ScreenFilter, StatCard};
use crate::records::{sort, Choice, Comparator, Filter, OptionSet, Record, Search, Tally};

/// Display format for order dates, e.g. `Oct 23, 2024`
const ORDER_DATE_FORMAT: &str = "%b %-d, %Y";

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(with = "order_date")]
    pub date: NaiveDate,
    pub customer: String,
    /// Order total; accepts either `"$440.00"` or a bare number
    #[serde(with = "amount")]
    pub total: f64,
    pub payment_status: PaymentStatus,
    pub items: u32,
    pub order_status: OrderStatus,
}

impl Order {
    pub fn is_delivered(&self) -> bool {
        self.order_status == OrderStatus::Delivered
    }
}

impl Record for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl OptionSet for PaymentStatus {
    fn options() -> &'static [Self] {
        &[PaymentStatus::Paid, PaymentStatus::Unpaid]
    }

    fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            _ => Err(format!("unknown payment status '{s}' (expected all, paid, unpaid)")),
        }
    }
}

/// Fulfilment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Order processing")]
    Processing,
    Shipped,
    Delivered,
}

impl OptionSet for OrderStatus {
    fn options() -> &'static [Self] {
        &[
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Order processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" | "order processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(format!(
                "unknown order status '{s}' (expected all, processing, shipped, delivered)"
            )),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quick-filter tabs above the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderTab {
    #[default]
    All,
    Unfulfilled,
    Unpaid,
    Paid,
    Open,
    Close,
}

impl OrderTab {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderTab::All => true,
            OrderTab::Unfulfilled => order.order_status == OrderStatus::Processing,
            OrderTab::Unpaid => order.payment_status == PaymentStatus::Unpaid,
            OrderTab::Paid => order.payment_status == PaymentStatus::Paid,
            OrderTab::Open => !order.is_delivered(),
            OrderTab::Close => order.is_delivered(),
        }
    }
}

impl OptionSet for OrderTab {
    fn options() -> &'static [Self] {
        &[
            OrderTab::All,
            OrderTab::Unfulfilled,
            OrderTab::Unpaid,
            OrderTab::Paid,
            OrderTab::Open,
            OrderTab::Close,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            OrderTab::All => "All",
            OrderTab::Unfulfilled => "Unfulfilled",
            OrderTab::Unpaid => "Unpaid",
            OrderTab::Paid => "Paid",
            OrderTab::Open => "Open",
            OrderTab::Close => "Close",
        }
    }
}

impl FromStr for OrderTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::options()
            .iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                format!("unknown tab '{s}' (expected all, unfulfilled, unpaid, paid, open, close)")
            })
    }
}

/// Search on order id or customer, payment/status filters and the active tab
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Search,
    pub payment: Choice<PaymentStatus>,
    pub status: Choice<OrderStatus>,
    pub tab: OrderTab,
}

impl Filter<Order> for OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        self.search
            .matches_any([order.id.as_str(), order.customer.as_str()])
            && self.payment.matches(&order.payment_status)
            && self.status.matches(&order.order_status)
            && self.tab.matches(order)
    }
}

impl ScreenFilter<Order> for OrderFilter {
    fn search(&self) -> &Search {
        &self.search
    }

    fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    fn controls(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("Tab", self.tab.label()),
            ("Payment", self.payment.label()),
            ("Status", self.status.label()),
        ]
    }

    fn cycle(&mut self, slot: usize) {
        match slot {
            0 => self.tab = self.tab.next(),
            1 => self.payment = self.payment.cycle(),
            2 => self.status = self.status.cycle(),
            _ => {}
        }
    }
}

/// Order list orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSort {
    DateDesc,
    DateAsc,
    CustomerAsc,
    CustomerDesc,
    TotalAsc,
    TotalDesc,
}

impl Comparator<Order> for OrderSort {
    fn compare(&self, a: &Order, b: &Order) -> Ordering {
        match self {
            OrderSort::DateDesc => b.date.cmp(&a.date),
            OrderSort::DateAsc => a.date.cmp(&b.date),
            OrderSort::CustomerAsc => sort::by_text(&a.customer, &b.customer),
            OrderSort::CustomerDesc => sort::by_text(&b.customer, &a.customer),
            OrderSort::TotalAsc => sort::by_number(a.total, b.total),
            OrderSort::TotalDesc => sort::by_number(b.total, a.total),
        }
    }
}

impl OptionSet for OrderSort {
    fn options() -> &'static [Self] {
        &[
            OrderSort::DateDesc,
            OrderSort::DateAsc,
            OrderSort::CustomerAsc,
            OrderSort::CustomerDesc,
            OrderSort::TotalAsc,
            OrderSort::TotalDesc,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            OrderSort::DateDesc => "Date (Newest)",
            OrderSort::DateAsc => "Date (Oldest)",
            OrderSort::CustomerAsc => "Customer (A-Z)",
            OrderSort::CustomerDesc => "Customer (Z-A)",
            OrderSort::TotalAsc => "Total (Low-High)",
            OrderSort::TotalDesc => "Total (High-Low)",
        }
    }
}

impl FromStr for OrderSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(OrderSort::DateDesc),
            "date-asc" => Ok(OrderSort::DateAsc),
            "customer-asc" => Ok(OrderSort::CustomerAsc),
            "customer-desc" => Ok(OrderSort::CustomerDesc),
            "total-asc" => Ok(OrderSort::TotalAsc),
            "total-desc" => Ok(OrderSort::TotalDesc),
            other => Err(format!(
                "unknown sort '{other}' (expected date-desc, date-asc, customer-asc, customer-desc, total-asc, total-desc)"
            )),
        }
    }
}

/// Stat card values for the order screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    pub total: usize,
    pub items: u64,
    pub unpaid: usize,
    pub delivered: usize,
}

impl OrderStats {
    pub fn compute(orders: &[Order]) -> Self {
        orders.iter().fold(
            OrderStats {
                total: orders.len(),
                items: 0,
                unpaid: 0,
                delivered: 0,
            },
            |mut stats, order| {
                stats.items += u64::from(order.items);
                if order.payment_status == PaymentStatus::Unpaid {
                    stats.unpaid += 1;
                }
                if order.is_delivered() {
                    stats.delivered += 1;
                }
                stats
            },
        )
    }
}

impl Listing for Order {
    type Filter = OrderFilter;
    type Sort = OrderSort;

    const TITLE: &'static str = "Orders";
    const HEADERS: &'static [&'static str] =
        &["Order", "Date", "Customer", "Total", "Payment", "Items", "Status"];
    const WIDTHS: &'static [u16] = &[14, 14, 20, 11, 10, 11, 20];

    fn default_sort() -> Option<Self::Sort> {
        Some(OrderSort::DateDesc)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.format(ORDER_DATE_FORMAT).to_string(),
            self.customer.clone(),
            format_money("$", self.total),
            self.payment_status.label().to_string(),
            format!(
                "{} {}",
                self.items,
                if self.items > 1 { "Items" } else { "Item" }
            ),
            self.order_status.to_string(),
        ]
    }

    fn stat_cards(orders: &[Self], _now: DateTime<Utc>) -> Vec<StatCard> {
        let stats = OrderStats::compute(orders);
        vec![
            StatCard::new("Total Orders", stats.total),
            StatCard::new("Ordered Items", stats.items),
            StatCard::new("Unpaid Orders", stats.unpaid),
            StatCard::new("Delivered Orders", stats.delivered),
        ]
    }

    fn charts(orders: &[Self], _now: DateTime<Utc>) -> Vec<Chart> {
        vec![
            Chart {
                title: "Orders by Status",
                tally: Tally::from_keys(orders.iter().map(|o| o.order_status.label())),
            },
            Chart {
                title: "Orders per Day",
                tally: Tally::from_keys(orders.iter().map(|o| o.date.format("%b %-d").to_string())),
            },
        ]
    }
}

mod order_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(ORDER_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), "%b %d, %Y")
            .or_else(|_| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d"))
            .map_err(serde::de::Error::custom)
    }
}

pub(super) mod amount {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_money("$", *value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(text) => parse(&text).map_err(serde::de::Error::custom),
        }
    }

    pub(super) fn parse(text: &str) -> Result<f64, String> {
        let cleaned: String = text
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        cleaned
            .parse()
            .map_err(|_| format!("invalid amount '{text}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordView;

    fn orders() -> Vec<Order> {
        let json = r##"[
            {"id":"#H1","date":"Oct 23, 2024","customer":"Makenna Mango","total":"$440.00","paymentStatus":"Paid","items":2,"orderStatus":"Order processing"},
            {"id":"#H2","date":"Oct 18, 2024","customer":"Phillip Vaccaro","total":"$1,200.50","paymentStatus":"Paid","items":1,"orderStatus":"Shipped"},
            {"id":"#H3","date":"Oct 18, 2024","customer":"Allison Levin","total":"$99.00","paymentStatus":"Unpaid","items":1,"orderStatus":"Order processing"},
            {"id":"#H4","date":"Oct 20, 2024","customer":"Allison Levin","total":440,"paymentStatus":"Paid","items":3,"orderStatus":"Delivered"}
        ]"##;
        serde_json::from_str(json).unwrap()
    }

    fn ids(rows: &[&Order]) -> Vec<String> {
        rows.iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn test_parses_display_amounts_and_dates() {
        let orders = orders();
        assert_eq!(orders[0].total, 440.0);
        assert_eq!(orders[1].total, 1200.5);
        assert_eq!(orders[3].total, 440.0);
        assert_eq!(orders[0].date, NaiveDate::from_ymd_opt(2024, 10, 23).unwrap());
        assert_eq!(orders[0].order_status, OrderStatus::Processing);
    }

    #[test]
    fn test_serializes_in_display_format() {
        let json = serde_json::to_value(&orders()[0]).unwrap();
        assert_eq!(json["date"], "Oct 23, 2024");
        assert_eq!(json["total"], "$440.00");
        assert_eq!(json["orderStatus"], "Order processing");
    }

    #[test]
    fn test_tabs() {
        let view = RecordView::new(orders());
        let mut filter = OrderFilter::default();
        let expect = [
            (OrderTab::All, vec!["#H1", "#H2", "#H3", "#H4"]),
            (OrderTab::Unfulfilled, vec!["#H1", "#H3"]),
            (OrderTab::Unpaid, vec!["#H3"]),
            (OrderTab::Paid, vec!["#H1", "#H2", "#H4"]),
            (OrderTab::Open, vec!["#H1", "#H2", "#H3"]),
            (OrderTab::Close, vec!["#H4"]),
        ];
        for (tab, want) in expect {
            filter.tab = tab;
            assert_eq!(ids(&view.filtered(&filter)), want, "tab {:?}", tab);
        }
    }

    #[test]
    fn test_search_on_id_or_customer() {
        let view = RecordView::new(orders());
        let filter = OrderFilter {
            search: Search::new("levin"),
            ..Default::default()
        };
        assert_eq!(ids(&view.filtered(&filter)), vec!["#H3", "#H4"]);
        let filter = OrderFilter {
            search: Search::new("#h2"),
            ..Default::default()
        };
        assert_eq!(ids(&view.filtered(&filter)), vec!["#H2"]);
    }

    #[test]
    fn test_filters_are_anded() {
        let view = RecordView::new(orders());
        let filter = OrderFilter {
            search: Search::new("allison"),
            payment: Choice::Only(PaymentStatus::Paid),
            status: Choice::All,
            tab: OrderTab::All,
        };
        assert_eq!(ids(&view.filtered(&filter)), vec!["#H4"]);
    }

    #[test]
    fn test_sorts() {
        let view = RecordView::new(orders());
        let filter = OrderFilter::default();
        let by = |s: OrderSort| ids(&view.query(&filter, Some(&s)));
        // Stable on the two Oct 18 orders
        assert_eq!(by(OrderSort::DateDesc), vec!["#H1", "#H4", "#H2", "#H3"]);
        assert_eq!(by(OrderSort::DateAsc), vec!["#H2", "#H3", "#H4", "#H1"]);
        assert_eq!(by(OrderSort::CustomerAsc), vec!["#H3", "#H4", "#H1", "#H2"]);
        assert_eq!(by(OrderSort::TotalAsc), vec!["#H3", "#H1", "#H4", "#H2"]);
        assert_eq!(by(OrderSort::TotalDesc), vec!["#H2", "#H1", "#H4", "#H3"]);
    }

    #[test]
    fn test_stats_and_charts() {
        let orders = orders();
        let stats = OrderStats::compute(&orders);
        assert_eq!(
            stats,
            OrderStats {
                total: 4,
                items: 7,
                unpaid: 1,
                delivered: 1
            }
        );
        let charts = Order::charts(&orders, Utc::now());
        assert_eq!(charts[0].tally.labels(), ["Order processing", "Shipped", "Delivered"]);
        assert_eq!(charts[1].tally.labels(), ["Oct 23", "Oct 18", "Oct 20"]);
        assert_eq!(charts[1].tally.total(), 4);
    }

    #[test]
    fn test_filter_controls_cycle() {
        let mut filter = OrderFilter::default();
        filter.cycle(0);
        filter.cycle(1);
        filter.cycle(2);
        filter.cycle(2);
        assert_eq!(
            filter.controls(),
            vec![("Tab", "Unfulfilled"), ("Payment", "Paid"), ("Status", "Shipped")]
        );
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(amount::parse("$3,210.00"), Ok(3210.0));
        assert!(amount::parse("free").is_err());
        assert_eq!("close".parse::<OrderTab>(), Ok(OrderTab::Close));
        assert_eq!("processing".parse::<OrderStatus>(), Ok(OrderStatus::Processing));
        assert_eq!("unpaid".parse::<PaymentStatus>(), Ok(PaymentStatus::Unpaid));
    }

    #[test]
    fn test_item_cell_pluralization() {
        let orders = orders();
        assert_eq!(orders[0].cells()[5], "2 Items");
        assert_eq!(orders[1].cells()[5], "1 Item");
    }
}

//! Listing, stats and overview command handlers

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::api::error_handler::needs_login;
use crate::api::{ApiClient, MarketplaceApi};
use crate::cli::commands::{
    CategoriesCommand, ListOptions, OrdersCommand, OutputFormat, PromotionsCommand, UsersCommand,
};
use crate::cli::render;
use crate::core::{Config, SessionContext};
use crate::data::DataSource;
use crate::error::Result;
use crate::models::{
    format_money, Category, CategoryFilter, Listing, Order, OrderFilter, Overview, PromotionFilter,
    PromotionPlan, ScreenFilter, User, UserFilter,
};
use crate::records::{RecordView, Search};

/// Handle `users` commands
pub fn handle_users(command: UsersCommand, source: &DataSource) -> Result<()> {
    let users = source.users()?;
    match command {
        UsersCommand::List {
            options,
            role,
            sort,
        } => {
            let filter = UserFilter {
                role,
                ..Default::default()
            };
            print_listing::<User>(users, filter, sort, &options, "No users found matching your criteria")
        }
        UsersCommand::Stats => {
            print_stats(&users);
            Ok(())
        }
    }
}

/// Handle `orders` commands
pub fn handle_orders(command: OrdersCommand, source: &DataSource) -> Result<()> {
    let orders = source.orders()?;
    match command {
        OrdersCommand::List {
            options,
            tab,
            payment,
            status,
            sort,
        } => {
            let filter = OrderFilter {
                tab,
                payment,
                status,
                ..Default::default()
            };
            print_listing::<Order>(orders, filter, sort, &options, "No orders found matching your criteria")
        }
        OrdersCommand::Stats => {
            print_stats(&orders);
            Ok(())
        }
    }
}

/// Handle `categories` commands
pub async fn handle_categories(
    command: CategoriesCommand,
    source: &DataSource,
    config: &Config,
) -> Result<()> {
    match command {
        CategoriesCommand::List {
            options,
            date,
            sort,
            remote,
        } => {
            let categories = if remote {
                or_empty("categories", remote_categories(config).await)
            } else {
                source.categories()?
            };
            let filter = CategoryFilter {
                created: date,
                ..Default::default()
            };
            print_listing::<Category>(
                categories,
                filter,
                sort,
                &options,
                "No categories found matching your criteria",
            )
        }
        CategoriesCommand::Stats => {
            print_stats(&source.categories()?);
            Ok(())
        }
    }
}

/// Handle `promotions` commands
pub async fn handle_promotions(
    command: PromotionsCommand,
    source: &DataSource,
    config: &Config,
) -> Result<()> {
    match command {
        PromotionsCommand::List {
            options,
            status,
            sort,
            remote,
        } => {
            let plans = if remote {
                or_empty("promotion plans", remote_promotions(config).await)
            } else {
                source.promotions()?
            };
            let filter = PromotionFilter {
                status,
                ..Default::default()
            };
            print_listing::<PromotionPlan>(
                plans,
                filter,
                sort,
                &options,
                "No promotion plans found matching your criteria",
            )
        }
        PromotionsCommand::Stats => {
            print_stats(&source.promotions()?);
            Ok(())
        }
    }
}

/// Handle the `overview` command
pub fn handle_overview(source: &DataSource) -> Result<()> {
    let overview = source.overview()?;
    print!("{}", render_overview(&overview));
    Ok(())
}

fn remote_client(config: &Config) -> Result<ApiClient> {
    let session = SessionContext::load()?;
    ApiClient::from_session(&config.api_base_url, &session)
}

async fn remote_categories(config: &Config) -> Result<Vec<Category>> {
    remote_client(config)?.categories().await
}

async fn remote_promotions(config: &Config) -> Result<Vec<PromotionPlan>> {
    remote_client(config)?.promotions().await
}

/// Records from a backend fetch; a failed fetch warns and yields an empty set
fn or_empty<R>(what: &str, fetched: Result<Vec<R>>) -> Vec<R> {
    match fetched {
        Ok(records) => records,
        Err(e) => {
            warn!("Remote {} fetch failed: {}", what, e);
            eprintln!("Warning: could not fetch {} from the backend: {}", what, e);
            if needs_login(&e) {
                eprintln!("Run `marketdesk auth login` to sign in.");
            }
            Vec::new()
        }
    }
}

/// Filter, sort, limit and print one record set
pub fn print_listing<R>(
    records: Vec<R>,
    mut filter: R::Filter,
    sort: Option<R::Sort>,
    options: &ListOptions,
    empty_message: &str,
) -> Result<()>
where
    R: Listing + Serialize,
{
    if let Some(text) = &options.search {
        *filter.search_mut() = Search::new(text.as_str());
    }

    let view = RecordView::new(records);
    let sort = sort.or_else(R::default_sort);
    let mut rows = view.query(&filter, sort.as_ref());
    let matched = rows.len();
    if let Some(limit) = options.limit {
        rows.truncate(limit);
    }

    if options.format == OutputFormat::Table && rows.is_empty() {
        println!("{}", empty_message);
        return Ok(());
    }

    render::print_records(options.format, &rows, R::HEADERS, |r| r.cells())?;

    if options.format == OutputFormat::Table {
        println!();
        if rows.len() < matched {
            println!(
                "  Showing {} of {} matching ({} total)",
                rows.len(),
                matched,
                view.len()
            );
        } else {
            println!("  Showing {} of {}", matched, view.len());
        }
    }
    Ok(())
}

/// Print the stat cards and charts for the full record set
pub fn print_stats<R: Listing>(records: &[R]) {
    let now = Utc::now();
    println!("{}", R::TITLE);
    println!("{}", "=".repeat(R::TITLE.chars().count()));
    println!();
    print!("{}", render::stat_cards(&R::stat_cards(records, now)));
    for chart in R::charts(records, now) {
        println!();
        print!("{}", render::chart(&chart));
    }
}

fn render_overview(overview: &Overview) -> String {
    let mut out = String::from("Overview\n========\n\n");

    for headline in &overview.headlines {
        out.push_str(&format!(
            "  {:<18} {:>12}  {} {}\n",
            headline.title,
            headline.value,
            if headline.increasing { "↑" } else { "↓" },
            headline.change
        ));
    }

    out.push_str("\nSales\n");
    for (point, change) in overview.sales.iter().zip(overview.sales_changes()) {
        out.push_str(&format!(
            "  {:<6} {:>12}  {}\n",
            point.label,
            format_money("$", point.value),
            change.map(|c| c.label()).unwrap_or_default()
        ));
    }
    out.push_str(&format!(
        "  {:<6} {:>12}\n",
        "Total",
        format_money("$", overview.total_sales())
    ));

    if !overview.audience.is_empty() {
        out.push_str("\nAudience\n");
        for (label, share) in overview.audience_shares() {
            out.push_str(&format!("  {:<14} {:>5.1}%\n", label, share));
        }
    }

    if !overview.newest_products.is_empty() {
        out.push_str("\nNewest Products\n");
        let rows: Vec<Vec<String>> = overview
            .newest_products
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.status.label().to_string(),
                    format_money("$", p.price),
                    p.created.format("%b %-d, %Y").to_string(),
                ]
            })
            .collect();
        out.push_str(&render::table(&["Product", "Status", "Price", "Created"], &rows));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use crate::models::SeriesPoint;

    #[test]
    fn test_failed_fetch_degrades_to_empty() {
        let fetched: Result<Vec<Category>> = Err(DeskError::NotAuthenticated);
        assert!(or_empty("categories", fetched).is_empty());

        let plans = DataSource::bundled().promotions().unwrap();
        let count = plans.len();
        assert_eq!(or_empty("promotion plans", Ok(plans)).len(), count);
    }

    #[test]
    fn test_overview_sections() {
        let overview = Overview {
            sales: vec![
                SeriesPoint {
                    label: "Jan".into(),
                    value: 1900.0,
                },
                SeriesPoint {
                    label: "Feb".into(),
                    value: 3000.0,
                },
            ],
            audience: vec![
                SeriesPoint {
                    label: "Buyers".into(),
                    value: 3.0,
                },
                SeriesPoint {
                    label: "Sellers".into(),
                    value: 1.0,
                },
            ],
            ..Default::default()
        };
        let out = render_overview(&overview);
        assert!(out.contains("↑ $1100 (57.9%)"));
        assert!(out.contains("$4900.00"));
        assert!(out.contains("75.0%"));
        assert!(!out.contains("Newest Products"));
    }

    #[test]
    fn test_bundled_listings_render() {
        let source = DataSource::bundled();
        let options = ListOptions {
            limit: Some(2),
            ..Default::default()
        };
        print_listing::<User>(
            source.users().unwrap(),
            UserFilter::default(),
            None,
            &options,
            "none",
        )
        .unwrap();
        print_stats(&source.orders().unwrap());
    }
}

//! Product CLI command handlers

use std::io::{self, Write};

use crate::api::{ApiClient, MarketplaceApi};
use crate::cli::commands::{CreateProductArgs, ProductsCommand};
use crate::cli::listing::{print_listing, print_stats};
use crate::core::{Config, ProductForm, SessionContext, SubmitOutcome, Submission};
use crate::data::DataSource;
use crate::error::{DeskError, Result};
use crate::models::{Product, ProductFilter, ProductPatch, PromotionPlan};

/// Plan name meaning "list without promotion"
const FREE_PLAN: &str = "free";

/// Handle `products` commands
pub async fn handle_products(
    command: ProductsCommand,
    source: &DataSource,
    config: &Config,
) -> Result<()> {
    match command {
        ProductsCommand::List {
            options,
            price,
            sort,
        } => {
            let filter = ProductFilter {
                price,
                ..Default::default()
            };
            print_listing::<Product>(
                source.products()?,
                filter,
                sort,
                &options,
                "No products found matching your criteria",
            )
        }
        ProductsCommand::Stats => {
            print_stats(&source.products()?);
            Ok(())
        }
        ProductsCommand::Create(args) => handle_create(args, config).await,
        ProductsCommand::Update {
            id,
            name,
            description,
            price,
            discount,
            subcategory,
        } => {
            let patch = ProductPatch {
                name,
                description,
                price,
                discount,
                subcategory,
            };
            handle_update(&id, patch, config).await
        }
        ProductsCommand::Delete { id, force } => handle_delete(&id, force, config).await,
    }
}

async fn handle_create(args: CreateProductArgs, config: &Config) -> Result<()> {
    let mut session = SessionContext::load()?;
    let api = ApiClient::from_session(&config.api_base_url, &session)?;

    let promotion = (!args.plan.eq_ignore_ascii_case(FREE_PLAN)).then(|| args.plan.clone());
    let mut form = ProductForm {
        name: args.name,
        description: args.description,
        condition: args.condition.into(),
        category_id: args.category,
        subcategory: args.subcategory,
        price: args.price,
        images: Vec::new(),
        promotion,
    };
    for image in args.images {
        form.add_image(image)?;
    }

    println!("Loading categories and promotion plans...");
    let categories = api.categories().await?;
    // Validate before fetching plans
    form.validate(&categories)?;
    let plans = match &form.promotion {
        Some(kind) => {
            let plans = api.promotions().await?;
            require_plan(&plans, kind)?;
            plans
        }
        None => Vec::new(),
    };

    println!("Creating product '{}'...", form.name);
    let outcome = Submission::new()
        .submit(&api, &form, &categories, &plans, session.email())
        .await?;
    outcome.record(&mut session)?;

    match outcome {
        SubmitOutcome::Created { product_id } => {
            println!();
            println!("✓ Product listed successfully!");
            println!("  ID: {}", product_id);
        }
        SubmitOutcome::Redirect {
            product_id,
            authorization_url,
        } => {
            println!();
            println!("✓ Product saved as a draft (ID: {}).", product_id);
            println!();
            println!("Complete the promotion payment at:");
            println!("  {}", authorization_url);
            println!();
            println!("After paying, run:");
            println!("  marketdesk payment reconcile '<return URL>'");
        }
    }
    Ok(())
}

fn require_plan(plans: &[PromotionPlan], kind: &str) -> Result<()> {
    if plans.iter().any(|p| p.kind == kind && p.is_active) {
        return Ok(());
    }
    let available: Vec<&str> = plans
        .iter()
        .filter(|p| p.is_active)
        .map(|p| p.kind.as_str())
        .collect();
    Err(DeskError::InvalidInput(format!(
        "Unknown promotion plan '{}'. Available plans: {}, {}",
        kind,
        FREE_PLAN,
        available.join(", ")
    )))
}

async fn handle_update(id: &str, patch: ProductPatch, config: &Config) -> Result<()> {
    if patch.is_empty() {
        return Err(DeskError::InvalidInput(
            "Nothing to update. Pass at least one of --name, --description, --price, --discount, --subcategory."
                .into(),
        ));
    }
    if patch.price.is_some_and(|p| p < 0.0) {
        return Err(DeskError::InvalidInput("Price must not be negative".into()));
    }

    let session = SessionContext::load()?;
    let api = ApiClient::from_session(&config.api_base_url, &session)?;
    let product = api.update_product(id, patch).await?;

    println!("✓ Updated product '{}'", product.name);
    Ok(())
}

async fn handle_delete(id: &str, force: bool, config: &Config) -> Result<()> {
    let session = SessionContext::load()?;
    let api = ApiClient::from_session(&config.api_base_url, &session)?;

    if !force && !confirm(&format!("Delete product {}? This cannot be undone. [y/N] ", id))? {
        println!("Operation cancelled.");
        return Ok(());
    }

    api.delete_product(id).await?;
    println!("✓ Deleted product {}", id);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

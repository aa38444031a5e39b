//! Payment return CLI command handlers

use crate::api::ApiClient;
use crate::cli::commands::PaymentCommand;
use crate::core::submission::reconcile;
use crate::core::{Config, PaymentReturn, Reconciliation, SessionContext};
use crate::error::Result;

/// Handle `payment` commands
pub async fn handle_payment(command: PaymentCommand, config: &Config) -> Result<()> {
    match command {
        PaymentCommand::Reconcile { url } => handle_reconcile(&url, config).await,
        PaymentCommand::Pending => handle_pending(),
    }
}

async fn handle_reconcile(url: &str, config: &Config) -> Result<()> {
    let payment = PaymentReturn::parse(url)?;
    if payment == PaymentReturn::NoPayment {
        println!("{}", Reconciliation::NoPayment.message());
        return Ok(());
    }

    let mut session = SessionContext::load()?;
    let api = ApiClient::from_session(&config.api_base_url, &session)?;
    let outcome = reconcile(&api, &mut session, payment).await?;

    match &outcome {
        Reconciliation::Confirmed { product_id } => {
            println!("✓ {}", outcome.message());
            if let Some(id) = product_id {
                println!("  Product: {}", id);
            }
        }
        Reconciliation::Cancelled { product_id } => {
            println!("{}", outcome.message());
            if let Some(id) = product_id {
                println!("  Product: {}", id);
            }
        }
        Reconciliation::NoPayment => println!("{}", outcome.message()),
    }
    Ok(())
}

fn handle_pending() -> Result<()> {
    let session = SessionContext::load()?;
    match session.pending_product() {
        Some(id) => {
            println!("Product awaiting payment: {}", id);
            println!();
            println!("  After paying, run: marketdesk payment reconcile '<return URL>'");
        }
        None => println!("No product is awaiting payment."),
    }
    Ok(())
}

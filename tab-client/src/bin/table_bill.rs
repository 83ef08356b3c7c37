//! table-bill: load a table and show how its bill splits
//!
//! ```text
//! table-bill <restaurant> <branch> <table> [guest] [mode] [amount | dish ids...]
//! ```
//!
//! With a payment mode the checkout is started and the tip selection URL
//! printed.

use anyhow::{Context, bail};
use shared::{AppError, SessionAction};
use shared::models::TableRef;
use tab_client::{
    CheckoutService, ClientConfig, PaymentIntent, PaymentMode, TableApi, TableLoader,
    TableSession, logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = ClientConfig::from_env();
    logger::init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!(
            "usage: table-bill <restaurant> <branch> <table> [guest] [mode] \
             [amount | dish ids...]"
        );
    }
    let table = TableRef::new(&args[0], &args[1], &args[2]);

    // 2. Session
    let mut session = TableSession::new();
    session.apply(SessionAction::TableResolved(table.clone()));
    if let Some(guest) = args.get(3) {
        session.apply(SessionAction::GuestIdentified {
            guest_name: guest.clone(),
            user_id: None,
        });
    }

    // 3. Load
    let http = config
        .build_http_client()
        .context("Failed to build HTTP client")?;
    let api = TableApi::new(http);
    let loader = TableLoader::new(api.clone());
    let report = loader
        .load(&mut session)
        .await
        .with_context(|| format!("Failed to load {}", table.path()))?;
    for degraded in &report.degraded {
        tracing::warn!("{} unavailable: {}", degraded.read.as_str(), degraded.error);
    }

    let allocation = session
        .allocation()
        .context("Table access was not granted")?;
    println!("{}", serde_json::to_string_pretty(&allocation)?);

    // 4. Optional checkout
    let Some(mode) = args.get(4) else {
        return Ok(());
    };
    let mode: PaymentMode = mode.parse()?;
    let rest = &args[5..];
    let intent = match mode {
        PaymentMode::FullBill => PaymentIntent::FullBill,
        PaymentMode::EqualShares => PaymentIntent::EqualShares,
        PaymentMode::UserItems => PaymentIntent::UserItems,
        PaymentMode::SelectItems => PaymentIntent::SelectItems {
            dish_order_ids: rest.to_vec(),
        },
        PaymentMode::ChooseAmount => PaymentIntent::ChooseAmount {
            amount: rest
                .first()
                .context("choose-amount needs an amount")?
                .parse()
                .context("Amount is not a number")?,
        },
    };

    let checkout = CheckoutService::new(api, &config)?;
    let started = match checkout.begin(&mut session, &intent).await {
        Ok(started) => started,
        Err(e) => {
            let err = AppError::from(e);
            tracing::error!(code = %err.code, "Checkout not started");
            bail!("{} ({})", err.message, err.code);
        }
    };
    println!("{}", started.url);
    Ok(())
}

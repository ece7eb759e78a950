//! services/app/src/bin/app.rs

use app_lib::{
    adapters::{HttpIdentityAdapter, HttpQuoteStore},
    config::Config,
    error::AppError,
    navigator::Navigator,
};
use quotevault_core::{IdentityService, QuoteFeed, QuoteStore, ScreenSet};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting QuoteVault client...");

    // --- 2. Build the Backend Adapters ---
    let http = reqwest::Client::new();
    let identity = Arc::new(HttpIdentityAdapter::new(
        http.clone(),
        config.api_url.clone(),
        config.api_key.clone(),
    ));
    // The store authorizes its requests with whatever session the identity
    // adapter currently holds.
    let store: Arc<dyn QuoteStore> = Arc::new(HttpQuoteStore::new(
        http,
        config.api_url.clone(),
        config.api_key.clone(),
        identity.watch_sessions(),
    ));
    let identity: Arc<dyn IdentityService> = identity;

    // --- 3. Activate the Session Gate ---
    let mut navigator = Navigator::new(identity.clone());
    let initial = navigator.activate().await;
    info!("Session gate resolved: {:?} screens reachable", initial);

    // --- 4. Mount the Quote Feed When Authenticated ---
    let mut feed = QuoteFeed::with_page_size(identity.clone(), store.clone(), config.page_size);
    if initial == ScreenSet::Authenticated {
        feed.activate().await;
        report_feed(&feed);
    }

    // --- 5. React to Session Transitions Until Shutdown ---
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
            transition = navigator.next_transition() => {
                match transition {
                    Some(ScreenSet::Authenticated) => {
                        info!("Signed in; home screens reachable");
                        feed.activate().await;
                        report_feed(&feed);
                    }
                    Some(ScreenSet::Unauthenticated) => {
                        info!("Signed out; authentication screens reachable");
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}

fn report_feed(feed: &QuoteFeed) {
    info!(
        "Feed loaded: {} quotes on page {}, {} favorites",
        feed.quotes().len(),
        feed.page(),
        feed.favorite_ids().len()
    );
    if let Some(quote) = feed.quote_of_day() {
        info!("Quote of the day: \"{}\" - {}", quote.text, quote.author);
    }
}

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gbot_value_scanner::{
    util::version::{version_label, APP_NAME},
    BotLookup, LookupConfig, LookupSession, SlotUpdate,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match LookupConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    let session = match BotLookup::from_config(&config) {
        Ok(lookup) => LookupSession::new(lookup),
        Err(err) => {
            error!("failed to initialise tonapi client: {err}");
            std::process::exit(2);
        }
    };

    println!("{APP_NAME} {}", version_label());
    println!("Enter a G-Bot number (1-based), one per line.");

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("failed to read input: {err}");
                break;
            }
        };

        match session.submit(&line).await {
            Ok(SlotUpdate::Replaced) => print_current(&session).await,
            Ok(SlotUpdate::Unchanged | SlotUpdate::Stale) => {}
            Err(err) => println!("Lookup failed: {err}"),
        }
    }
}

async fn print_current(session: &LookupSession) {
    let Some(bot) = session.current().await else {
        return;
    };

    println!("{} ({})", bot.display_name(), bot.index);
    println!("  address:      {}", bot.address);
    println!("  mining value: {}", session.mining_value().await);
    match session.preview_url().await {
        Ok(Some(url)) => println!("  preview:      {url}"),
        Ok(None) => {}
        Err(err) => println!("  preview:      unavailable ({err})"),
    }
}

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use cfxwatch_common::models::feed::{FeedKind, FeedState};
use cfxwatch_common::traits::api::{ChatApi, ConfigStore};
use cfxwatch_core::config::JsonConfigStore;
use cfxwatch_core::platforms::PlatformIntegration;
use cfxwatch_core::platforms::browser::HeadlessScreenshotter;
use cfxwatch_core::platforms::cfx::{CfxServerClient, CfxStatusClient};
use cfxwatch_core::platforms::discord::DiscordPlatform;
use cfxwatch_core::services::{
    MessageUpserter, PlatformStatusFeed, PlatformStatusSettings, ServerStatusFeed,
    ServerStatusSettings, StatusFeed,
};
use cfxwatch_core::tasks::status_ticker::{run_once, spawn_status_ticker, wait_until_ready};
use cfxwatch_core::{DefaultHttpClient, Error, HttpClient};

#[derive(Parser, Debug, Clone)]
#[command(name = "cfxwatch")]
#[command(author, version, about = "cfxwatch - posts FiveM server and Cfx.re platform status to Discord")]
struct Args {
    /// Path to the JSON configuration (also where message ids are written back)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run a single tick of each feed, then exit
    #[arg(long, default_value = "false")]
    once: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("cfxwatch=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("cfxwatch starting. config={}, once={}", args.config.display(), args.once);

    if let Err(e) = run(args).await {
        error!("cfxwatch stopped: {:?}", e);
        return Err(Box::new(e) as Box<dyn std::error::Error>);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run(args: Args) -> Result<(), Error> {
    // 1) Configuration
    let store = Arc::new(JsonConfigStore::load(&args.config)?);
    let config = store.snapshot().await;

    // DISCORD_TOKEN wins over the file so the token can live outside config.json.
    let token = config.resolve_token(std::env::var("DISCORD_TOKEN").ok())?;

    // 2) Discord session
    let mut discord = DiscordPlatform::new(token);
    discord.connect().await?;
    let chat: Arc<dyn ChatApi> = Arc::new(discord.chat()?);

    // 3) Feeds
    let config_store: Arc<dyn ConfigStore> = store.clone();
    let upserter = Arc::new(MessageUpserter::new(chat, config_store));
    let http: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new(Duration::from_secs(
        config.http.timeout_secs,
    ))?);

    let server_feed: Arc<dyn StatusFeed> = Arc::new(ServerStatusFeed::new(
        Arc::new(CfxServerClient::new(http.clone(), &config.http.servers_api)),
        upserter.clone(),
        ServerStatusSettings::from_config(&config)?,
    ));
    let platform_feed: Arc<dyn StatusFeed> = Arc::new(PlatformStatusFeed::new(
        Arc::new(CfxStatusClient::new(http, &config.http.status_api)),
        Arc::new(HeadlessScreenshotter::new(config.screenshot.clone())),
        upserter,
        PlatformStatusSettings::from_config(&config)?,
    ));

    let feeds = vec![
        (server_feed, FeedState::new(config.last_message_id(FeedKind::GameServer)?)),
        (platform_feed, FeedState::new(config.last_message_id(FeedKind::Platform)?)),
    ];

    // 4) Run
    if args.once {
        let mut ready = discord.ready_signal();
        wait_until_ready(&mut ready).await?;
        run_once(feeds).await;
    } else {
        let handles = spawn_status_ticker(feeds, &config.schedule, discord.ready_signal());
        info!("Status loops scheduled; press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        info!("Shutdown requested");
        for handle in handles {
            handle.abort();
        }
    }

    if let Err(e) = discord.disconnect().await {
        warn!("Error while disconnecting from Discord: {:?}", e);
    }
    Ok(())
}

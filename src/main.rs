use color_eyre::eyre::Result;
use doctor_sync_core::clock::SystemClock;
use doctor_sync_db::{PgSyncStore, create_pool, schema::initialize_database};
use doctor_sync_engine::{DirectoryClient, SyncConfig, Synchronizer};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = SyncConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let client = DirectoryClient::new(&config)?;
    let synchronizer = Synchronizer::new(
        client,
        PgSyncStore::new(db_pool),
        SystemClock,
        config.alert_policy(),
    )
    .with_freshness(config.freshness_policy());

    let Some(period) = config.interval else {
        synchronizer.run().await;
        return Ok(());
    };

    info!("Running doctor slot sync every {:?}", period);
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                synchronizer.run().await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested, stopping sync loop");
                break;
            }
        }
    }

    Ok(())
}

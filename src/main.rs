use convention_pos::{
    config::{database, settings},
    core::{event, product, report},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_app_config()?;

    // 4. Open the store and bring the schema up to date
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to open store at {database_url}: {e}"))?;
    database::migrate(&db)
        .await
        .inspect(|migrated| info!("Store ready (migrated: {migrated})"))
        .inspect_err(|e| error!("Failed to migrate store: {e}"))?;

    // 5. Seed the catalog from config
    let seeded = product::seed_products(&db, &app_config.products).await?;
    if seeded > 0 {
        info!("Seeded {seeded} product(s) from config");
    }

    // 6. Print a sales report per event
    let events = event::get_all_events(&db).await?;
    if events.is_empty() {
        println!("No events so far");
    }
    for ev in events {
        let sales = report::generate_event_report(&db, ev.id).await?;
        println!("{}", report::format_event_report(&sales));
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;
use story_booking::application::booking_session::{BookingSession, SessionCollaborators};
use story_booking::application::leads::LeadCapture;
use story_booking::config::ServerConfig;
use story_booking::domain::plan::Plan;
use story_booking::domain::ports::{
    BookingStoreBox, LeadStoreBox, ManualClaimStoreBox, PaymentOrderStoreBox,
};
use story_booking::infrastructure::asset_store::LocalAssetStore;
use story_booking::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryLeadStore, InMemoryManualClaimStore, InMemoryPaymentOrderStore,
};
use story_booking::infrastructure::lead_log::LeadLog;
use story_booking::infrastructure::media_kit::MediaKitLibrary;
use story_booking::infrastructure::notifier::LogNotifier;
use story_booking::interfaces::csv::booking_writer::BookingWriter;
use story_booking::interfaces::http::{AppState, router};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the booking HTTP API
    Serve(ServerConfig),
    /// Print the plan catalog as CSV
    Plans,
    /// Print every stored booking as CSV
    Export {
        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long, env = "DB_PATH")]
        db_path: Option<PathBuf>,
    },
}

struct Stores {
    bookings: BookingStoreBox,
    orders: PaymentOrderStoreBox,
    claims: ManualClaimStoreBox,
    leads: LeadStoreBox,
}

fn in_memory_stores() -> Stores {
    Stores {
        bookings: Box::new(InMemoryBookingStore::new()),
        orders: Box::new(InMemoryPaymentOrderStore::new()),
        claims: Box::new(InMemoryManualClaimStore::new()),
        leads: Box::new(InMemoryLeadStore::new()),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    use story_booking::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Stores {
                bookings: Box::new(store.clone()),
                orders: Box::new(store.clone()),
                claims: Box::new(store.clone()),
                leads: Box::new(store),
            })
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

async fn serve(config: ServerConfig) -> Result<()> {
    let gateway = config.payment_gateway().into_diagnostic()?;
    let stores = open_stores(config.db_path.clone())?;

    let session = BookingSession::new(
        SessionCollaborators {
            bookings: stores.bookings,
            orders: stores.orders,
            claims: stores.claims,
            assets: Box::new(LocalAssetStore::new(&config.upload_dir)),
            gateway,
            notifier: Box::new(LogNotifier),
        },
        config.currency.clone(),
    );
    let leads = LeadCapture::new(
        stores.leads,
        Some(LeadLog::new(&config.lead_log)),
        config.download_url.clone(),
    )
    .with_media_kit(MediaKitLibrary::new(&config.media_kit_dir));

    let state = AppState::new(session, leads).with_max_upload_bytes(config.max_upload_bytes);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .into_diagnostic()?;
    tracing::info!(addr = %config.bind, "booking API listening");

    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn export(db_path: Option<PathBuf>) -> Result<()> {
    let stores = open_stores(db_path)?;
    let bookings = stores.bookings.list().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BookingWriter::new(stdout.lock());
    writer.write_bookings(&bookings).into_diagnostic()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => serve(config).await,
        Command::Plans => {
            let stdout = io::stdout();
            let mut writer = BookingWriter::new(stdout.lock());
            writer.write_plans(Plan::all()).into_diagnostic()
        }
        Command::Export { db_path } => export(db_path).await,
    }
}

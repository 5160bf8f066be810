use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use shopease::application::auth::AuthService;
use shopease::application::cart::CartService;
use shopease::application::catalog::CatalogService;
use shopease::application::checkout::CheckoutService;
use shopease::application::poller::PaymentPoller;
use shopease::application::repository::Repository;
use shopease::config::{GatewayConfig, MerchantConfig, PollPolicy, SimulationMode};
use shopease::domain::money::format_inr;
use shopease::domain::payment::{BillingAddress, CardDetails};
use shopease::domain::ports::KeyValueStoreRef;
use shopease::domain::product::ProductFilter;
use shopease::domain::user::{Credentials, SignupRequest};
use shopease::infrastructure::in_memory::InMemoryStore;
#[cfg(feature = "storage-rocksdb")]
use shopease::infrastructure::rocksdb::RocksDBStore;
use shopease::infrastructure::simulated::SimulatedUpiGateway;
use shopease::interfaces::csv::product_reader::ProductReader;
use shopease::interfaces::csv::product_writer::ProductWriter;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Product catalog CSV. Defaults to the built-in demo catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products as CSV
    Products(ProductArgs),
    /// List product categories
    Categories,
    /// Register a new account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in, fill the cart and pay for it
    Checkout(CheckoutArgs),
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    skip: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Upi,
    Card,
}

#[derive(Clone)]
struct ItemSpec {
    product_id: String,
    quantity: u32,
}

fn parse_item(value: &str) -> Result<ItemSpec, String> {
    let (product_id, quantity) = match value.split_once(':') {
        Some((id, qty)) => (
            id,
            qty.parse::<u32>()
                .map_err(|e| format!("invalid quantity '{qty}': {e}"))?,
        ),
        None => (value, 1),
    };
    if product_id.is_empty() {
        return Err("product id must not be empty".to_string());
    }
    Ok(ItemSpec {
        product_id: product_id.to_string(),
        quantity,
    })
}

#[derive(Args)]
struct AddressArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip_code: String,
}

impl From<AddressArgs> for BillingAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            full_name: args.full_name,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
        }
    }
}

#[derive(Args)]
struct CardArgs {
    #[arg(long)]
    card_number: Option<String>,
    #[arg(long)]
    expiry: Option<String>,
    #[arg(long)]
    cvv: Option<String>,
    #[arg(long)]
    card_name: Option<String>,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,

    /// Product to buy, as ID or ID:QTY. Repeatable.
    #[arg(long = "item", required = true, value_parser = parse_item)]
    items: Vec<ItemSpec>,

    #[command(flatten)]
    billing: AddressArgs,

    #[arg(long, value_enum, default_value_t = Method::Upi)]
    method: Method,

    #[command(flatten)]
    card: CardArgs,

    /// UPI ID that receives the payment
    #[arg(long, env = "SHOPEASE_MERCHANT_ID", default_value = "merchant@paytm")]
    merchant_id: String,

    #[arg(long, env = "SHOPEASE_MERCHANT_NAME", default_value = "ShopEase")]
    merchant_name: String,

    #[arg(long, env = "SHOPEASE_POLL_MAX_ATTEMPTS", default_value_t = PollPolicy::CHECKOUT.max_attempts())]
    max_attempts: u32,

    #[arg(long, env = "SHOPEASE_POLL_INTERVAL_MS", default_value_t = 3000)]
    interval_ms: u64,

    /// Outcome the simulated UPI gateway reports
    #[arg(long, value_enum, default_value_t = SimulationMode::Random)]
    simulate: SimulationMode,

    /// Fixed gateway latency instead of the default 1.5-2.5s range
    #[arg(long)]
    gateway_latency_ms: Option<u64>,

    /// Seed for the simulated gateway
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let repo = Repository::new(open_store(cli.db_path.as_deref())?);
    let catalog = Arc::new(load_catalog(cli.catalog.as_deref())?);

    match cli.command {
        Command::Products(args) => {
            let filter = ProductFilter {
                category: args.category,
                search: args.search,
                min_price: args.min_price,
                max_price: args.max_price,
                limit: args.limit,
                skip: args.skip,
            };
            let page = catalog.list(&filter);

            let stdout = io::stdout();
            let mut writer = ProductWriter::new(stdout.lock());
            writer.write_products(&page.products).into_diagnostic()?;
        }
        Command::Categories => {
            for category in catalog.categories() {
                println!("{category}");
            }
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            let auth = AuthService::new(repo);
            let session = auth
                .signup(&SignupRequest {
                    username,
                    email,
                    password,
                })
                .await
                .into_diagnostic()?;
            println!(
                "Registered {} ({})",
                session.user.username, session.user.id
            );
        }
        Command::Checkout(args) => checkout(repo, catalog, args).await?,
    }

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<&Path>) -> Result<KeyValueStoreRef> {
    match db_path {
        Some(path) => Ok(Arc::new(RocksDBStore::open(path).into_diagnostic()?)),
        None => Ok(Arc::new(InMemoryStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<&Path>) -> Result<KeyValueStoreRef> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryStore::new()))
}

fn load_catalog(path: Option<&Path>) -> Result<CatalogService> {
    match path {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            let products = ProductReader::new(file).read_all();
            tracing::info!(count = products.len(), path = %path.display(), "Catalog loaded");
            Ok(CatalogService::new(products))
        }
        None => Ok(CatalogService::demo()),
    }
}

async fn checkout(
    repo: Repository,
    catalog: Arc<CatalogService>,
    args: CheckoutArgs,
) -> Result<()> {
    let auth = AuthService::new(repo.clone());
    auth.seed_demo_user().await.into_diagnostic()?;
    let session = auth
        .login(&Credentials {
            username: args.username,
            password: args.password,
        })
        .await
        .into_diagnostic()?;
    let user_id = session.user.id;

    let carts = CartService::new(repo.clone(), catalog);
    for item in &args.items {
        carts
            .add(&user_id, &item.product_id, item.quantity)
            .await
            .into_diagnostic()?;
    }

    let merchant = MerchantConfig::new(args.merchant_id, args.merchant_name).into_diagnostic()?;
    let policy = PollPolicy::new(args.max_attempts, Duration::from_millis(args.interval_ms))
        .into_diagnostic()?;
    let mut gateway = GatewayConfig {
        mode: args.simulate,
        seed: args.seed,
        ..GatewayConfig::default()
    };
    if let Some(ms) = args.gateway_latency_ms {
        let latency = Duration::from_millis(ms);
        gateway.latency = latency..=latency;
    }

    let poller = PaymentPoller::new(Arc::new(SimulatedUpiGateway::new(gateway)), policy);
    let checkout = CheckoutService::new(repo, carts, poller, merchant);
    let address = BillingAddress::from(args.billing);

    let order = match args.method {
        Method::Upi => {
            let upi = checkout.prepare_upi(&user_id).await.into_diagnostic()?;
            println!("UPI intent: {}", upi.intent);
            println!("Amount due: {}", format_inr(upi.quote.total));
            checkout
                .confirm_upi(&user_id, &upi, &address)
                .await
                .into_diagnostic()?
        }
        Method::Card => {
            let card = CardDetails {
                number: args.card.card_number.unwrap_or_default(),
                expiry: args.card.expiry.unwrap_or_default(),
                cvv: args.card.cvv.unwrap_or_default(),
                name_on_card: args.card.card_name.unwrap_or_default(),
            };
            checkout
                .pay_with_card(&user_id, &card, &address)
                .await
                .into_diagnostic()?
        }
    };

    println!("Order {} confirmed", order.id);
    println!("  method: {}", order.method);
    println!("  total: {}", format_inr(order.total_amount));
    println!("  transaction: {}", order.transaction_id);
    if let Some(reference) = &order.reference_id {
        println!("  reference: {reference}");
    }
    println!("  tracking: {}", order.tracking_number);
    Ok(())
}

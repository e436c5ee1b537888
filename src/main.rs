//! Store Admin CLI
//!
//! Terminal front-end of the admin panel:
//! - Log in and out
//! - Show the sales dashboard
//! - List, create, update and delete products

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use storeadmin::client::Product;
use storeadmin::config::{generate_default_config, Config};
use storeadmin::router::Screen;
use storeadmin::views::dashboard::DashboardSummary;
use storeadmin::views::{DashboardState, Notice, ProductField, ProductManager};
use storeadmin::AdminPanel;

#[derive(Parser)]
#[command(name = "storeadmin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Administration panel for the store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in as an administrator
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in administrator
    Whoami,

    /// Show the sales dashboard
    Dashboard,

    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Resolve a panel path through the route guard
    Open {
        /// Path such as /dashboard or /products
        path: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// List all products
    List,

    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Update a product; omitted fields keep their value
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Delete a product
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct ProductArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

impl ProductArgs {
    fn values(&self) -> Vec<(ProductField, &str)> {
        [
            (ProductField::Name, &self.name),
            (ProductField::Description, &self.description),
            (ProductField::Price, &self.price),
            (ProductField::Category, &self.category),
            (ProductField::Stock, &self.stock),
            (ProductField::Image, &self.image),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_ref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    storeadmin::logging::init(&config.logging);

    let mut panel = AdminPanel::from_config(&config)?;
    panel.start().await;

    match cli.command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            panel.navigate("/login").await;
            match panel.login(&email, &password).await {
                Ok(user) => println!("Logged in as {} <{}>", user.name, user.email),
                Err(e) => bail!(e.user_message()),
            }
        }

        Commands::Logout => {
            panel.logout().await;
            println!("Logged out");
        }

        Commands::Whoami => match panel.session().snapshot().user {
            Some(user) => match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                OutputFormat::Table => println!("{} <{}> (administrator)", user.name, user.email),
            },
            None => println!("Not logged in"),
        },

        Commands::Dashboard => {
            require(panel.navigate("/dashboard").await, Screen::Dashboard)?;
            let view = panel.dashboard().context("Dashboard not mounted")?;

            match view.state().await {
                DashboardState::Ready(stats) => match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                    OutputFormat::Table => print_dashboard(&DashboardSummary::from(&stats)),
                },
                _ => bail!("Could not load the statistics"),
            }
        }

        Commands::Products { action } => {
            require(panel.navigate("/products").await, Screen::Products)?;
            let manager = panel.products().context("Products view not mounted")?;
            run_products(&manager, action, cli.format).await?;
        }

        Commands::Open { path } => {
            let screen = panel.navigate(&path).await;
            println!("{} -> {:?}", panel.location().path(), screen);

            let layout = panel.layout();
            if let Some(user) = &layout.user {
                for entry in &layout.menu {
                    let marker = if entry.active { "*" } else { " " };
                    println!(" {} {:<12} {}", marker, entry.label, entry.path);
                }
                println!("[{}] {}", user.initial, user.name);
            }
        }

        Commands::Config { .. } => unreachable!("handled before loading the config"),
    }

    Ok(())
}

async fn run_products(
    manager: &ProductManager,
    action: ProductAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        ProductAction::List => {
            let products = manager.products().await;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&products)?),
                OutputFormat::Table => print_products(&products),
            }
        }

        ProductAction::Create { fields } => {
            manager.open_create().await;
            for (field, value) in fields.values() {
                manager.set_field(field, value).await?;
            }
            let result = manager.submit().await;
            report(manager.notice().await, result.is_ok())?;
        }

        ProductAction::Update { id, fields } => {
            manager.open_edit(&id).await?;
            for (field, value) in fields.values() {
                manager.set_field(field, value).await?;
            }
            let result = manager.submit().await;
            report(manager.notice().await, result.is_ok())?;
        }

        ProductAction::Delete { id, yes } => {
            let confirm = |question: &str| yes || ask(question);
            match manager.delete(&id, &confirm).await {
                Ok(false) => println!("Cancelled"),
                Ok(true) => report(manager.notice().await, true)?,
                Err(_) => report(manager.notice().await, false)?,
            }
        }
    }
    Ok(())
}

fn require(screen: Screen, wanted: Screen) -> anyhow::Result<()> {
    match screen {
        s if s == wanted => Ok(()),
        Screen::Login => bail!("Not logged in. Run `storeadmin login --email <email>` first."),
        other => bail!("Cannot open this screen ({:?})", other),
    }
}

fn report(notice: Option<Notice>, ok: bool) -> anyhow::Result<()> {
    match notice {
        Some(Notice::Success(text)) if ok => {
            println!("{}", text);
            Ok(())
        }
        Some(notice) => bail!("{}", notice.text()),
        None if ok => Ok(()),
        None => bail!("Request failed"),
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn ask(question: &str) -> bool {
    match prompt(&format!("{} [y/N] ", question)) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_dashboard(summary: &DashboardSummary) {
    for card in &summary.cards {
        println!("{:<12} {}", card.label, card.value);
    }

    println!();
    println!("Sales by month");
    for point in &summary.monthly_sales {
        println!("  {:<10} {:>12.2}", point.label, point.value);
    }

    println!();
    println!("Sales by category");
    for share in &summary.categories {
        println!(
            "  {:<16} {:>12.2} {:>7}",
            share.category,
            share.total,
            share.percent_label()
        );
    }

    println!();
    println!("Top products");
    for (rank, product) in summary.top_products.iter().enumerate() {
        println!("  {}. {:<28} {} sold", rank + 1, product.name, product.sold);
    }

    println!();
    println!(
        "{:<10} {:<20} {:>12} {:<10} {}",
        "Order", "Customer", "Total", "Date", "Status"
    );
    println!("{}", "-".repeat(64));
    for row in &summary.recent_orders {
        println!(
            "{:<10} {:<20} {:>12} {:<10} {}",
            row.short_id, row.customer, row.total, row.date, row.status
        );
    }
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products yet.");
        return;
    }

    println!(
        "{:<26} {:<28} {:>10} {:<14} {:>6}",
        "ID", "Name", "Price", "Category", "Stock"
    );
    println!("{}", "-".repeat(88));
    for p in products {
        println!(
            "{:<26} {:<28} {:>10.2} {:<14} {:>6}",
            p.id, p.name, p.price, p.category, p.stock
        );
    }
}

//! tailor-console: the back-office pages as terminal commands.
//!
//! Connection settings come from `TAILOR_API_BASE_URL`, `TAILOR_TENANT_ID`
//! and `TAILOR_API_TIMEOUT_SECS`; the flags below override them.

use std::fmt::Display;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tailor_core::{
    Api, AppointmentsView, ClientConfig, CustomerDetailView, CustomerListView, DiagnosesView,
    FlowState, FormField, ViewState,
};

#[derive(Parser)]
#[command(name = "tailor-console")]
#[command(about = "Back-office console for the made-to-measure tailoring service")]
#[command(version)]
struct Cli {
    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Tenant to act for
    #[arg(long, global = true)]
    tenant: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List customers, optionally filtered by name or phone
    Customers {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one customer and their order history
    Customer { id: String },
    /// List the latest body-type diagnoses
    Diagnoses,
    /// List fitting appointments
    Appointments,
    /// Create an order for a customer and generate its order document
    CreateOrder {
        customer_id: String,
        #[arg(long)]
        fabric_id: String,
        /// Total in yen, tax included
        #[arg(long)]
        amount: String,
        /// YYYY-MM-DD; defaults to today
        #[arg(long)]
        delivery_date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tailor_core=info,tailor_console=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("reading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(tenant) = cli.tenant {
        config.tenant_id = tenant;
    }
    tracing::debug!(base_url = %config.base_url, tenant_id = %config.tenant_id, "configured");
    let api = Api::from_config(&config).context("building HTTP client")?;

    match cli.command {
        Commands::Customers { search } => {
            let mut view = CustomerListView::new(api);
            view.set_search(search);
            let page = view.load().await;
            print_state(&page, |page| {
                for c in &page.items {
                    println!(
                        "{}\t{}\t{}\t{}",
                        c.id,
                        c.name,
                        c.phone.as_deref().unwrap_or("-"),
                        c.email.as_deref().unwrap_or("-")
                    );
                }
                println!("total: {}", page.total);
            })?;
        }
        Commands::Customer { id } => {
            let view = CustomerDetailView::new(api, id);
            view.load().await;
            let profile = print_state(&view.customer_state(), |c| {
                println!("{} ({})", c.name, c.id);
                println!("  email:   {}", c.email.as_deref().unwrap_or("-"));
                println!("  phone:   {}", c.phone.as_deref().unwrap_or("-"));
                println!("  address: {}", c.address.as_deref().unwrap_or("-"));
            });
            println!();
            let orders = print_state(&view.orders_state(), |orders| {
                for o in orders {
                    println!(
                        "{}\t{}\t¥{}\t{}",
                        o.id,
                        o.status.as_str(),
                        o.total_amount,
                        o.created_at.format("%Y-%m-%d")
                    );
                }
            });
            profile.and(orders)?;
        }
        Commands::Diagnoses => {
            let view = DiagnosesView::new(api);
            print_state(&view.load().await, |page| {
                for d in &page.items {
                    println!(
                        "{}\t{}\t{}\t{}",
                        d.id,
                        d.user_id,
                        d.archetype.as_str(),
                        d.plan_type.map(|p| p.as_str()).unwrap_or("-")
                    );
                }
            })?;
        }
        Commands::Appointments => {
            let view = AppointmentsView::new(api);
            print_state(&view.load().await, |page| {
                for a in &page.items {
                    println!(
                        "{}\t{}\t{:?}\t{}",
                        a.id,
                        a.appointment_datetime.format("%Y-%m-%d %H:%M"),
                        a.status,
                        a.fitter_id.as_deref().unwrap_or("-")
                    );
                }
            })?;
        }
        Commands::CreateOrder {
            customer_id,
            fabric_id,
            amount,
            delivery_date,
            description,
        } => {
            let view = CustomerDetailView::new(api, customer_id);
            let dialog = view.dialog();
            dialog.open();
            dialog.edit(FormField::FabricId, fabric_id);
            dialog.edit(FormField::TotalAmount, amount);
            if let Some(date) = delivery_date {
                dialog.edit(FormField::DeliveryDate, date);
            }
            if let Some(description) = description {
                dialog.edit(FormField::Description, description);
            }
            match dialog.submit().await {
                FlowState::Done { document } => {
                    println!("order {} created", document.order_id);
                    println!("document: {}", document.doc_url);
                }
                FlowState::Error(err) => {
                    fail(err.headline(), &err)?;
                }
                other => bail!("order flow stopped in state {other:?}"),
            }
        }
    }

    Ok(())
}

/// Print a view's render state; an error banner becomes the command's error.
fn print_state<T>(state: &ViewState<T>, rows: impl FnOnce(&T)) -> Result<()> {
    match state {
        ViewState::Loading => bail!("no data loaded"),
        ViewState::Empty(message) => println!("{message}"),
        ViewState::Ready(data) => rows(data),
        ViewState::Error(banner) => {
            fail(Some(banner.headline), &banner.detail.as_deref().unwrap_or_default())?
        }
    }
    Ok(())
}

fn fail(headline: Option<&str>, detail: &dyn Display) -> Result<()> {
    match headline {
        Some(headline) => bail!("{headline} {detail}"),
        None => bail!("{detail}"),
    }
}

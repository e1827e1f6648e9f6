mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use procura_client::ApiClient;
use procura_pipeline::{
    EmailUpdate, PipelineConfig, discover_email, import_articles, remove_article,
    save_manual_email, search_and_validate, validate_emails,
};
use procura_store::{JsonFileStore, WhoisCache};

#[derive(Parser)]
#[command(name = "procura", version, about = "Article/supplier sourcing client")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "PROCURA_API_URL", default_value = "http://localhost:8000", global = true)]
    api_url: String,

    /// Session bearer token.
    #[arg(long, env = "PROCURA_TOKEN", global = true)]
    token: Option<String>,

    /// Directory for the persistent WHOIS status cache.
    #[arg(long, env = "PROCURA_CACHE_DIR", default_value = ".procura", global = true)]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage articles (sourcing codes).
    #[command(subcommand)]
    Articles(ArticlesCommand),
    /// Search and validate suppliers for an article.
    #[command(subcommand)]
    Suppliers(SuppliersCommand),
    /// Discover or set supplier emails.
    #[command(subcommand)]
    Email(EmailCommand),
    /// Manage procurement requests (invoices).
    #[command(subcommand)]
    Requests(RequestsCommand),
}

#[derive(Subcommand)]
enum ArticlesCommand {
    /// List articles, optionally only those on one request.
    List {
        #[arg(long)]
        request: Option<u64>,
    },
    /// Create an article by code.
    Add { code: String },
    /// Remove an article; with --request, only detach it from that request.
    Remove {
        id: u64,
        #[arg(long)]
        request: Option<u64>,
    },
    /// Import article codes from a header-less CSV file (first column).
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum SuppliersCommand {
    /// List known suppliers for an article with cached WHOIS status.
    List { article_id: u64 },
    /// Run backend discovery, dedupe, and WHOIS-validate the results.
    Search {
        article_id: u64,
        /// Re-run WHOIS validation even if this article was already checked.
        #[arg(long)]
        force: bool,
        /// Concurrent WHOIS batch requests.
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Mark each supplier's stored email syntactically valid or invalid.
    ValidateEmails { article_id: u64 },
}

#[derive(Subcommand)]
enum EmailCommand {
    /// Ask the backend's email search for a supplier's address.
    Discover { article_id: u64, supplier_id: u64 },
    /// Set a supplier's email manually (accepted as-is, not validated).
    Set {
        article_id: u64,
        supplier_id: u64,
        email: String,
    },
}

#[derive(Subcommand)]
enum RequestsCommand {
    List,
    /// Create a request by number (numbers are unique).
    Create { number: String },
    /// Attach an article to a request.
    Attach { request_id: u64, article_id: u64 },
    /// Detach an article from a request.
    Detach { request_id: u64, article_id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("procura v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url.clone(), cli.token.clone());

    match cli.command {
        Command::Articles(cmd) => run_articles(&client, cmd).await,
        Command::Suppliers(cmd) => run_suppliers(&client, &cli.cache_dir, cmd).await,
        Command::Email(cmd) => run_email(&client, cmd).await,
        Command::Requests(cmd) => run_requests(&client, cmd).await,
    }
}

async fn run_articles(client: &ApiClient, cmd: ArticlesCommand) -> anyhow::Result<()> {
    match cmd {
        ArticlesCommand::List { request } => {
            let articles = client.list_articles(request).await?;
            display::print_articles(&articles);
        }
        ArticlesCommand::Add { code } => {
            let article = client.add_article(&code).await?;
            println!("Created article {} ({})", article.code, article.id);
        }
        ArticlesCommand::Remove { id, request } => {
            remove_article(client, id, request).await?;
            match request {
                Some(request_id) => {
                    println!("Detached article {id} from request {request_id}")
                }
                None => println!("Deleted article {id}"),
            }
        }
        ArticlesCommand::Import { file } => {
            let report = import_articles(client, &file)
                .await
                .with_context(|| format!("importing {}", file.display()))?;
            display::print_import_report(&report);
        }
    }
    Ok(())
}

async fn run_suppliers(
    client: &ApiClient,
    cache_dir: &PathBuf,
    cmd: SuppliersCommand,
) -> anyhow::Result<()> {
    let store = JsonFileStore::open(cache_dir)
        .with_context(|| format!("opening cache directory {}", cache_dir.display()))?;
    let mut cache = WhoisCache::load(store);

    match cmd {
        SuppliersCommand::List { article_id } => {
            let suppliers = client.list_suppliers(article_id).await?;
            display::print_suppliers(&suppliers, &cache);
        }
        SuppliersCommand::Search {
            article_id,
            force,
            concurrency,
        } => {
            let config = PipelineConfig {
                whois_concurrency: concurrency,
                ..PipelineConfig::default()
            };
            let outcome = search_and_validate(client, &mut cache, &config, article_id, force).await?;
            display::print_search_outcome(&outcome, &cache);
        }
        SuppliersCommand::ValidateEmails { article_id } => {
            let suppliers = client.list_suppliers(article_id).await?;
            let report = validate_emails(client, &suppliers).await;
            display::print_email_validation_report(&report);
        }
    }
    Ok(())
}

async fn run_email(client: &ApiClient, cmd: EmailCommand) -> anyhow::Result<()> {
    match cmd {
        EmailCommand::Discover {
            article_id,
            supplier_id,
        } => {
            let suppliers = client.list_suppliers(article_id).await?;
            let mut supplier = suppliers
                .into_iter()
                .find(|s| s.id == supplier_id)
                .with_context(|| {
                    format!("supplier {supplier_id} not found on article {article_id}")
                })?;

            match discover_email(client, &mut supplier).await? {
                EmailUpdate::NotFound => {
                    println!("No email found for {}", supplier.name)
                }
                EmailUpdate::Confirmed { email } => {
                    println!("Found and saved {email} for {}", supplier.name)
                }
                EmailUpdate::Reverted {
                    attempted, error, ..
                } => {
                    println!(
                        "Found {attempted} for {} but saving failed ({error}); nothing changed",
                        supplier.name
                    )
                }
            }
        }
        EmailCommand::Set {
            article_id,
            supplier_id,
            email,
        } => {
            let suppliers = client.list_suppliers(article_id).await?;
            let mut supplier = suppliers
                .into_iter()
                .find(|s| s.id == supplier_id)
                .with_context(|| {
                    format!("supplier {supplier_id} not found on article {article_id}")
                })?;
            save_manual_email(client, &mut supplier, &email).await?;
            println!("Saved email {email} for {}", supplier.name);
        }
    }
    Ok(())
}

async fn run_requests(client: &ApiClient, cmd: RequestsCommand) -> anyhow::Result<()> {
    match cmd {
        RequestsCommand::List => {
            let requests = client.list_requests().await?;
            display::print_requests(&requests);
        }
        RequestsCommand::Create { number } => {
            let request = client.create_request(&number).await?;
            println!("Created request {} ({})", request.number, request.id);
        }
        RequestsCommand::Attach {
            request_id,
            article_id,
        } => {
            client.attach_article(request_id, article_id).await?;
            println!("Attached article {article_id} to request {request_id}");
        }
        RequestsCommand::Detach {
            request_id,
            article_id,
        } => {
            client.detach_article(request_id, article_id).await?;
            println!("Detached article {article_id} from request {request_id}");
        }
    }
    Ok(())
}

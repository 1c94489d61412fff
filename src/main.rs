// catalog-scrape: command line for the catalog image pipeline
//
// collect / collect-csv fill the output tree, upload publishes it,
// attach-urls rewrites the catalog with hosted URLs, seed and recategorize
// derive the storefront data.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_scrape::catalog::{Catalog, RunSummary, collect_catalog, collect_rows, read_rows};
use catalog_scrape::config::CollectorConfig;
use catalog_scrape::seed::{AdminAccount, DocumentStore, seed};
use catalog_scrape::upload::{
    CloudinaryClient, CloudinaryConfig, attach_hosted_urls, read_mapping, upload_tree,
    write_mapping,
};
use catalog_scrape::utils::constants::{
    DEFAULT_ADMIN_USERNAME, DEFAULT_MARKETPLACE_TOKEN, DEFAULT_MAX_IMAGES_PER_PRODUCT,
    TABULAR_MAX_IMAGES_PER_PRODUCT, UPLOAD_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "catalog-scrape",
    version,
    about = "Collect, host and seed product images for an e-commerce catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect images for every product of a nested JSON catalog
    Collect {
        /// Catalog JSON (categories → subcategories → products)
        #[arg(long, env = "CATALOG_SCRAPE_CATALOG")]
        catalog: PathBuf,

        /// Only process these product ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        #[arg(long, env = "CATALOG_SCRAPE_MAX_IMAGES", default_value_t = DEFAULT_MAX_IMAGES_PER_PRODUCT)]
        max_images: usize,

        #[command(flatten)]
        collector: CollectorArgs,
    },

    /// Collect images for every row of a CSV export
    CollectCsv {
        #[arg(long, env = "CATALOG_SCRAPE_CSV")]
        csv: PathBuf,

        #[arg(long, env = "CATALOG_SCRAPE_MAX_IMAGES", default_value_t = TABULAR_MAX_IMAGES_PER_PRODUCT)]
        max_images: usize,

        #[command(flatten)]
        collector: CollectorArgs,
    },

    /// Upload the output tree and write the product → URLs mapping
    Upload {
        /// Root of the collected image tree
        #[arg(long, env = "CATALOG_SCRAPE_OUTPUT_ROOT")]
        root: PathBuf,

        /// Where to write the mapping JSON
        #[arg(long, default_value = "hosted_urls.json")]
        mapping: PathBuf,

        #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
        cloud_name: String,

        #[arg(long, env = "CLOUDINARY_API_KEY")]
        api_key: String,

        #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
        api_secret: String,
    },

    /// Replace catalog image URLs with hosted ones
    AttachUrls {
        #[arg(long, env = "CATALOG_SCRAPE_CATALOG")]
        catalog: PathBuf,

        #[arg(long, default_value = "hosted_urls.json")]
        mapping: PathBuf,

        /// Output catalog (defaults to rewriting the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Load the catalog into the document store
    Seed {
        #[arg(long, env = "CATALOG_SCRAPE_CATALOG")]
        catalog: PathBuf,

        #[arg(long, env = "CATALOG_SCRAPE_DATABASE", default_value = "catalog.db")]
        database: PathBuf,

        #[arg(long, env = "CATALOG_SCRAPE_ADMIN_USERNAME", default_value = DEFAULT_ADMIN_USERNAME)]
        admin_username: String,

        #[arg(long, env = "CATALOG_SCRAPE_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,

        #[arg(long, env = "CATALOG_SCRAPE_ADMIN_EMAIL")]
        admin_email: String,
    },

    /// Regroup the catalog under the master categories
    Recategorize {
        #[arg(long, env = "CATALOG_SCRAPE_CATALOG")]
        catalog: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

/// Knobs shared by both collection commands
#[derive(Args, Debug)]
struct CollectorArgs {
    #[arg(long, env = "CATALOG_SCRAPE_OUTPUT_ROOT", default_value = "product_images")]
    output: PathBuf,

    /// Host substring that marks a marketplace product page
    #[arg(long, env = "CATALOG_SCRAPE_MARKETPLACE_TOKEN", default_value = DEFAULT_MARKETPLACE_TOKEN)]
    marketplace_token: String,

    /// Render non-marketplace pages and take their best image (always on for collect-csv)
    #[arg(long, env = "CATALOG_SCRAPE_RESOLVE_GENERIC_PAGES")]
    resolve_generic_pages: bool,

    /// Show the browser window (debug builds only)
    #[arg(long)]
    headed: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

impl CollectorArgs {
    fn config(&self, max_images: usize) -> Result<CollectorConfig> {
        CollectorConfig::builder()
            .output_root(&self.output)
            .max_images_per_product(max_images)
            .marketplace_token(&self.marketplace_token)
            .resolve_generic_pages(self.resolve_generic_pages)
            .headless(!self.headed)
            .build()
    }
}

async fn write_report(path: Option<&Path>, summary: &RunSummary) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let text = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write report {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Collect {
            catalog,
            only,
            max_images,
            collector,
        } => {
            let config = collector.config(max_images)?;
            let catalog = Catalog::load(&catalog).await?;
            let only: HashSet<String> = only.into_iter().filter(|id| !id.is_empty()).collect();
            let filter = (!only.is_empty()).then_some(&only);

            let summary = collect_catalog(&catalog, &config, filter).await?;
            write_report(collector.report.as_deref(), &summary).await?;
        }

        Command::CollectCsv {
            csv,
            max_images,
            collector,
        } => {
            let config = collector.config(max_images)?;
            let rows = read_rows(&csv).await?;
            let summary = collect_rows(&rows, &config).await?;
            write_report(collector.report.as_deref(), &summary).await?;
        }

        Command::Upload {
            root,
            mapping,
            cloud_name,
            api_key,
            api_secret,
        } => {
            let client = CloudinaryClient::new(
                CloudinaryConfig::new(cloud_name, api_key, api_secret),
                Duration::from_secs(UPLOAD_TIMEOUT_SECS),
            )?;
            let hosted = upload_tree(&root, &client).await?;
            write_mapping(&mapping, &hosted).await?;
            tracing::info!("Mapping written to {}", mapping.display());
        }

        Command::AttachUrls {
            catalog,
            mapping,
            out,
        } => {
            let mut parsed = Catalog::load(&catalog).await?;
            let hosted = read_mapping(&mapping).await?;
            let updated = attach_hosted_urls(&mut parsed, &hosted);
            let out = out.unwrap_or(catalog);
            parsed.save(&out).await?;
            tracing::info!(
                "Updated {updated} of {} products, written to {}",
                parsed.product_count(),
                out.display()
            );
        }

        Command::Seed {
            catalog,
            database,
            admin_username,
            admin_password,
            admin_email,
        } => {
            anyhow::ensure!(!admin_password.is_empty(), "admin password must not be empty");
            let parsed = Catalog::load(&catalog).await?;
            let store = DocumentStore::open(&database).await?;
            let admin = AdminAccount {
                username: admin_username,
                password: admin_password,
                email: admin_email,
            };
            let summary = seed(&store, &parsed, &admin).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Recategorize { catalog, out } => {
            let parsed = Catalog::load(&catalog).await?;
            let regrouped = catalog_scrape::recategorize(&parsed);
            let text = serde_json::to_string_pretty(&regrouped)?;
            tokio::fs::write(&out, text)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            tracing::info!("Recategorized catalog written to {}", out.display());
        }
    }

    Ok(())
}

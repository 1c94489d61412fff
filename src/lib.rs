//! Product image acquisition for e-commerce catalog snapshots
//!
//! Given a catalog of products, each with a list of image sources, the
//! collector fetches every candidate image, rejects the undersized and the
//! mostly-blank, drops perceptual duplicates and saves up to a fixed number
//! of images per product into an output tree. Marketplace product pages are
//! rendered in a headless browser and mined for their gallery.
//!
//! Around the collector sit the catalog tools: uploading the output tree to
//! an image host, splicing hosted URLs back into the catalog, regrouping it
//! under master categories and seeding a document store.

pub mod catalog;
pub mod collector;
pub mod config;
pub mod extractors;
pub mod fetcher;
pub mod imaging;
pub mod recategorize;
pub mod renderer;
pub mod seed;
pub mod source;
pub mod upload;
pub mod utils;

pub use catalog::{Catalog, RunSummary, TabularRow, collect_catalog, collect_rows, run_catalog, run_rows};
pub use collector::{CollectionReport, FailureTally, ProductImageCollector, ProductSources};
pub use config::CollectorConfig;
pub use fetcher::{Fetch, FetchError, HttpFetcher};
pub use imaging::{DecodeError, Fingerprint, PerceptualHasher, QualityFilter, SaveError};
pub use recategorize::{RecategorizedCatalog, recategorize};
pub use renderer::{BrowserRenderer, Render, RenderError, ShutdownResult};
pub use seed::{AdminAccount, DocumentStore, NewProduct, SeedSummary, add_product, seed};
pub use source::{SourceKind, classify};
pub use upload::{
    CloudinaryClient, CloudinaryConfig, HostedMapping, ImageHost, UploadError, attach_hosted_urls,
    upload_tree,
};

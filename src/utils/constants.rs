//! Shared configuration constants for catalog_scrape
//!
//! Default values used by the collector, the renderer and the command line so
//! the binary and the library agree without magic numbers.

/// Default per-product cap for the nested JSON catalog.
pub const DEFAULT_MAX_IMAGES_PER_PRODUCT: usize = 25;

/// Default per-product cap for the tabular (CSV) catalog.
pub const TABULAR_MAX_IMAGES_PER_PRODUCT: usize = 15;

/// Minimum accepted image width in pixels.
///
/// Anything narrower is almost always an icon, a sprite or a gallery thumbnail.
pub const MIN_IMAGE_WIDTH: u32 = 200;

/// Minimum accepted image height in pixels.
pub const MIN_IMAGE_HEIGHT: u32 = 200;

/// Luma above which a pixel counts as near-white background.
pub const BACKGROUND_LUMA_THRESHOLD: u8 = 245;

/// Minimum fraction of non-background pixels for an image to be kept.
///
/// Mostly-white placeholders ("image coming soon" tiles) fall below this.
pub const MIN_NON_BACKGROUND_RATIO: f64 = 0.20;

/// Square edge of the grayscale rendering fed to the perceptual hasher.
pub const FINGERPRINT_RESOLUTION: u32 = 256;

/// JPEG quality used when saving accepted images.
pub const SAVED_JPEG_QUALITY: u8 = 90;

/// HTTP timeout for a single image fetch.
pub const FETCH_TIMEOUT_SECS: u64 = 12;

/// Navigation timeout for the headless browser.
pub const PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the post-navigation readiness wait.
///
/// Client-side galleries are usually populated well inside this window.
pub const SETTLE_DELAY_MS: u64 = 1500;

/// Host token that routes a source URL to the marketplace gallery extractor.
pub const DEFAULT_MARKETPLACE_TOKEN: &str = "amazon.";

/// Placeholder used when a sanitized folder or file name comes out empty.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Placeholder product key for tabular rows without a usable name or title.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown_Product";

/// Image file extensions recognized as direct links and as upload candidates.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Chrome user agent string sent by both the fetcher and the browser
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// HTTP timeout for a single hosted upload.
pub const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Username of the seeded admin account.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

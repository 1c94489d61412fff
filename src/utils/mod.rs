pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{is_blank_cell, sanitize_name, sanitize_name_or};
pub use url_utils::{has_image_extension, normalize_gallery_url, resolve_candidate, strip_query};

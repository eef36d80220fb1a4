// Internal modules
pub mod banner;
pub mod config;
pub mod document;
pub mod fragments;
#[macro_use]
pub mod logging;
pub mod matcher;
pub mod mode;
pub mod normalize;

// Re-export key types for library consumers
pub use banner::{extract_banner, BannerBlock};
pub use document::{ConfigDocument, DocumentError};
pub use fragments::{load_fragment_dir, load_fragments, Fragment, FragmentError, FragmentSet};
pub use matcher::{find_forbidden, first_match, matching_banner_template, PatternHit, SearchableText};
pub use mode::ComplianceMode;
pub use normalize::{normalize_lines, normalize_text};

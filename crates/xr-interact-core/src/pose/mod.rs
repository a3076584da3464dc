//! Hand pose templates and recognition
//!
//! Templates are fetched once per URL through the [`TemplateCache`] and scored
//! against live joint buffers by the [`PoseMatcher`].

mod cache;
mod debounce;
mod matcher;
mod source;
mod template;
mod url;

pub use cache::{TemplateCache, TemplateLookup, TemplateState};
pub use debounce::MatchDebouncer;
pub use matcher::{pose_distance, MatchResult, PoseMatcher};
pub use source::{source_for_base_url, FileTemplateSource, HttpTemplateSource, TemplateSource};
pub use template::PoseTemplate;
pub use url::resolve_template_url;

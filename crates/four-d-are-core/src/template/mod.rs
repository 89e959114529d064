//! Domain templates.
//!
//! A template names the metrics expected in each dimension for one business
//! domain and lists the boundary rules the agent must never cross. Templates
//! are built in code, loaded from YAML/JSON (validated against JSON Schema),
//! or taken from the built-in presets.

mod parser;
mod presets;
mod schema;

pub use parser::{DomainTemplate, DomainTemplateBuilder, DEFAULT_LANGUAGE};
pub use presets::{BANKING, ECOMMERCE, HEALTHCARE, PRESET_NAMES};
pub use schema::validate_template_schema;

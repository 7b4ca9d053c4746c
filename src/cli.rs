//! CLI domain: parse, route, output, and presentation only.
//! No settings logic; the route table dispatches to the registry and settings tree.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_explain_text, format_properties_json, format_properties_text, format_resolve_json,
    format_resolve_text, format_validation_result, PropertyExplanation,
};
pub use route::RunContext;

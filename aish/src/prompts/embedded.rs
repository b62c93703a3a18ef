//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Planner system prompt with few-shot examples
pub const PLANNER: &str = include_str!("../../prompts/planner.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "planner" => Some(PLANNER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_planner() {
        let planner = get_embedded("planner").unwrap();
        assert!(planner.contains("expert system administrator"));
        assert!(planner.contains("install nginx and start the service"));
        assert!(planner.contains("show me all running processes"));
        assert!(planner.contains("{{categories}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}

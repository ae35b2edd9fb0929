//! Embedded prompts
//!
//! Compiled into the binary from .pmt files at build time.

/// Schedule generation prompt template
///
/// Placeholders: `{{tasks}}`, `{{start}}`, `{{end}}`.
pub const SCHEDULE: &str = include_str!("../../prompts/schedule.pmt");

/// Get an embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "schedule" => Some(SCHEDULE),
        _ => None,
    }
}

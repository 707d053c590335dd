//! Error handling foundation for pingster.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific error types in its own
//! error module, and callers add layer-appropriate context with
//! `.context()` as errors cross crate boundaries.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_alias_defaults_to_unit_context() {
        let ok: Result<&str> = Ok("ready");
        assert_eq!(ok.expect("should be ok"), "ready");
    }
}

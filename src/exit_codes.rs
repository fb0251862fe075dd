//! Exit code constants for the testforge CLI.
//!
//! The CLI exposes no structured error codes: every fatal error exits with
//! code 1 and a human-readable diagnostic on stderr.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Any fatal error: configuration, dependency, generation, parse, or write failure.
pub const FAILURE: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_cli_contract() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(FAILURE, 1);
    }
}

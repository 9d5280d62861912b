pub use portfolio_utils_derive::trace_instrument;

pub mod http;

/// Version of the portfolio backend, as reported by the CLI and sent to sentry.
pub fn portfolio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat) => {
        match ($expr) {
            $pat => (),
            val => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    };
    ($expr:expr, $pat:pat if $pred:expr) => {{
        let val = $expr;
        match (&val) {
            $pat if $pred => (),
            #[allow(unused_variables, reason = "bindings are only used in the predicate")]
            $pat => ::core::panic!(
                "Assertion failed: Value {val:?} does not match predicate {}",
                ::core::stringify!($pred)
            ),
            _ => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn assert_matches_ok() {
        assert_matches!(Some(42), Some(_));
        assert_matches!(Some(42), Some(x) if *x == 42);
    }

    #[test]
    #[should_panic = "did not match pattern"]
    fn assert_matches_mismatch() {
        assert_matches!(None::<i32>, Some(_));
    }
}

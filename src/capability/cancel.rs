//! Cancellation capability
//!
//! One token per execution, created at the boundary that starts the effect
//! and observed cooperatively: capabilities check it at their own boundaries
//! and return a cancelled failure rather than being interrupted mid-call.
//! Once a token fires it stays fired for the rest of the execution.
//!
//! The token type comes from `tokio-util`; child tokens and `cancelled()`
//! futures work as that crate documents.

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_stays_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn child_token_observes_parent() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(child.is_cancelled());
    }
}

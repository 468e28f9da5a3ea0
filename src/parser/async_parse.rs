//! Cooperative async parsing.
//!
//! Parsing is CPU-bound and ordinarily finishes in well under a millisecond,
//! but a host embedding this crate in a single-threaded event loop (an async
//! HTTP handler, a UI thread) may still want to yield between parsing stages
//! rather than block the executor for the full call. This module provides a
//! single hand-rolled yield point and a [`CancellationToken`] so callers get
//! that without pulling in an async runtime as a dependency.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use super::core::Parser;
use super::error::{AsyncParseError, Cancelled};
use crate::ast::QueryAst;
use crate::dialect::Dialect;

/// A cheaply cloneable, thread-safe cancellation flag.
///
/// Cloning shares the same underlying flag; setting it via [`Self::cancel`]
/// on any clone is visible to all others.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a new, unset token.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. Observed at the next yield point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A future that is `Pending` exactly once, then `Ready`. Polling it wakes
/// its own waker immediately, so an executor that polls eagerly (the common
/// case) resumes it on its very next turn rather than waiting for an
/// external event.
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn yield_now() -> YieldOnce {
    YieldOnce { yielded: false }
}

/// Parses `input` cooperatively, yielding control back to the caller's
/// executor at a handful of checkpoints and honoring `cancellation`.
///
/// # Errors
///
/// Returns [`AsyncParseError::Cancelled`] if `cancellation` is observed set
/// at a checkpoint, or [`AsyncParseError::Parse`] for a malformed query.
pub async fn parse_async(
    input: &str,
    dialect: &dyn Dialect,
    cancellation: &CancellationToken,
) -> Result<QueryAst, AsyncParseError> {
    yield_now().await;
    if cancellation.is_cancelled() {
        return Err(Cancelled.into());
    }

    let mut parser = Parser::new(input, dialect)?;

    yield_now().await;
    if cancellation.is_cancelled() {
        return Err(Cancelled.into());
    }

    let query = parser.parse_query_ast()?;

    yield_now().await;
    if cancellation.is_cancelled() {
        return Err(Cancelled.into());
    }

    parser.finish()?;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;

    const PG: PostgresDialect = PostgresDialect;

    struct NoopWaker;

    impl std::task::Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
        fn wake_by_ref(self: &Arc<Self>) {}
    }

    fn block_on<F: Future>(fut: F) -> F::Output {
        use std::task::Waker;

        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut fut = std::pin::pin!(fut);
        loop {
            if let Poll::Ready(output) = fut.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[test]
    fn parses_successfully_when_not_cancelled() {
        let token = CancellationToken::new();
        let result = block_on(parse_async("SELECT id FROM users", &PG, &token));
        assert!(result.is_ok());
    }

    #[test]
    fn reports_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let result = block_on(parse_async("SELECT id FROM users", &PG, &token));
        assert!(matches!(result, Err(AsyncParseError::Cancelled(_))));
    }

    #[test]
    fn reports_parse_errors() {
        let token = CancellationToken::new();
        let result = block_on(parse_async("SELECT FROM", &PG, &token));
        assert!(matches!(result, Err(AsyncParseError::Parse(_))));
    }

    #[test]
    fn token_is_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}

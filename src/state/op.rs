use super::AsyncState;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Boxed future produced by the function an [`AsyncOp`] wraps.
pub type OpFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'static>>;

type OpFn<A, T> = Box<dyn Fn(A) -> OpFuture<T> + Send + Sync>;

const FALLBACK_ERROR: &str = "An error occurred";

/// Runs one asynchronous function through the `AsyncState` lifecycle.
///
/// Every `execute` takes a fresh request token. A completion only lands in
/// the state if its token is still the newest one, so a slow, superseded
/// request can never overwrite fresher state. `reset` also advances the
/// token, which discards anything still in flight.
///
/// Failures never propagate out of `execute`; they are captured as the
/// error's display text on the state.
pub struct AsyncOp<A, T> {
    func: OpFn<A, T>,
    state: watch::Sender<AsyncState<Option<T>>>,
    latest: AtomicU64,
}

impl<A, T> AsyncOp<A, T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let (state, _) = watch::channel(AsyncState::idle(None));
        Self {
            func: Box::new(move |args| -> OpFuture<T> { Box::pin(func(args)) }),
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Start the wrapped function.
    ///
    /// The state is `loading` as soon as this returns, before the returned
    /// future is polled. The future resolves to this call's own result (or
    /// `None` on failure) even if a newer call has since taken over the
    /// state.
    pub fn execute(&self, args: A) -> impl Future<Output = Option<T>> + Send + '_ {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(AsyncState::loading());
        let pending = (self.func)(args);

        async move {
            let outcome = pending.await;
            self.settle(token, outcome)
        }
    }

    /// Return to `idle`, discarding any in-flight result.
    pub fn reset(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(AsyncState::idle(None));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AsyncState<Option<T>> {
        self.state.borrow().clone()
    }

    /// Observe every transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<AsyncState<Option<T>>> {
        self.state.subscribe()
    }

    fn settle(&self, token: u64, outcome: anyhow::Result<T>) -> Option<T> {
        let current = self.latest.load(Ordering::SeqCst) == token;

        match outcome {
            Ok(value) => {
                if current {
                    self.state.send_replace(AsyncState::success(value.clone()));
                } else {
                    tracing::debug!(token, "discarding superseded result");
                }
                Some(value)
            }
            Err(error) => {
                let mut message = error.to_string();
                if message.is_empty() {
                    message = FALLBACK_ERROR.to_string();
                }
                if current {
                    self.state.send_replace(AsyncState::failure(message));
                } else {
                    tracing::debug!(token, %message, "discarding superseded failure");
                }
                None
            }
        }
    }
}

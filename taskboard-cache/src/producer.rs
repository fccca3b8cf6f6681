//! Producers supply fresh data for a query key.

use crate::error::ProducerError;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Async source of data for one query key.
///
/// Implementations report failure through the returned `Result`. A panic
/// is caught and stored as a [`ProducerError`] like any other failure.
#[async_trait]
pub trait Producer<T>: Send + Sync {
    async fn produce(&self) -> Result<T, ProducerError>;
}

/// Adapter that turns an async closure into a [`Producer`].
pub struct FnProducer<T> {
    f: Box<dyn Fn() -> BoxFuture<'static, Result<T, ProducerError>> + Send + Sync>,
}

impl<T> FnProducer<T> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ProducerError>> + Send + 'static,
    {
        Self {
            f: Box::new(move || Box::pin(f())),
        }
    }
}

impl<T> fmt::Debug for FnProducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProducer").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + 'static> Producer<T> for FnProducer<T> {
    async fn produce(&self) -> Result<T, ProducerError> {
        (self.f)().await
    }
}

/// Shorthand for [`FnProducer::new`].
pub fn from_fn<T, F, Fut>(f: F) -> FnProducer<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ProducerError>> + Send + 'static,
{
    FnProducer::new(f)
}

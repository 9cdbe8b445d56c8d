//! Blocking convenience wrapper.
//!
//! Strictly sugar: owns a current-thread tokio runtime and drives the async
//! adapter to completion. For callers without an async context - build
//! scripts, tests, small tools. Never use from inside a tokio runtime.

use crate::adapter::{AdapterRequest, HttpAdapter};
use crate::convert::RequestConverter;
use crate::result::HttpResult;

/// Synchronous facade over any [`HttpAdapter`].
pub struct BlockingAdapter<A> {
    inner: A,
    runtime: tokio::runtime::Runtime,
}

impl<A> BlockingAdapter<A> {
    /// Wrap an adapter with a dedicated current-thread runtime.
    pub fn new(inner: A) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }
}

impl<A> BlockingAdapter<A> {
    pub fn uri<T>(&self) -> &str
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.inner.uri()
    }

    pub fn dispatch<T>(&self, request: AdapterRequest) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.runtime.block_on(self.inner.dispatch(request))
    }

    pub fn get<T>(&self, headers: &[(String, String)]) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.runtime.block_on(self.inner.get(headers))
    }

    pub fn head<T>(&self, headers: &[(String, String)]) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.runtime.block_on(self.inner.head(headers))
    }

    pub fn options<T>(&self, headers: &[(String, String)]) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.runtime.block_on(self.inner.options(headers))
    }

    pub fn delete<T>(&self, headers: &[(String, String)]) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
    {
        self.runtime.block_on(self.inner.delete(headers))
    }

    pub fn post<T, R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
        R: Sync,
    {
        self.runtime.block_on(self.inner.post(body, converter, headers))
    }

    pub fn put<T, R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
        R: Sync,
    {
        self.runtime.block_on(self.inner.put(body, converter, headers))
    }

    pub fn patch<T, R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        A: HttpAdapter<T>,
        T: Send + 'static,
        R: Sync,
    {
        self.runtime.block_on(self.inner.patch(body, converter, headers))
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};

use http::{Request, Response};

use crate::Attempt;

/// The rest of the HTTP pipeline, as seen by the retry policy.
///
/// Each call sends one attempt. The policy hands over a fresh copy of the request
/// together with the [`Attempt`] it belongs to, so downstream stages can tell a first
/// try from a retry without consulting shared state.
///
/// Implement it directly for a transport, or use [`Execute`] to wrap a closure.
///
/// # Examples
///
/// ```
/// use http::{Request, Response, StatusCode};
/// use http_retry::{Attempt, Next};
///
/// struct AlwaysOk;
///
/// impl Next<String> for AlwaysOk {
///     type Body = String;
///     type Error = std::io::Error;
///
///     async fn send(&self, request: Request<String>, _attempt: Attempt) -> Result<Response<String>, Self::Error> {
///         Ok(Response::new(request.into_body()))
///     }
/// }
/// ```
pub trait Next<B>: Send + Sync {
    /// Body type of the responses.
    type Body;

    /// Error produced when no response could be obtained.
    type Error;

    /// Sends one attempt of the request.
    fn send(&self, request: Request<B>, attempt: Attempt) -> impl Future<Output = Result<Response<Self::Body>, Self::Error>> + Send;
}

impl<N, B> Next<B> for std::sync::Arc<N>
where
    N: Next<B>,
{
    type Body = N::Body;
    type Error = N::Error;

    fn send(&self, request: Request<B>, attempt: Attempt) -> impl Future<Output = Result<Response<Self::Body>, Self::Error>> + Send {
        (**self).send(request, attempt)
    }
}

/// Adapts an async closure into a [`Next`] stage.
///
/// # Examples
///
/// ```
/// use http::{Request, Response, StatusCode};
/// use http_retry::{Attempt, Execute, Next};
///
/// # async fn example() {
/// let next = Execute::new(|_request: Request<()>, attempt: Attempt| async move {
///     let status = if attempt.is_first() { StatusCode::SERVICE_UNAVAILABLE } else { StatusCode::OK };
///     Ok::<_, std::io::Error>(Response::builder().status(status).body(()).unwrap())
/// });
///
/// let response = next.send(Request::new(()), Attempt::new(1, false)).await.unwrap();
/// assert_eq!(response.status(), StatusCode::OK);
/// # }
/// ```
#[derive(Clone)]
pub struct Execute<F>(F);

impl<F> Execute<F> {
    /// Wraps `f`, which receives each request copy and its attempt.
    #[must_use]
    pub fn new<B, Fut, R, E>(f: F) -> Self
    where
        F: Fn(Request<B>, Attempt) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Response<R>, E>> + Send,
    {
        Self(f)
    }
}

impl<F, B, Fut, R, E> Next<B> for Execute<F>
where
    F: Fn(Request<B>, Attempt) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<R>, E>> + Send,
{
    type Body = R;
    type Error = E;

    fn send(&self, request: Request<B>, attempt: Attempt) -> impl Future<Output = Result<Response<R>, E>> + Send {
        (self.0)(request, attempt)
    }
}

impl<F> Debug for Execute<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Execute").finish_non_exhaustive()
    }
}

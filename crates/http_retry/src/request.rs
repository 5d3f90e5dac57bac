// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use http::Request;

/// Creates an independent copy of `request` for one attempt.
///
/// Method, URI, version, headers, extensions and body are all cloned, so a downstream
/// stage may mutate its copy without affecting the template or later attempts.
///
/// # Examples
///
/// ```
/// use http::Request;
/// use http_retry::copy_request;
///
/// let template = Request::post("https://example.com/items").header("x-id", "1").body(vec![1_u8, 2, 3])?;
///
/// let mut attempt = copy_request(&template);
/// attempt.headers_mut().insert("x-id", "2".parse()?);
/// attempt.body_mut().clear();
///
/// assert_eq!(template.headers()["x-id"], "1");
/// assert_eq!(template.body(), &vec![1, 2, 3]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn copy_request<B: Clone>(request: &Request<B>) -> Request<B> {
    let mut copy = Request::new(request.body().clone());
    copy.method_mut().clone_from(request.method());
    copy.uri_mut().clone_from(request.uri());
    *copy.version_mut() = request.version();
    copy.headers_mut().clone_from(request.headers());
    copy.extensions_mut().clone_from(request.extensions());
    copy
}

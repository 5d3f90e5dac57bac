// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use http::Request;

use super::OnRetryArgs;
use crate::Attempt;
use crate::utils::define_fn_wrapper;

define_fn_wrapper!(ShouldRetryError<E>(Fn(error: &E, attempt: Attempt) -> bool));
define_fn_wrapper!(OnRetry(Fn(args: OnRetryArgs)));
define_fn_wrapper!(EnableIf<B>(Fn(request: &Request<B>) -> bool));

impl<E> ShouldRetryError<E> {
    pub(crate) fn never() -> Self {
        Self::new(|_, _| false)
    }

    pub(crate) fn always() -> Self {
        Self::new(|_, _| true)
    }
}

impl<B> EnableIf<B> {
    pub(crate) fn always() -> Self {
        Self::new(|_| true)
    }

    pub(crate) fn never() -> Self {
        Self::new(|_| false)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn should_retry_error_presets() {
        let error = io::Error::other("boom");

        assert!(!ShouldRetryError::<io::Error>::never().call(&error, Attempt::default()));
        assert!(ShouldRetryError::<io::Error>::always().call(&error, Attempt::default()));
    }

    #[test]
    fn enable_if_presets() {
        let request = Request::new(());

        assert!(EnableIf::always().call(&request));
        assert!(!EnableIf::never().call(&request));
        assert_eq!(format!("{:?}", EnableIf::<()>::always()), "EnableIf");
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A throttled service that tells the client how long to wait.
//!
//! The simulated server answers the first two attempts with `429` and a `Retry-After`
//! header. The policy honors the header, logs each retry through `tracing` and returns
//! the eventual `200`.

use std::io::Error;
use std::time::Duration;

use http::header::RETRY_AFTER;
use http::{Request, Response, StatusCode};
use http_retry::{Attempt, Execute, ExponentialBackoff, RetryPolicy};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()).init();

    let policy = RetryPolicy::<String, Error>::builder("throttled_service")
        .strategy(ExponentialBackoff::new(4, Duration::from_millis(100), Duration::from_secs(2))?)
        .on_retry(|args| {
            println!(
                "retrying, attempt {}, delay: {}s ({})",
                args.attempt().index(),
                args.delay().as_secs_f32(),
                args.source(),
            );
        })
        .build();

    let request = Request::builder().uri("https://example.com/items").body("value".to_string())?;

    let response = policy.process(&request, &Execute::new(send_request)).await?;
    println!("finished with {}: {}", response.status(), response.body());

    Ok(())
}

async fn send_request(request: Request<String>, attempt: Attempt) -> Result<Response<String>, Error> {
    let builder = Response::builder();

    let response = if attempt.index() < 2 {
        builder.status(StatusCode::TOO_MANY_REQUESTS).header(RETRY_AFTER, "1").body(String::new())
    } else {
        builder.status(StatusCode::OK).body(request.into_body())
    };

    response.map_err(Error::other)
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![expect(missing_docs, reason = "benchmark code")]

use std::hint::black_box;
use std::time::{Duration, SystemTime};

use criterion::{Criterion, criterion_group, criterion_main};
use http::header::RETRY_AFTER;
use http::{HeaderMap, HeaderValue};
use http_retry::{ExponentialBackoff, RetryStrategy, delay_from_headers, parse_rfc1123};

fn entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("delays");

    let strategy = ExponentialBackoff::default();
    group.bench_function("exponential", |b| {
        b.iter(|| strategy.calculate_retry_delay(black_box(2)));
    });

    group.bench_function("rfc1123-fixed-width", |b| {
        b.iter(|| parse_rfc1123(black_box("Sun, 06 Nov 1994 08:49:37 GMT")));
    });

    group.bench_function("rfc1123-general", |b| {
        b.iter(|| parse_rfc1123(black_box("Sun, 6 Nov 1994 08:49:37 +0000")));
    });

    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_700);

    let mut seconds = HeaderMap::new();
    seconds.insert(RETRY_AFTER, HeaderValue::from_static("120"));
    group.bench_function("headers-seconds", |b| {
        b.iter(|| delay_from_headers(black_box(&seconds), now));
    });

    let mut date = HeaderMap::new();
    date.insert(RETRY_AFTER, HeaderValue::from_static("Sun, 06 Nov 1994 08:49:37 GMT"));
    group.bench_function("headers-date", |b| {
        b.iter(|| delay_from_headers(black_box(&date), now));
    });

    let empty = HeaderMap::new();
    group.bench_function("headers-absent", |b| {
        b.iter(|| delay_from_headers(black_box(&empty), now));
    });

    group.finish();
}

criterion_group!(benches, entry);
criterion_main!(benches);

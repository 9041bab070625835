use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use micro_message::protocol::{Body, Headers, Message};
use micro_message::stream::{Stream, Whence};
use serde_json::json;

fn browser_headers() -> Headers {
    Headers::try_from_iter([
        ("Host", "127.0.0.1:8080"),
        ("Connection", "keep-alive"),
        ("Cache-Control", "max-age=0"),
        ("Upgrade-Insecure-Requests", "1"),
        ("User-Agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"),
        ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        ("Sec-Fetch-Site", "none"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Accept-Language", "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
    ])
    .unwrap()
}

fn bench_header_lookup(c: &mut Criterion) {
    let message = Message::from_parts(Default::default(), browser_headers(), Body::empty());

    c.bench_function("header_line_mixed_case", |b| {
        b.iter(|| black_box(message.header_line(black_box("Accept-Encoding"))));
    });

    c.bench_function("header_line_lower_case", |b| {
        b.iter(|| black_box(message.header_line(black_box("accept-encoding"))));
    });
}

fn bench_derive_message(c: &mut Criterion) {
    let message = Message::from_parts(Default::default(), browser_headers(), Body::from("Hello World!"));

    c.bench_function("with_added_header", |b| {
        b.iter(|| black_box(message.with_added_header("X-Request-Id", "42").unwrap()));
    });

    c.bench_function("with_protocol_version", |b| {
        b.iter(|| black_box(message.with_protocol_version("1.0").unwrap()));
    });
}

fn bench_untyped_message(c: &mut Criterion) {
    let value = json!({
        "protocol_version": "1.1",
        "headers": { "Host": "localhost", "Accept": ["text/html", "*/*"] },
        "body": "Hello World!"
    });

    c.bench_function("message_from_json", |b| {
        b.iter(|| black_box(Message::try_from(black_box(&value)).unwrap()));
    });
}

fn bench_stream(c: &mut Criterion) {
    c.bench_function("stream_write_rewind_read", |b| {
        b.iter(|| {
            let mut stream = Stream::empty();
            stream.write(black_box(b"Hello World!\r\n")).unwrap();
            stream.seek(0, Whence::Start).unwrap();
            black_box(stream.read(64).unwrap());
        });
    });
}

criterion_group!(benches, bench_header_lookup, bench_derive_message, bench_untyped_message, bench_stream);
criterion_main!(benches);

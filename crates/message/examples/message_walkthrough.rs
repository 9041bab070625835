use micro_message::protocol::{Body, Headers, Message, MessageError};
use micro_message::stream::{Capabilities, Stream, Whence};
use serde_json::json;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run() {
        error!(cause = %e, "walkthrough failed");
    }
}

fn run() -> Result<(), MessageError> {
    let headers = Headers::try_from_iter([("Accept", "application/json"), ("Host", "127.0.0.1:8080")])?;
    let request = Message::new("1.1", headers, Some(Body::from("{\"hello\":\"world\"}")))?;
    info!(version = %request.protocol_version(), accept = request.header_line("ACCEPT"), "built request");

    let tagged = request.with_appended_header("accept", "text/plain")?.with_added_header("X-Request-Id", "42")?;
    info!(accept = tagged.header_line("accept"), original = request.header_line("accept"), "derived request");

    {
        let mut body = tagged.body().lock();
        body.seek(0, Whence::End)?;
        body.write("\n")?;
    }
    info!(body = %request.body(), "body stream is shared between derived messages");

    let frozen = tagged.with_body(Stream::with_capabilities("read only", Capabilities::read_only()));
    match frozen.body().lock().write("nope") {
        Ok(_) => info!("unexpected write"),
        Err(e) => info!(cause = %e, "read-only body rejected write"),
    }

    match Message::try_from(json!({ "headers": { "Accept": [1, 2, 3] } })) {
        Ok(_) => info!("unexpected message"),
        Err(e) => info!(cause = %e, "untyped message rejected"),
    }

    let mut stream = Stream::new("detach me");
    if let Some(buffer) = stream.detach() {
        info!(size = buffer.len(), "took storage out of stream");
    }
    if let Err(e) = stream.tell() {
        info!(cause = %e, "stream is unusable after detach");
    }

    Ok(())
}

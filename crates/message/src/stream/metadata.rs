use serde::Serialize;
use serde_json::Value;

/// Metadata describing a [`Stream`](crate::stream::Stream).
///
/// The keys match those a PHP `php://temp` stream reports, so code ported
/// from PSR-7 style stacks can keep asking for them by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamMetadata {
    pub timed_out: bool,
    pub blocked: bool,
    pub eof: bool,
    pub wrapper_type: &'static str,
    pub stream_type: &'static str,
    pub mode: &'static str,
    pub unread_bytes: u64,
    pub seekable: bool,
    pub uri: &'static str,
}

impl StreamMetadata {
    /// Looks up a single metadata entry by key, `None` if the key is unknown.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn metadata() -> StreamMetadata {
        StreamMetadata {
            timed_out: false,
            blocked: true,
            eof: false,
            wrapper_type: "PHP",
            stream_type: "TEMP",
            mode: "w+b",
            unread_bytes: 0,
            seekable: true,
            uri: "php://temp",
        }
    }

    #[test]
    fn get_by_key() {
        let metadata = metadata();
        assert_eq!(metadata.get("uri"), Some(json!("php://temp")));
        assert_eq!(metadata.get("seekable"), Some(json!(true)));
        assert_eq!(metadata.get("unread_bytes"), Some(json!(0)));
        assert_eq!(metadata.get("no_such_key"), None);
    }

    #[test]
    fn serializes_all_keys() {
        let value = serde_json::to_value(metadata()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["timed_out", "blocked", "eof", "wrapper_type", "stream_type", "mode", "unread_bytes", "seekable", "uri"]
        );
    }
}

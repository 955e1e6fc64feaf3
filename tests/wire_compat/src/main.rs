fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use mediadrop_protocol::{
        CompleteUploadRequest, CompleteUploadResponse, GenerateUploadUrlRequest,
        GenerateUploadUrlResponse,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent comparison).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    #[test]
    fn fixture_generate_upload_url_request() {
        let req: GenerateUploadUrlRequest =
            roundtrip_test("generate_upload_url_request.json");
        assert_eq!(req.file_name, "logo.svg");
        assert_eq!(req.mime_type, "image/svg+xml");
    }

    #[test]
    fn fixture_generate_upload_url_response() {
        let resp: GenerateUploadUrlResponse =
            roundtrip_test("generate_upload_url_response.json");
        assert!(resp.upload_url.is_some());
        assert!(!mediadrop_protocol::is_blank(&resp.file_descriptor));
    }

    #[test]
    fn fixture_complete_upload_request() {
        roundtrip_test::<CompleteUploadRequest>("complete_upload_request.json");
    }

    #[test]
    fn fixture_complete_upload_response() {
        let resp: CompleteUploadResponse = roundtrip_test("complete_upload_response.json");
        let file = resp.file.expect("file present");
        assert_eq!(file.id, "f1c2d3e4");
        assert_eq!(file.media_type, "vector");
        assert!(file.extra.contains_key("url"));
        assert!(file.extra.contains_key("labels"));
    }

    #[test]
    fn descriptor_survives_request_cycle() {
        // The descriptor handed out by generateUploadUrl goes back unchanged.
        let resp: GenerateUploadUrlResponse =
            serde_json::from_value(load_fixture("generate_upload_url_response.json")).unwrap();
        let req = CompleteUploadRequest {
            file_descriptor: resp.file_descriptor,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            load_fixture("complete_upload_request.json")
        );
    }
}

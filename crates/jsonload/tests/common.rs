#![allow(missing_docs)]
#![allow(dead_code)]

/// A document touching every value type, spread over several lines.
pub const SAMPLE: &str = r#"{
    "name": "jsonload",
    "version": [0, 1, 0],
    "stable": false,
    "license": null,
    "ratio": 0.75,
    "offset": -12,
    "tags": ["parser", "json", "café", "😀"],
    "nested": {
        "empty_array": [],
        "empty_object": {},
        "matrix": [[1, 2], [3, 4]]
    },
    "escapes": "tab\there \"quoted\" back\\slash"
}
"#;

/// Write `contents` to a fresh file under the temp dir and return its path.
pub fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("jsonload-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

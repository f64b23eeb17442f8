//! Dataset metadata matching
//!
//! Recordings in the source dataset come as `stem.json` / `stem.wav` /
//! `stem.mid` triples. The JSON schema is not uniform, so instrument
//! detection tries several key spellings before falling back to the path.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

/// Keys that may hold the instrument code
pub const CODE_KEYS: [&str; 6] = [
    "instrument_code",
    "inst_code",
    "악기코드",
    "악기_코드",
    "instrumentId",
    "instrument",
];

/// Keys that may hold the instrument name
pub const NAME_KEYS: [&str; 5] = [
    "instrument_name",
    "inst_name",
    "악기명",
    "악기",
    "instrumentName",
];

/// Substrings marking an arbitrary key as instrument-related
const INSTRUMENT_KEY_HINTS: [&str; 4] = ["inst", "instrument", "code", "악기"];

/// Instrument to look for: dataset code plus display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTag {
    pub code: String,
    pub name: String,
}

impl InstrumentTag {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn gayageum() -> Self {
        Self::new("SP01", "가야금")
    }
}

/// A matched metadata file with its audio and MIDI companions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub json: PathBuf,
    pub wav: PathBuf,
    pub midi: PathBuf,
}

/// String or number value as trimmed text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Does this metadata describe a recording of `tag`?
///
/// Checked in order: a known code key equal to the code, any
/// instrument-looking key equal to the code, a known name key containing the
/// name, and finally the code appearing anywhere in `json_path`.
pub fn matches_instrument(meta: &Value, json_path: &Path, tag: &InstrumentTag) -> bool {
    if let Some(fields) = meta.as_object() {
        let by_code_key = CODE_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .any(|value| scalar_text(value).is_some_and(|text| text == tag.code));
        if by_code_key {
            return true;
        }

        let by_any_key = fields.iter().any(|(key, value)| {
            let key = key.to_lowercase();
            scalar_text(value).is_some_and(|text| text == tag.code)
                && INSTRUMENT_KEY_HINTS.iter().any(|hint| key.contains(hint))
        });
        if by_any_key {
            return true;
        }

        let by_name = NAME_KEYS
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .any(|name| name.contains(&tag.name));
        if by_name {
            return true;
        }
    }

    json_path.to_string_lossy().contains(&tag.code)
}

/// `dir/stem.json` -> (`dir/stem.wav`, `dir/stem.mid`)
pub fn paired_paths(json_path: &Path) -> (PathBuf, PathBuf) {
    let stem = json_path.with_extension("");
    (stem.with_extension("wav"), stem.with_extension("mid"))
}

/// Parse a metadata file; unreadable or invalid JSON yields `None`
pub fn read_metadata(json_path: &Path) -> Option<Value> {
    let text = fs::read_to_string(json_path)
        .map_err(|e| debug!("Skipping {}: {}", json_path.display(), e))
        .ok()?;
    serde_json::from_str(&text)
        .map_err(|e| debug!("Skipping {}: invalid JSON ({})", json_path.display(), e))
        .ok()
}

/// Matched triple for `json_path`, if the metadata names `tag` and both
/// companion files exist
pub fn find_pair(json_path: &Path, tag: &InstrumentTag) -> Option<DatasetEntry> {
    let meta = read_metadata(json_path)?;
    if !matches_instrument(&meta, json_path, tag) {
        return None;
    }

    let (wav, midi) = paired_paths(json_path);
    if !(wav.exists() && midi.exists()) {
        debug!("{} matches but is missing its .wav or .mid", json_path.display());
        return None;
    }

    Some(DatasetEntry {
        json: json_path.to_path_buf(),
        wav,
        midi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gayageum() -> InstrumentTag {
        InstrumentTag::gayageum()
    }

    #[test]
    fn test_code_key() {
        let meta = json!({ "instrument_code": " SP01 " });
        assert!(matches_instrument(&meta, Path::new("x.json"), &gayageum()));

        let meta = json!({ "instrument": "SP02" });
        assert!(!matches_instrument(&meta, Path::new("x.json"), &gayageum()));
    }

    #[test]
    fn test_any_instrument_looking_key() {
        let meta = json!({ "Annotation_InstCode": "SP01" });
        assert!(matches_instrument(&meta, Path::new("x.json"), &gayageum()));

        // Right value under an unrelated key does not count
        let meta = json!({ "session": "SP01" });
        assert!(!matches_instrument(&meta, Path::new("x.json"), &gayageum()));
    }

    #[test]
    fn test_name_key() {
        let meta = json!({ "악기명": "25현 가야금" });
        assert!(matches_instrument(&meta, Path::new("x.json"), &gayageum()));

        let meta = json!({ "instrument_name": "거문고" });
        assert!(!matches_instrument(&meta, Path::new("x.json"), &gayageum()));
    }

    #[test]
    fn test_path_fallback() {
        let meta = json!(["not", "an", "object"]);
        assert!(matches_instrument(&meta, Path::new("data/SP01/take1.json"), &gayageum()));
        assert!(!matches_instrument(&meta, Path::new("data/SP02/take1.json"), &gayageum()));
    }

    #[test]
    fn test_numeric_code() {
        let tag = InstrumentTag::new("7", "piri");
        let meta = json!({ "inst_code": 7 });
        assert!(matches_instrument(&meta, Path::new("x.json"), &tag));
    }

    #[test]
    fn test_paired_paths() {
        let (wav, midi) = paired_paths(Path::new("set/take_01.json"));
        assert_eq!(wav, PathBuf::from("set/take_01.wav"));
        assert_eq!(midi, PathBuf::from("set/take_01.mid"));
    }

    #[test]
    fn test_find_pair_requires_companions() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("take.json");
        fs::write(&json_path, r#"{"instrument_code": "SP01"}"#).unwrap();

        assert_eq!(find_pair(&json_path, &gayageum()), None);

        fs::write(dir.path().join("take.wav"), b"RIFF").unwrap();
        fs::write(dir.path().join("take.mid"), b"MThd").unwrap();
        let entry = find_pair(&json_path, &gayageum()).unwrap();
        assert_eq!(entry.midi, dir.path().join("take.mid"));
        assert_eq!(entry.wav, dir.path().join("take.wav"));
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("SP01.json");
        fs::write(&json_path, "{ not json").unwrap();
        assert_eq!(read_metadata(&json_path), None);
        assert_eq!(find_pair(&json_path, &gayageum()), None);
    }
}

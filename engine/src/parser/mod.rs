//! Record loading from delimited text and JSON files.
//!
//! Delimited input goes through encoding and delimiter auto-detection and
//! becomes one [`Record`] per row, keyed by the header line. JSON input may
//! be a list of objects or an object wrapping one under `data`, `items` or
//! `rows`.

use serde_json::Value;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::Record;

/// Keys searched, in order, for the record list of a JSON object.
pub const JSON_LIST_KEYS: [&str; 3] = ["data", "items", "rows"];

/// Where the records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited { delimiter: char },
    Json,
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Loaded records
    pub records: Vec<Record>,
    /// Detected or used encoding
    pub encoding: String,
    /// Input format
    pub format: SourceFormat,
    /// Column headers (keys of the first record for JSON input)
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // UTF-8 and anything unrecognized: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into records.
///
/// Short rows get `""` for the missing columns; surplus cells are dropped.
pub fn parse_delimited(content: &str, delimiter: char) -> LoadResult<(Vec<String>, Vec<Record>)> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| LoadError::Malformed(format!("delimiter '{}' is not a single byte", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyFile);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), Value::String(row.get(i).unwrap_or("").to_string())))
            .collect();
        records.push(record);
    }

    Ok((headers, records))
}

/// Parse delimited bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let (headers, records) = parse_delimited(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        format: SourceFormat::Delimited { delimiter },
        headers,
    })
}

/// Extract records from a parsed JSON document.
pub fn json_to_records(document: Value) -> LoadResult<Vec<Record>> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = JSON_LIST_KEYS
                .iter()
                .find(|k| matches!(map.get(**k), Some(Value::Array(_))));
            match key.and_then(|k| map.remove(*k)) {
                Some(Value::Array(items)) => items,
                // A lone object is a single record
                _ => return Ok(vec![map]),
            }
        }
        other => {
            return Err(LoadError::Malformed(format!(
                "expected a list of objects, found {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(LoadError::Malformed(format!(
                "item {} is {}, expected an object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Parse JSON bytes into records.
pub fn parse_json_bytes(bytes: &[u8]) -> LoadResult<ParseResult> {
    let document: Value = serde_json::from_slice(bytes)?;
    let records = json_to_records(document)?;
    let headers = records
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default();

    Ok(ParseResult {
        records,
        encoding: "utf-8".to_string(),
        format: SourceFormat::Json,
        headers,
    })
}

/// Load records from a file; `.json` files are read as JSON, anything else as delimited text.
pub fn load_records<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_json_path(path) {
        parse_json_bytes(&bytes)
    } else {
        parse_bytes_auto(&bytes)
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let csv = "Date,Region,Sales\n2024-01-01,East,1500\n2024-01-02,West,900";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.format, SourceFormat::Delimited { delimiter: ',' });
        assert_eq!(result.headers, vec!["Date", "Region", "Sales"]);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0]["Region"], "East");
        assert_eq!(result.records[1]["Sales"], "900");
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "Product,Sales\n\"Widget, large\",1200\n";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();
        assert_eq!(result.records[0]["Product"], "Widget, large");
    }

    #[test]
    fn test_short_and_long_rows() {
        let (_, records) = parse_delimited("a;b;c\n1;;3\n4\n5;6;7;8", ';').unwrap();

        assert_eq!(records[0]["b"], "");
        assert_eq!(records[1]["b"], "");
        assert_eq!(records[1]["c"], "");
        assert_eq!(records[2].len(), 3);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let (_, records) = parse_delimited("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_bytes_auto(b""), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = b"\xEF\xBB\xBFSales,Region\n1,East";
        let result = parse_bytes_auto(bytes).unwrap();
        assert_eq!(result.headers[0], "Sales");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_json_list_and_wrappers() {
        let list = json_to_records(json!([{"Sales": 1}, {"Sales": 2}])).unwrap();
        assert_eq!(list.len(), 2);

        let wrapped = json_to_records(json!({"meta": 1, "items": [{"Sales": 3}]})).unwrap();
        assert_eq!(wrapped[0]["Sales"], 3);

        // "data" wins over "rows"
        let both = json_to_records(json!({"rows": [{"x": 1}], "data": [{"x": 2}]})).unwrap();
        assert_eq!(both[0]["x"], 2);

        // A wrapper key that is not a list does not count
        let single = json_to_records(json!({"data": "nope", "Sales": 4})).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0]["Sales"], 4);
    }

    #[test]
    fn test_json_malformed_top_level() {
        assert!(matches!(json_to_records(json!(42)), Err(LoadError::Malformed(_))));
        assert!(matches!(json_to_records(json!([{"a": 1}, "b"])), Err(LoadError::Malformed(_))));
        assert!(matches!(parse_json_bytes(b"{not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_load_records_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("input.JSON");
        std::fs::write(&json_path, r#"{"rows": [{"Region": "East"}]}"#).unwrap();
        let result = load_records(&json_path).unwrap();
        assert_eq!(result.format, SourceFormat::Json);
        assert_eq!(result.headers, vec!["Region"]);

        let csv_path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "Region;Sales").unwrap();
        writeln!(file, "East;10").unwrap();
        let result = load_records(&csv_path).unwrap();
        assert_eq!(result.format, SourceFormat::Delimited { delimiter: ';' });
        assert_eq!(result.records[0]["Sales"], "10");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("not/here.csv"));
    }
}

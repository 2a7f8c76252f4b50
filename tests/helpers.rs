// Shared test helpers for upstream mocks and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use agri_open_data::{Config, LogFormat, LogLevel};
use serde_json::{json, Value};

/// Catalog grid id, as the upstream names the keyed envelope.
#[allow(dead_code)] // Used by other test files
pub const CATALOG_GRID: &str = "Grid_20210909000000000613_1";

/// Creates a Config pointing at a mock upstream.
#[allow(dead_code)] // Used by other test files
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        api_key: "TESTKEY".to_string(),
        base_url: format!("{}/openapi", base_url),
        use_sample: false,
        timeout_seconds: 5,
        user_agent: "agri_open_data_test/1.0".to_string(),
        log_level: LogLevel::Error, // Reduce noise in tests
        log_format: LogFormat::Plain,
    }
}

/// Catalog rows numbered from `start`, one per name.
#[allow(dead_code)] // Used by other test files
pub fn catalog_rows(names: &[&str], start: usize) -> Vec<Value> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "ROW_NUM": start + i,
                "DATASET_ID": "S1",
                "DATA_ID": format!("D{}", start + i),
                "KOREAN_NM": name,
                "INSTT_NM": "농림축산식품부",
                "API_PROVD_ENNC": "Y"
            })
        })
        .collect()
}

/// Catalog rows wrapped in the keyed JSON envelope.
#[allow(dead_code)] // Used by other test files
pub fn keyed_body(total: usize, rows: Vec<Value>) -> Value {
    json!({ CATALOG_GRID: {
        "totalCnt": total,
        "startRow": 1,
        "endRow": rows.len(),
        "result": {"code": "INFO-000", "message": "정상 처리되었습니다."},
        "row": rows
    }})
}

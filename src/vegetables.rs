//! Vegetable production statistics.
//!
//! Fetches the production dataset in one request, keeps the nationwide rows
//! for real crops (the `계` rows are subtotals), and ranks crops by
//! production within a year.

use std::collections::BTreeSet;

use log::info;
use serde::Serialize;

use crate::config::{Config, DataFormat, VEGETABLES_FETCH_LIMIT, VEGETABLES_GRID_ID};
use crate::error_handling::FetchError;
use crate::fetch::{build_request_url, Transport};
use crate::models::Row;
use crate::normalize::normalize;
use crate::paginate::PageWindow;

/// Region value of the nationwide aggregate rows.
const NATIONWIDE: &str = "전 국";

/// Crop name of subtotal rows.
const SUBTOTAL: &str = "계";

/// One crop's production figures for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VegetableRecord {
    /// Survey year (0 when unparseable)
    pub year: i32,
    /// Crop name (`VGETBL_CL`)
    pub crop: String,
    /// Crop group (`VGETBL_BUNDLE_CL`), if present
    pub category: Option<String>,
    /// Region (`SE`)
    pub region: String,
    /// Production in tons (`OUTTRN_SM`)
    pub production: f64,
    /// Cultivated area in ha (`AR_SM`)
    pub area: f64,
    /// Yield in kg/ha (`STGCO_SM`)
    pub yield_per_ha: f64,
}

/// A record with its 1-based production rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVegetable {
    /// Position by descending production
    pub rank: usize,
    /// The ranked record
    #[serde(flatten)]
    pub record: VegetableRecord,
}

fn number(row: &Row, key: &str) -> f64 {
    row.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Keeps nationwide rows whose crop name is present and not a subtotal,
/// converting numeric fields (unparseable numbers read as 0).
pub fn process_rows(rows: &[Row]) -> Vec<VegetableRecord> {
    rows.iter()
        .filter(|row| row.text("SE").as_deref() == Some(NATIONWIDE))
        .filter_map(|row| {
            let crop = row.non_blank_text("VGETBL_CL")?;
            if crop == SUBTOTAL {
                return None;
            }
            Some(VegetableRecord {
                year: number(row, "YEAR").trunc() as i32,
                crop: crop.into_owned(),
                category: row.non_blank_text("VGETBL_BUNDLE_CL").map(|c| c.into_owned()),
                region: NATIONWIDE.to_string(),
                production: number(row, "OUTTRN_SM"),
                area: number(row, "AR_SM"),
                yield_per_ha: number(row, "STGCO_SM"),
            })
        })
        .collect()
}

/// Restricts to `year` (all years for `None`) and ranks by descending
/// production. Ties keep their input order.
pub fn rank_by_year(records: &[VegetableRecord], year: Option<i32>) -> Vec<RankedVegetable> {
    let mut selected: Vec<&VegetableRecord> = records
        .iter()
        .filter(|r| match year {
            Some(y) => r.year == y,
            None => true,
        })
        .collect();
    selected.sort_by(|a, b| b.production.total_cmp(&a.production));
    selected
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedVegetable {
            rank: i + 1,
            record: record.clone(),
        })
        .collect()
}

/// Distinct years, newest first.
pub fn available_years(records: &[VegetableRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    years.into_iter().rev().collect()
}

/// Fetches and processes the production dataset (first
/// `VEGETABLES_FETCH_LIMIT` rows, JSON).
///
/// # Errors
///
/// Any `FetchError` from URL building, transport or normalization.
pub async fn fetch_vegetables<T: Transport>(
    config: &Config,
    transport: &T,
) -> Result<Vec<VegetableRecord>, FetchError> {
    let window = PageWindow::new(1, VEGETABLES_FETCH_LIMIT)?;
    let url = build_request_url(
        &config.base_url,
        config.api_token(),
        DataFormat::Json,
        VEGETABLES_GRID_ID,
        window,
    )?;
    let body = transport.get_text(&url, DataFormat::Json).await?;
    let result = normalize(&body, DataFormat::Json, VEGETABLES_GRID_ID)?;
    let records = process_rows(&result.rows);
    info!(
        "Kept {} nationwide crop rows out of {}",
        records.len(),
        result.rows.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|v| v.as_object().map(Row::from_json_object))
            .collect()
    }

    fn sample_rows() -> Vec<Row> {
        rows(json!([
            {"YEAR": "2022", "SE": "전 국", "VGETBL_CL": "배추", "VGETBL_BUNDLE_CL": "엽채류", "OUTTRN_SM": "2000", "AR_SM": "30", "STGCO_SM": "6600"},
            {"YEAR": "2022", "SE": "전 국", "VGETBL_CL": "계", "OUTTRN_SM": "9999"},
            {"YEAR": "2022", "SE": "경기", "VGETBL_CL": "무", "OUTTRN_SM": "5000"},
            {"YEAR": "2022", "SE": "전 국", "VGETBL_CL": "무", "OUTTRN_SM": 3500.5, "AR_SM": "n/a"},
            {"YEAR": "2021", "SE": "전 국", "VGETBL_CL": "양파", "OUTTRN_SM": "1500"},
            {"YEAR": "2021", "SE": "전 국", "VGETBL_CL": "", "OUTTRN_SM": "10"}
        ]))
    }

    #[test]
    fn test_process_keeps_nationwide_crops_only() {
        let records = process_rows(&sample_rows());
        let crops: Vec<&str> = records.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(crops, vec!["배추", "무", "양파"]);
        assert!(records.iter().all(|r| r.region == "전 국"));
    }

    #[test]
    fn test_numbers_are_converted() {
        let records = process_rows(&sample_rows());
        assert_eq!(records[0].year, 2022);
        assert_eq!(records[0].production, 2000.0);
        assert_eq!(records[0].yield_per_ha, 6600.0);
        assert_eq!(records[0].category.as_deref(), Some("엽채류"));
        assert_eq!(records[1].production, 3500.5);
        assert_eq!(records[1].area, 0.0);
        assert_eq!(records[1].category, None);
    }

    #[test]
    fn test_rank_descending_by_production() {
        let records = process_rows(&sample_rows());
        let ranked = rank_by_year(&records, Some(2022));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].record.crop, "무");
        assert_eq!(ranked[1].record.crop, "배추");

        let all = rank_by_year(&records, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].record.crop, "양파");
        assert_eq!(all[2].rank, 3);
    }

    #[test]
    fn test_available_years_newest_first() {
        let records = process_rows(&sample_rows());
        assert_eq!(available_years(&records), vec![2022, 2021]);
        assert!(available_years(&[]).is_empty());
    }
}

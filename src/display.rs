//! Terminal rendering of catalog pages and the vegetable ranking.
//!
//! Every function returns a `String`; printing is left to the binary.

use std::borrow::Cow;

use colored::Colorize;

use crate::config::DISPLAY_NAME_FIELD;
use crate::fetch::{FetchState, PageView};
use crate::models::Row;
use crate::vegetables::RankedVegetable;

/// Provision flags and the label shown when the flag is `Y`.
const PROVISION_FLAGS: &[(&str, &str)] = &[
    ("GRID_PROVD_ENNC", "그리드"),
    ("API_PROVD_ENNC", "OpenAPI"),
    ("FILE_PROVD_ENNC", "파일"),
    ("LINK_PROVD_ENNC", "링크"),
    ("RAW_DATA_PROVD_ENNC", "원시데이터"),
    ("CHART_PROVD_ENNC", "차트"),
    ("MAP_PROVD_ENNC", "맵"),
];

const NO_VALUE: &str = "-";

fn field_or<'a>(row: &'a Row, key: &str, fallback: &'a str) -> Cow<'a, str> {
    row.non_blank_text(key).unwrap_or(Cow::Borrowed(fallback))
}

/// Rounds to an integer and groups thousands with commas.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Production in tons.
pub fn format_tons(value: f64) -> String {
    format!("{} 톤", format_thousands(value))
}

/// Area in hectares.
pub fn format_area(value: f64) -> String {
    format!("{} ha", format_thousands(value))
}

/// Yield in kg/ha, or `-` when not positive.
pub fn format_yield(value: f64) -> String {
    if value > 0.0 {
        format!("{} kg/ha", format_thousands(value))
    } else {
        NO_VALUE.to_string()
    }
}

/// Card title: the Korean name, else the data name.
pub fn card_title(row: &Row) -> Cow<'_, str> {
    row.non_blank_text(DISPLAY_NAME_FIELD)
        .or_else(|| row.non_blank_text("DATA_NM"))
        .unwrap_or(Cow::Borrowed("데이터셋명 없음"))
}

/// Comma-separated provision types whose flag is `Y`, or `-`.
pub fn provision_types(row: &Row) -> String {
    let types: Vec<&str> = PROVISION_FLAGS
        .iter()
        .filter(|(flag, _)| row.text(flag).as_deref() == Some("Y"))
        .map(|(_, label)| *label)
        .collect();
    if types.is_empty() {
        NO_VALUE.to_string()
    } else {
        types.join(", ")
    }
}

fn render_card(row: &Row) -> Vec<String> {
    let description = row
        .non_blank_text("DC")
        .or_else(|| row.non_blank_text("DATA_DC"))
        .unwrap_or(Cow::Borrowed("설명 없음"));
    let keywords: Vec<Cow<'_, str>> = ["KWRD_ONE", "KWRD_TWO", "KWRD_THREE"]
        .iter()
        .filter_map(|k| row.non_blank_text(k))
        .collect();

    let mut lines = vec![
        format!(
            "{} {}",
            format!("#{}", field_or(row, "ROW_NUM", NO_VALUE)).dimmed(),
            card_title(row).bold()
        ),
        format!(
            "   [{}] [{}]",
            field_or(row, "INSTT_NM", NO_VALUE).cyan(),
            field_or(row, "UPDT_CYCLE", NO_VALUE).yellow()
        ),
        format!("   설명: {}", description),
        format!(
            "   데이터셋 ID: {} | 데이터 ID: {}",
            field_or(row, "DATASET_ID", NO_VALUE),
            field_or(row, "DATA_ID", NO_VALUE)
        ),
        format!("   제공 유형: {}", provision_types(row)),
    ];
    if !keywords.is_empty() {
        lines.push(format!("   키워드: {}", keywords.join(", ")));
    }
    if let Some(url) = row.non_blank_text("URL") {
        lines.push(format!("   🔗 {}", url.underline()));
    }
    lines
}

/// Page-button strip, current page in brackets.
pub fn render_page_buttons(buttons: &[usize], current: usize) -> String {
    buttons
        .iter()
        .map(|&page| {
            if page == current {
                format!("[{}]", page).bold().to_string()
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders one catalog page: cards, then the pagination summary.
///
/// A failed fetch renders as its error message; an empty one as its
/// informational message.
pub fn render_catalog_page(view: &PageView) -> String {
    let mut lines = Vec::new();
    if view.sample {
        lines.push(
            "ℹ️  샘플 모드: 최대 5건까지만 조회됩니다."
                .yellow()
                .to_string(),
        );
    }
    if let Some(pattern) = &view.filter {
        lines.push(format!("검색어: \"{}\"", pattern));
    }

    match (view.state, &view.message) {
        (FetchState::Failure, message) => {
            lines.push(
                format!("❌ {}", message.as_deref().unwrap_or_default())
                    .red()
                    .to_string(),
            );
            return lines.join("\n");
        }
        (_, Some(message)) if view.rows.is_empty() => {
            lines.push(message.clone());
            return lines.join("\n");
        }
        _ => {}
    }

    lines.push(format!("조회 결과: {}건", view.rows.len()).bold().to_string());
    for row in &view.rows {
        lines.push(String::new());
        lines.extend(render_card(row));
    }
    lines.extend(render_pagination(view));
    lines.join("\n")
}

/// Total and page summary plus buttons. Nothing for an empty total; the
/// total alone in sample mode; no buttons for a single page.
fn render_pagination(view: &PageView) -> Vec<String> {
    if view.total_count == 0 {
        return Vec::new();
    }
    let total = format!("전체 {}건", format_thousands(view.total_count as f64));
    if view.sample {
        return vec![String::new(), total];
    }

    let mut lines = vec![
        String::new(),
        format!("{} | 페이지 {} / {}", total, view.page, view.total_pages),
    ];
    if view.total_pages > 1 {
        lines.push(render_page_buttons(&view.page_buttons, view.page));
    }
    lines
}

/// Renders the vegetable ranking table.
pub fn render_vegetables(ranked: &[RankedVegetable], year: Option<i32>, years: &[i32]) -> String {
    let mut lines = vec!["🥬 채소류 생산량 통계".bold().to_string()];
    if !years.is_empty() {
        let listed: Vec<String> = years.iter().map(|y| format!("{y}년")).collect();
        lines.push(format!(
            "년도: {} (가능: {})",
            year.map_or_else(|| "전체".to_string(), |y| format!("{y}년")),
            listed.join(", ")
        ));
    }
    lines.push(format!("총 {}개 품목", ranked.len()));
    lines.push(String::new());
    lines.push(
        format!(
            "{:>4}  {:<12} {:<10} {:>16} {:>12} {:>14} {:>6}",
            "순위", "작물명", "분류", "생산량", "면적", "단수", "년도"
        )
        .bold()
        .to_string(),
    );

    if ranked.is_empty() {
        lines.push("데이터가 없습니다.".dimmed().to_string());
    }
    for item in ranked {
        let record = &item.record;
        lines.push(format!(
            "{:>4}  {:<12} {:<10} {:>16} {:>12} {:>14} {:>6}",
            item.rank,
            record.crop,
            record.category.as_deref().unwrap_or(NO_VALUE),
            format_tons(record.production),
            format_area(record.area),
            format_yield(record.yield_per_ha),
            record.year
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vegetables::VegetableRecord;

    fn catalog_row() -> Row {
        [
            ("ROW_NUM", "1"),
            ("KOREAN_NM", "가공업체 현황"),
            ("INSTT_NM", "농림축산식품부"),
            ("API_PROVD_ENNC", "Y"),
            ("MAP_PROVD_ENNC", "Y"),
            ("FILE_PROVD_ENNC", "N"),
        ]
        .into_iter()
        .collect()
    }

    fn view(rows: Vec<Row>, state: FetchState, message: Option<&str>) -> PageView {
        PageView {
            state,
            rows,
            total_count: 1234,
            page: 2,
            page_size: 10,
            total_pages: 124,
            page_buttons: vec![1, 2, 3, 4, 5],
            filter: None,
            message: message.map(str::to_string),
            sample: false,
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-4500.0), "-4,500");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_tons(2500.0), "2,500 톤");
        assert_eq!(format_area(0.0), "0 ha");
        assert_eq!(format_yield(6600.0), "6,600 kg/ha");
        assert_eq!(format_yield(0.0), "-");
    }

    #[test]
    fn test_card_title_fallbacks() {
        assert_eq!(card_title(&catalog_row()), "가공업체 현황");
        let row: Row = [("DATA_NM", "데이터명")].into_iter().collect();
        assert_eq!(card_title(&row), "데이터명");
        assert_eq!(card_title(&Row::new()), "데이터셋명 없음");
    }

    #[test]
    fn test_provision_types() {
        assert_eq!(provision_types(&catalog_row()), "OpenAPI, 맵");
        assert_eq!(provision_types(&Row::new()), "-");
    }

    #[test]
    fn test_catalog_page_summary() {
        let out = render_catalog_page(&view(vec![catalog_row()], FetchState::Success, None));
        assert!(out.contains("가공업체 현황"));
        assert!(out.contains("농림축산식품부"));
        assert!(out.contains("전체 1,234건 | 페이지 2 / 124"));
    }

    #[test]
    fn test_catalog_page_failure_and_empty() {
        let out = render_catalog_page(&view(vec![], FetchState::Failure, Some("bad key")));
        assert!(out.contains("bad key"));
        assert!(!out.contains("전체"));

        let out = render_catalog_page(&view(
            vec![],
            FetchState::Success,
            Some("조회된 데이터가 없습니다."),
        ));
        assert!(out.contains("조회된 데이터가 없습니다."));
    }

    #[test]
    fn test_sample_mode_hides_paging() {
        let mut sample = view(vec![catalog_row()], FetchState::Success, None);
        sample.sample = true;
        sample.total_count = 5;
        let out = render_catalog_page(&sample);
        assert!(out.contains("샘플 모드"));
        assert!(out.contains("전체 5건"));
        assert!(!out.contains("페이지"));
        assert!(!out.contains("[2]"));
    }

    #[test]
    fn test_single_page_has_no_buttons() {
        let mut single = view(vec![catalog_row()], FetchState::Success, None);
        single.total_count = 3;
        single.page = 1;
        single.total_pages = 1;
        single.page_buttons = vec![1];
        let out = render_catalog_page(&single);
        assert!(out.contains("전체 3건 | 페이지 1 / 1"));
        assert!(!out.contains("[1]"));
    }

    #[test]
    fn test_zero_total_has_no_summary() {
        let mut unknown = view(vec![catalog_row()], FetchState::Success, None);
        unknown.total_count = 0;
        let out = render_catalog_page(&unknown);
        assert!(out.contains("가공업체 현황"));
        assert!(!out.contains("전체"));
        assert!(!out.contains("페이지"));
    }

    #[test]
    fn test_vegetable_table() {
        let ranked = vec![RankedVegetable {
            rank: 1,
            record: VegetableRecord {
                year: 2022,
                crop: "무".to_string(),
                category: None,
                region: "전 국".to_string(),
                production: 3500.5,
                area: 12.0,
                yield_per_ha: 0.0,
            },
        }];
        let out = render_vegetables(&ranked, Some(2022), &[2022, 2021]);
        assert!(out.contains("총 1개 품목"));
        assert!(out.contains("3,501 톤"));
        assert!(out.contains("12 ha"));
        assert!(out.contains("2021년"));

        let out = render_vegetables(&[], None, &[]);
        assert!(out.contains("데이터가 없습니다."));
    }
}

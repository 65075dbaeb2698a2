//! Terminal rendering of grouped publication lists.

use std::collections::HashSet;
use std::fmt::Write;

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::classify::GroupedRecords;
use crate::models::Record;
use crate::render::cite::parse_citation;

/// Render grouped records as plain or colored terminal text
///
/// Records whose HAL id is in `excluded` are skipped. Colors are only
/// applied when `color` is set (the CLI passes TTY detection here).
pub fn render_text(grouped: &GroupedRecords, excluded: &HashSet<String>, color: bool) -> String {
    let mut out = String::new();
    for (category, records) in grouped.iter() {
        let kept: Vec<&Record> = records
            .iter()
            .filter(|r| !excluded.contains(&r.hal_id))
            .collect();
        if kept.is_empty() {
            continue;
        }

        let heading = format!("{} ({})", category.label(), category.code());
        if color {
            writeln!(out, "\n{}", heading.bold().underline()).ok();
        } else {
            writeln!(out, "\n{}", heading).ok();
        }

        for record in kept {
            out.push_str(&render_record(record, color));
        }
    }
    out
}

fn render_record(record: &Record, color: bool) -> String {
    let year = record
        .produced_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let authors = record
        .authors()
        .iter()
        .map(|a| a.full_name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    let citation = parse_citation(record.citation_ref.as_deref().unwrap_or(""));

    let mut out = String::new();
    let title = record.display_title();
    if color {
        writeln!(out, "  [{}] {}", year.cyan(), title.bold()).ok();
    } else {
        writeln!(out, "  [{}] {}", year, title).ok();
    }
    if !authors.is_empty() {
        writeln!(out, "        {}", authors).ok();
    }
    if !citation.text.is_empty() {
        writeln!(out, "        {}", citation.text).ok();
    }
    if color {
        writeln!(out, "        {}", record.hal_url().blue()).ok();
    } else {
        writeln!(out, "        {}", record.hal_url()).ok();
    }
    for link in &citation.links {
        writeln!(out, "        {} {}", link.label, link.url).ok();
    }
    out
}

/// Per-category count summary
pub fn summary_table(grouped: &GroupedRecords, excluded: &HashSet<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Code", "Category", "Count"]);

    for (category, records) in grouped.iter() {
        let count = records
            .iter()
            .filter(|r| !excluded.contains(&r.hal_id))
            .count();
        if count > 0 {
            table.add_row(vec![
                Cell::new(category.code()),
                Cell::new(category.label()),
                Cell::new(count),
            ]);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::group_by_category;
    use serde_json::json;

    fn grouped() -> GroupedRecords {
        group_by_category(vec![
            serde_json::from_value(json!({
                "halId_s": "hal-1",
                "docType_s": "ART",
                "peerReviewing_s": 1,
                "audience_s": 2,
                "title_s": "Deep Matters",
                "producedDateY_i": 2021,
                "authIdHalFullName_fs": ["_FacetSep_Jane Doe"]
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "halId_s": "hal-2",
                "docType_s": "POSTER",
                "title_s": "A Poster"
            }))
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_text_plain() {
        let out = render_text(&grouped(), &HashSet::new(), false);
        assert!(out.contains("International peer-reviewed journal articles (ACL)"));
        assert!(out.contains("[2021] Deep Matters"));
        assert!(out.contains("Jane Doe"));
        assert!(out.contains("Posters (AFF)"));
        assert!(out.contains("[----] A Poster"));
    }

    #[test]
    fn test_render_text_respects_exclusions() {
        let excluded: HashSet<String> = ["hal-2".to_string()].into();
        let out = render_text(&grouped(), &excluded, false);
        assert!(out.contains("Deep Matters"));
        assert!(!out.contains("A Poster"));
        assert!(!out.contains("Posters (AFF)"));
    }

    #[test]
    fn test_summary_table_counts() {
        let table = summary_table(&grouped(), &HashSet::new());
        let rendered = table.to_string();
        assert!(rendered.contains("ACL"));
        assert!(rendered.contains("AFF"));
    }
}

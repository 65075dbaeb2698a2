//! HTML rendering of grouped publication lists.
//!
//! Produces the same document shape the original publication pages use: one
//! section per category holding an ordered list of `li.bib` entries, each
//! with its link icons, author links, title and citation text.
//!
//! Titles, author names and citation text come from HAL as display markup
//! (they may contain entities) and are emitted as-is; everything interpolated
//! into attributes is escaped.

use std::collections::HashSet;
use std::fmt::Write;

use crate::classify::GroupedRecords;
use crate::models::Record;
use crate::render::cite::parse_citation;

const CV_BASE: &str = "https://cv.archives-ouvertes.fr/";
const ICON_DIR: &str = "img/icons/";

/// Escape text for use inside an HTML attribute value
fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Icon file for a citation link, keyed by host
fn icon_for_host(host: &str) -> &'static str {
    match host {
        "dx.doi.org" => "doi.svg",
        "www.mdpi.com" => "mdpi.jpg",
        _ => "link.svg",
    }
}

/// Render grouped records as an HTML fragment
///
/// Records whose HAL id is in `excluded` are skipped; a category whose
/// records are all excluded is omitted entirely.
pub fn render_html(grouped: &GroupedRecords, excluded: &HashSet<String>) -> String {
    let mut out = String::new();
    for (category, records) in grouped.iter() {
        let kept: Vec<&Record> = records
            .iter()
            .filter(|r| !excluded.contains(&r.hal_id))
            .collect();
        if kept.is_empty() {
            continue;
        }

        writeln!(out, "<section id=\"pub{}\">", category.code()).ok();
        writeln!(out, "<h2>{}</h2>", category.label()).ok();
        writeln!(out, "<ol class=\"sub\">").ok();
        for record in kept {
            out.push_str(&render_record(record));
        }
        writeln!(out, "</ol>").ok();
        writeln!(out, "</section>").ok();
    }
    out
}

fn render_record(record: &Record) -> String {
    let parsed = parse_citation(record.citation_ref.as_deref().unwrap_or(""));

    let mut links = String::new();
    if let Some(bibtex) = &record.bibtex {
        write!(
            links,
            "<span class=\"bibtex\" data-bibtex=\"{}\"><img src=\"{}bibtex.jpg\" height=\"20\" alt=\"BibTeX\" title=\"Copy BibTeX to clipboard\"/></span>",
            escape_attr(bibtex),
            ICON_DIR
        )
        .ok();
    }
    for link in &parsed.links {
        write!(
            links,
            "<a class=\"imgLink\" href=\"{}\"><img src=\"{}{}\" height=\"20\" alt=\"{}\" title=\"{}\"/></a>",
            escape_attr(&link.url),
            ICON_DIR,
            icon_for_host(&link.host),
            escape_attr(&link.label),
            escape_attr(&link.label)
        )
        .ok();
    }
    for file in record.file_urls() {
        write!(
            links,
            "<a class=\"imgLink\" href=\"{}\"><img src=\"{}pdf_icon.gif\" height=\"20\" alt=\"pdf\" title=\"pdf\"/></a>",
            escape_attr(&file),
            ICON_DIR
        )
        .ok();
    }

    let mut authors = String::new();
    for author in record.authors() {
        match &author.idhal {
            Some(idhal) => write!(
                authors,
                "<a class=\"author\" id=\"{}\" href=\"{}{}\"><span>{}</span></a>",
                escape_attr(idhal),
                CV_BASE,
                escape_attr(idhal),
                author.full_name
            )
            .ok(),
            None => write!(
                authors,
                "<span class=\"author\"><span>{}</span></span>",
                author.full_name
            )
            .ok(),
        };
    }

    let title = match (&record.en_title, &record.fr_title) {
        // Bilingual records carry both language spans; the page decides
        (Some(en), Some(fr)) => format!(
            "<span class=\"lang-en\">{}</span><span class=\"lang-fr\">{}</span>",
            en, fr
        ),
        _ => record.display_title().to_string(),
    };

    format!(
        "<li class=\"bib\" id=\"{}\"><span>{}</span><span>{}</span><a class=\"title\" href=\"{}\">{}</a><span>{}</span></li>\n",
        escape_attr(&record.hal_id),
        links,
        authors,
        escape_attr(&record.hal_url()),
        title,
        parsed.text
    )
}

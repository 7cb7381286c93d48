//! Portal scraping: directory listings and December chart archives.
//!
//! The portal serves plain directory listings. The base listing links one
//! folder per year; each year folder links the chart archives for that year,
//! named like `cis_SGRDREA_20201225T1800Z_pl_a.tar` with the chart date at a
//! fixed offset.

mod client;

use std::ops::RangeInclusive;

use scraper::{Html, Selector};

pub use client::{IceClient, ScrapeError, PARTIAL_SUFFIX};

/// Archive suffix of downloadable charts.
pub const ARCHIVE_SUFFIX: &str = ".tar";

/// Byte range of the month within an archive name.
const MONTH_SPAN: std::ops::Range<usize> = 16..18;
/// Byte range of the day of month within an archive name.
const DAY_SPAN: std::ops::Range<usize> = 18..20;

/// Days of December whose charts are kept.
///
/// This window is a heuristic picked for the Eastern Arctic series, not a
/// property of the data set.
pub const DECEMBER_DAYS: RangeInclusive<u32> = 18..=25;

/// Collect the `href` of every anchor in `html`, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// A year folder link is all digits once surrounding slashes are removed.
pub fn is_year_folder(href: &str) -> bool {
    let name = href.trim_matches('/');
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// Whether `href` names a late-December chart archive.
///
/// Links with a non-numeric day are rejected rather than treated as errors.
pub fn is_december_file(href: &str) -> bool {
    if !href.ends_with(ARCHIVE_SUFFIX) || href.len() < DAY_SPAN.end {
        return false;
    }

    if href.get(MONTH_SPAN) != Some("12") {
        return false;
    }

    href.get(DAY_SPAN)
        .filter(|day| day.chars().all(|c| c.is_ascii_digit()))
        .and_then(|day| day.parse::<u32>().ok())
        .is_some_and(|day| DECEMBER_DAYS.contains(&day))
}

/// Year folder links of a base listing.
pub fn year_folders(html: &str) -> Vec<String> {
    extract_links(html)
        .into_iter()
        .filter(|href| is_year_folder(href))
        .collect()
}

/// December archive links of a year listing.
pub fn december_files(html: &str) -> Vec<String> {
    extract_links(html)
        .into_iter()
        .filter(|href| is_december_file(href))
        .collect()
}

/// Local file name for a download URL: everything after the last `/`.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

//! Markup extraction for both profile sources.
//!
//! The selectors here are the brittle part of the system: they track the
//! primary source's current markup and may silently stop matching.

use scraper::{ElementRef, Html, Selector};

use crate::error::AcquisitionError;
use crate::profile::model::{MAX_PUBLICATIONS, MAX_STATS, PrimaryProfile};

/// Element id that signals the primary profile page has rendered.
pub const PROFILE_ANCHOR_ID: &str = "gsc_prf_in";

const INTEREST_SELECTOR: &str = "#gsc_prf_int a";
const PUBLICATION_SELECTOR: &str = ".gsc_a_at";
const STAT_SELECTOR: &str = ".gsc_rsb_std";
const VISIBLE_TEXT_SELECTOR: &str = "p, li, h2, h3";

/// Pull interests, publication titles and summary statistics out of a
/// rendered primary profile page.
///
/// Statistics stay positional: an empty cell is kept as `""` so the total
/// and the h-index are always read from the same slots.
pub fn parse_primary_profile(html: &str) -> Result<PrimaryProfile, AcquisitionError> {
    let doc = Html::parse_document(html);
    Ok(PrimaryProfile {
        interests: non_empty(select_texts(&doc, INTEREST_SELECTOR)?, usize::MAX),
        publications: non_empty(select_texts(&doc, PUBLICATION_SELECTOR)?, MAX_PUBLICATIONS),
        stats: select_texts(&doc, STAT_SELECTOR)?
            .into_iter()
            .take(MAX_STATS)
            .collect(),
    })
}

/// Visible text of paragraph, list-item and heading elements, in document
/// order, joined by single spaces. Not capped here.
pub fn extract_visible_text(html: &str) -> Result<String, AcquisitionError> {
    let doc = Html::parse_document(html);
    Ok(non_empty(select_texts(&doc, VISIBLE_TEXT_SELECTOR)?, usize::MAX).join(" "))
}

/// Text of every element matching `selector`, in document order.
fn select_texts(doc: &Html, selector: &str) -> Result<Vec<String>, AcquisitionError> {
    let selector = Selector::parse(selector)
        .map_err(|e| AcquisitionError::Parse(format!("bad selector {selector:?}: {e:?}")))?;
    Ok(doc.select(&selector).map(element_text).collect())
}

fn non_empty(texts: Vec<String>, limit: usize) -> Vec<String> {
    texts
        .into_iter()
        .filter(|text| !text.is_empty())
        .take(limit)
        .collect()
}

/// Descendant text with whitespace runs collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOLAR_PAGE: &str = r##"
        <html><body>
          <div id="gsc_prf_in">Michael Zhang</div>
          <div id="gsc_prf_int">
            <a href="#">Graph Neural Networks</a>
            <a href="#">  Causal
                Inference </a>
          </div>
          <table>
            <tr><td><a class="gsc_a_at">Paper A</a></td></tr>
            <tr><td><a class="gsc_a_at">Paper B</a></td></tr>
          </table>
          <table>
            <tr><td class="gsc_rsb_std">120</td><td class="gsc_rsb_std">80</td></tr>
            <tr><td class="gsc_rsb_std">8</td><td class="gsc_rsb_std">6</td></tr>
            <tr><td class="gsc_rsb_std">7</td><td class="gsc_rsb_std">5</td></tr>
          </table>
        </body></html>
    "##;

    #[test]
    fn primary_fields_extracted() {
        let profile = parse_primary_profile(SCHOLAR_PAGE).unwrap();
        assert_eq!(profile.interests, vec!["Graph Neural Networks", "Causal Inference"]);
        assert_eq!(profile.publications, vec!["Paper A", "Paper B"]);
        assert_eq!(profile.stats, vec!["120", "80", "8", "6"]);
        assert_eq!(
            profile.citation_summary().as_deref(),
            Some("Total Citations: 120 | h-index: 8")
        );
    }

    #[test]
    fn empty_stat_cell_keeps_positions() {
        let html = r#"
            <table>
              <tr><td class="gsc_rsb_std">120</td><td class="gsc_rsb_std"></td></tr>
              <tr><td class="gsc_rsb_std">8</td><td class="gsc_rsb_std">6</td></tr>
            </table>
        "#;
        let profile = parse_primary_profile(html).unwrap();
        assert_eq!(profile.stats, vec!["120", "", "8", "6"]);
        assert_eq!(
            profile.citation_summary().as_deref(),
            Some("Total Citations: 120 | h-index: 8")
        );
    }

    #[test]
    fn empty_interest_links_are_dropped() {
        let html = r#"<div id="gsc_prf_int"><a></a><a> Robotics </a></div>"#;
        let profile = parse_primary_profile(html).unwrap();
        assert_eq!(profile.interests, vec!["Robotics"]);
    }

    #[test]
    fn publications_limited_to_ten() {
        let rows: String = (1..=15)
            .map(|n| format!(r#"<a class="gsc_a_at">Paper {n}</a>"#))
            .collect();
        let profile = parse_primary_profile(&format!("<html><body>{rows}</body></html>")).unwrap();
        assert_eq!(profile.publications.len(), MAX_PUBLICATIONS);
        assert_eq!(profile.publications[9], "Paper 10");
    }

    #[test]
    fn unrelated_page_yields_empty_profile() {
        let profile = parse_primary_profile("<html><body><p>Please sign in</p></body></html>")
            .unwrap();
        assert_eq!(profile, PrimaryProfile::default());
    }

    #[test]
    fn visible_text_keeps_document_order() {
        let html = r#"
            <html><head><title>Ignored</title><script>var x = 1;</script></head>
            <body>
              <h2>Research</h2>
              <div>not selected</div>
              <p>Prof. X works on   distributed systems.</p>
              <ul><li>Consensus</li><li></li></ul>
              <h3>Teaching</h3>
            </body></html>
        "#;
        assert_eq!(
            extract_visible_text(html).unwrap(),
            "Research Prof. X works on distributed systems. Consensus Teaching"
        );
    }
}

//! Field and link extraction from an HTML page.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

lazy_static! {
    static ref SEL_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref SEL_SUMMARY: Selector = Selector::parse("summary").expect("valid selector");
    static ref SEL_BODY: Selector = Selector::parse("body").expect("valid selector");
    static ref SEL_META: Selector = Selector::parse("meta[name][content]").expect("valid selector");
    static ref SEL_A: Selector = Selector::parse("a[href]").expect("valid selector");
}

/// What a fetcher hands back for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub title: String,
    pub summary: String,
    pub date: Option<String>,
    pub body: String,
    /// Absolute http(s) links in document order, not yet normalized.
    pub links: Vec<String>,
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn meta_content(doc: &Html, name: &str) -> Option<String> {
    doc.select(&SEL_META)
        .find(|m| m.value().attr("name").is_some_and(|n| n.eq_ignore_ascii_case(name)))
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Parse `html`. Relative links are resolved against `base`; without a base
/// only absolute links survive.
pub fn extract(html: &str, base: Option<&Url>) -> Page {
    let doc = Html::parse_document(html);
    let title = doc.select(&SEL_TITLE).next().map(text_of).unwrap_or_default();
    let mut summary = doc.select(&SEL_SUMMARY).map(text_of).collect::<Vec<_>>().join(" ");
    if summary.is_empty() {
        summary = meta_content(&doc, "description").unwrap_or_default();
    }
    let body = doc.select(&SEL_BODY).next().map(text_of).unwrap_or_default();
    let date = meta_content(&doc, "date");

    let mut links = Vec::new();
    for a in doc.select(&SEL_A) {
        let Some(href) = a.value().attr("href") else { continue };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let resolved = match base {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        if let Ok(u) = resolved {
            if matches!(u.scheme(), "http" | "https") {
                links.push(u.to_string());
            }
        }
    }
    Page { title, summary, date, body, links }
}

//! HTML analyzer: charset decoding, stop-pattern/regex/email scans, and link
//! extraction. Scans run stop-pattern, then regex, then email, then link
//! collection, since the email-names window depends on line numbers from the
//! same decoded text the regex scan uses.

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::config::Config;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").unwrap());
static MAILTO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"mailto:\s*[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").unwrap()
});

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_CHARSET_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

pub struct RegexHit {
    pub line_number: usize,
    pub matched: String,
}

pub struct EmailHit {
    pub address: String,
    pub name: Option<String>,
}

pub struct Analysis {
    pub regex_hits: Vec<RegexHit>,
    pub email_hits: Vec<EmailHit>,
    pub links: Vec<String>,
    pub stop_pattern_hit: bool,
}

/// Returns `true` if `content_type` names HTML; analysis only runs for these.
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("text/html"))
}

/// Decodes `body` to text, preferring the HTML-declared `<meta charset>` over
/// the HTTP header charset when both are present.
pub fn decode_body(body: &[u8], http_header_charset: Option<&str>) -> String {
    let html_charset = sniff_meta_charset(body);
    let label = html_charset.as_deref().or(http_header_charset);
    let encoding = label
        .and_then(Encoding::for_label)
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    // A cheap first pass over raw bytes: most declared charsets are ASCII
    // anyway, and `scraper` needs valid UTF-8 input to build a DOM.
    let prefix_text = String::from_utf8_lossy(&body[..body.len().min(4096)]);
    let doc = Html::parse_document(&prefix_text);
    for meta in doc.select(&META_CHARSET_SELECTOR) {
        if let Some(charset) = meta.value().attr("charset") {
            return Some(charset.to_string());
        }
        if meta.value().attr("http-equiv").map(str::to_ascii_lowercase).as_deref()
            == Some("content-type")
        {
            if let Some(content) = meta.value().attr("content") {
                if let Some(idx) = content.to_ascii_lowercase().find("charset=") {
                    return Some(content[idx + "charset=".len()..].trim().to_string());
                }
            }
        }
    }
    None
}

/// Runs the stop-pattern, regex, and email scans, then (if `remaining_depth >
/// 0` and the stop pattern hasn't fired) collects link candidates.
pub fn analyze(
    config: &Config,
    text: &str,
    remaining_depth: u32,
    stop_pattern_already_reached: bool,
) -> Analysis {
    let lines: Vec<&str> = text.split('\n').collect();

    let stop_pattern_hit = !stop_pattern_already_reached
        && config
            .stop_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(text));

    let regex_hits = scan_regex(&config.search_regex, &lines);
    let email_hits = scan_emails(config, &lines);

    let links = if remaining_depth > 0 && !stop_pattern_hit && !stop_pattern_already_reached {
        extract_links(text)
    } else {
        Vec::new()
    };

    Analysis {
        regex_hits,
        email_hits,
        links,
        stop_pattern_hit,
    }
}

fn scan_regex(patterns: &[Regex], lines: &[&str]) -> Vec<RegexHit> {
    let mut hits = Vec::new();
    for pattern in patterns {
        for (line_number, line) in lines.iter().enumerate() {
            for m in pattern.find_iter(line) {
                hits.push(RegexHit {
                    line_number,
                    matched: m.as_str().to_string(),
                });
            }
        }
    }
    hits
}

fn scan_emails(config: &Config, lines: &[&str]) -> Vec<EmailHit> {
    if !config.search_emails && !config.search_mailtos {
        return Vec::new();
    }
    let pattern: &Regex = if config.search_mailtos {
        &MAILTO_RE
    } else {
        &EMAIL_RE
    };

    let last_line = lines.len().saturating_sub(1);
    let mut hits = Vec::new();
    for (line_number, line) in lines.iter().enumerate() {
        for m in pattern.find_iter(line) {
            let address = m
                .as_str()
                .strip_prefix("mailto:")
                .map(str::trim_start)
                .unwrap_or(m.as_str())
                .to_string();

            let name = config
                .email_names
                .as_ref()
                .and_then(|re| find_name(re, lines, line_number, last_line, &config.email_names_lines));

            hits.push(EmailHit {
                address: address.clone(),
                name,
            });
        }
    }
    hits
}

fn find_name(
    re: &Regex,
    lines: &[&str],
    current_line: usize,
    last_line: usize,
    window: &Option<crate::config::LineRange>,
) -> Option<String> {
    let (from, to) = match window {
        Some(w) => (
            clamp_line(current_line as i64 + w.start, last_line),
            clamp_line(current_line as i64 + w.end, last_line),
        ),
        None => (0, last_line),
    };
    let (from, to) = if from <= to { (from, to) } else { (to, from) };

    for line in &lines[from..=to] {
        if let Some(caps) = re.captures(line) {
            if let Some(group) = caps.get(1) {
                return Some(group.as_str().to_string());
            }
            return Some(caps.get(0).unwrap().as_str().to_string());
        }
    }
    None
}

fn clamp_line(idx: i64, last_line: usize) -> usize {
    idx.clamp(0, last_line as i64) as usize
}

fn extract_links(text: &str) -> Vec<String> {
    let doc = Html::parse_document(text);
    let mut links = Vec::new();
    for el in doc.select(&ANCHOR_SELECTOR) {
        if let Some(href) = el.value().attr("href") {
            links.push(href.to_string());
        }
    }
    for el in doc.select(&IMG_SELECTOR) {
        if let Some(src) = el.value().attr("src") {
            links.push(src.to_string());
        }
    }
    links
}

pub fn title_contains(text: &str, needle: &str) -> bool {
    let doc = Html::parse_document(text);
    doc.select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>())
        .is_some_and(|t| t.contains(needle))
}

//! Standalone SVG export of the session's spans.
//!
//! Each span becomes a `<g>` carrying its transform, holding the baseline
//! `<path>` and a `<text>`/`<textPath>` pair that lays the transcription along
//! it. Path data is written by [`crate::path::format_path`], so it parses back
//! with [`crate::path::parse_path`].

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::path::format_path;
use crate::store::{Span, SpanStore};

/// Render every span in draw order as an SVG document of `width` × `height`,
/// optionally over the page image at `href`.
#[must_use]
pub fn to_svg(store: &SpanStore, width: f64, height: f64, href: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    if let Some(href) = href {
        out.push_str(&format!("  <image href=\"{}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\"/>\n", escape(href)));
    }
    for span in store.sorted_spans() {
        push_span(&mut out, span);
    }
    out.push_str("</svg>\n");
    out
}

fn push_span(out: &mut String, span: &Span) {
    let script = span.script();
    let path_id = format!("span-{}", span.id);
    out.push_str(&format!("  <g transform=\"{}\">\n", span.transform.to_svg()));
    out.push_str(&format!("    <path id=\"{path_id}\" d=\"{}\" fill=\"none\"/>\n", format_path(&span.path)));
    out.push_str(&format!(
        "    <text textLength=\"{}\" lengthAdjust=\"spacingAndGlyphs\" direction=\"{}\" dominant-baseline=\"{}\" style=\"font: {}\">",
        span.text_length,
        script.direction.as_str(),
        script.baseline.as_str(),
        escape(&span.font),
    ));
    out.push_str(&format!(
        "<textPath href=\"#{path_id}\" lang=\"{}\">{}</textPath></text>\n",
        escape(&span.lang),
        escape(&span.text)
    ));
    out.push_str("  </g>\n");
}

/// Escape text for use in XML character data and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

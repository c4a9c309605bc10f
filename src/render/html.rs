//! HTML serialisation of a render tree.
//!
//! Ruby becomes `<ruby>` with `<rp>` fallbacks, highlights become a
//! `<span class="highlight">` carrying the set id, and lemma or unknown kinds
//! are transparent.

use super::RenderNode;
use crate::text::AnnotationData;

/// Serialise `nodes` as an HTML fragment
#[must_use]
pub fn to_html(nodes: &[RenderNode<'_>]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

fn write_nodes(nodes: &[RenderNode<'_>], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Char { ch, .. } => push_escaped_char(*ch, out),
            RenderNode::Break { .. } => out.push_str("<br/>"),
            RenderNode::Wrap {
                annotation,
                children,
                ..
            } => match &annotation.data {
                AnnotationData::Ruby(gloss) => {
                    out.push_str("<ruby>");
                    write_nodes(children, out);
                    out.push_str("<rp>(</rp><rt>");
                    out.push_str(&escape(gloss));
                    out.push_str("</rt><rp>)</rp></ruby>");
                }
                AnnotationData::Highlight(mark) => {
                    out.push_str("<span class=\"highlight\" data-set=\"");
                    out.push_str(&escape(&mark.set_id));
                    out.push_str("\">");
                    write_nodes(children, out);
                    out.push_str("</span>");
                }
                AnnotationData::Lemma(_) | AnnotationData::Custom { .. } => {
                    write_nodes(children, out);
                }
            },
        }
    }
}

fn push_escaped_char(ch: char, out: &mut String) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        other => out.push(other),
    }
}

/// Escape text for use in HTML content or a quoted attribute
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped_char(ch, &mut out);
    }
    out
}

//! Minimal HTML to markdown conversion for SharePoint rich text fields.
//!
//! Covers what post bodies actually contain: headings, paragraphs, line
//! breaks, lists, emphasis, links and images. Everything else is stripped to
//! its text content. Images become `![alt](src)` so the rewriter can find them.

use regex::{Captures, Regex};

use crate::contract::MarkupConverter;

pub struct HtmlConverter {
    heading: Regex,
    image: Regex,
    src_attr: Regex,
    alt_attr: Regex,
    link: Regex,
    strong: Regex,
    emphasis: Regex,
    code: Regex,
    line_break: Regex,
    block_open: Regex,
    block_close: Regex,
    list_item: Regex,
    any_tag: Regex,
    numeric_entity: Regex,
    blank_lines: Regex,
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static conversion pattern")
}

impl HtmlConverter {
    pub fn new() -> Self {
        Self {
            heading: pattern(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>"),
            image: pattern(r"(?is)<img\b[^>]*>"),
            src_attr: pattern(r#"(?is)\bsrc\s*=\s*["']([^"']*)["']"#),
            alt_attr: pattern(r#"(?is)\balt\s*=\s*["']([^"']*)["']"#),
            link: pattern(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#),
            strong: pattern(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>"),
            emphasis: pattern(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)\s*>"),
            code: pattern(r"(?is)<code\b[^>]*>(.*?)</code\s*>"),
            line_break: pattern(r"(?i)<br\s*/?>"),
            block_open: pattern(r"(?i)<(?:p|div|ul|ol|table|blockquote)\b[^>]*>"),
            block_close: pattern(r"(?i)</(?:p|div|ul|ol|table|blockquote|tr)\s*>"),
            list_item: pattern(r"(?i)<li\b[^>]*>"),
            any_tag: pattern(r"(?s)<[^>]+>"),
            numeric_entity: pattern(r"&#(x[0-9a-fA-F]+|[0-9]+);"),
            blank_lines: pattern(r"\n[ \t]*\n(?:[ \t]*\n)+"),
        }
    }

    fn images(&self, html: &str) -> String {
        self.image
            .replace_all(html, |caps: &Captures| {
                let tag = &caps[0];
                match self.src_attr.captures(tag) {
                    Some(src) => {
                        let alt = self
                            .alt_attr
                            .captures(tag)
                            .map(|a| a[1].to_string())
                            .unwrap_or_default();
                        format!("![{}]({})", alt, &src[1])
                    }
                    None => String::new(),
                }
            })
            .into_owned()
    }

    fn decode_entities(&self, text: &str) -> String {
        let decoded = self
            .numeric_entity
            .replace_all(text, |caps: &Captures| {
                let raw = &caps[1];
                let code = match raw.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => raw.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        decoded
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }
}

impl MarkupConverter for HtmlConverter {
    fn convert(&self, html: &str) -> String {
        let md = html.replace("\r\n", "\n");
        let md = self.images(&md);
        let md = self
            .link
            .replace_all(&md, |caps: &Captures| format!("[{}]({})", caps[2].trim(), &caps[1]))
            .into_owned();
        let md = self
            .heading
            .replace_all(&md, |caps: &Captures| {
                let level: usize = caps[1].parse().unwrap_or(1);
                format!("\n\n{} {}\n\n", "#".repeat(level), caps[2].trim())
            })
            .into_owned();
        let md = self.strong.replace_all(&md, "**$1**").into_owned();
        let md = self.emphasis.replace_all(&md, "*$1*").into_owned();
        let md = self.code.replace_all(&md, "`$1`").into_owned();
        let md = self.line_break.replace_all(&md, "\n").into_owned();
        let md = self.list_item.replace_all(&md, "\n- ").into_owned();
        let md = self.block_open.replace_all(&md, "\n\n").into_owned();
        let md = self.block_close.replace_all(&md, "\n").into_owned();
        let md = self.any_tag.replace_all(&md, "").into_owned();
        let md = self.decode_entities(&md);
        let md = self.blank_lines.replace_all(&md, "\n\n");
        md.trim().to_string()
    }
}

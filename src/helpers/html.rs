//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_DIAL_CHARS: Regex = Regex::new(r"[^0-9+]").unwrap();
}

/// Page metadata handed through to the document head
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub og_image: Option<String>,
    pub noindex: bool,
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: Option<&str>, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy">"#,
        html_escape(src),
        html_escape(alt.unwrap_or("")),
        class_attr
    )
}

/// `tel:` link target for a display phone number
///
/// # Examples
/// ```ignore
/// tel_href("(555) 014-2290") // -> "tel:5550142290"
/// ```
pub fn tel_href(phone: &str) -> String {
    format!("tel:{}", NON_DIAL_CHARS.replace_all(phone, ""))
}

/// A phone call button
pub fn phone_link(phone: &str, text: &str, class: &str) -> String {
    format!(
        r#"<a class="{}" href="{}">{}</a>"#,
        html_escape(class),
        tel_href(phone),
        html_escape(text)
    )
}

/// Generate the SEO and Open Graph tags for a page
pub fn meta_tags(meta: &SeoMeta, site_name: &str) -> String {
    let mut tags = vec![
        format!(r#"<meta property="og:type" content="website">"#),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(&meta.title)
        ),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
        tags.push(format!(
            r#"<meta name="description" content="{}">"#,
            html_escape(description)
        ));
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    if let Some(canonical) = &meta.canonical {
        tags.push(format!(
            r#"<link rel="canonical" href="{}">"#,
            html_escape(canonical)
        ));
        tags.push(format!(
            r#"<meta property="og:url" content="{}">"#,
            html_escape(canonical)
        ));
    }

    if let Some(img) = &meta.og_image {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(img)
        ));
    }

    if meta.noindex {
        tags.push(r#"<meta name="robots" content="noindex, nofollow">"#.to_string());
    }

    tags.join("\n")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_tag_escapes() {
        let tag = image_tag("/a.jpg", Some(r#"Say "hi""#), None);
        assert!(tag.contains(r#"alt="Say &quot;hi&quot;""#));
    }

    #[test]
    fn test_tel_href() {
        assert_eq!(tel_href("(555) 014-2290"), "tel:5550142290");
        assert_eq!(tel_href("+1 555 014 2290"), "tel:+15550142290");
    }

    #[test]
    fn test_meta_tags() {
        let meta = SeoMeta {
            title: "Contact & Directions".to_string(),
            description: Some("Visit us".to_string()),
            canonical: Some("https://example.com/contact/".to_string()),
            og_image: None,
            noindex: true,
        };
        let html = meta_tags(&meta, "Firm");
        assert!(html.contains("Contact &amp; Directions"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/contact/">"#));
        assert!(html.contains("noindex"));
        assert!(!html.contains("og:image"));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }
}

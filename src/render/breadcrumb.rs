//! Breadcrumb trail for the standard shell

use serde::Serialize;

use crate::helpers::{normalize_path, title_case_segment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    /// `None` for the current page
    pub href: Option<String>,
}

/// Home, one crumb per intermediate path segment, then the page title
///
/// # Examples
/// ```ignore
/// breadcrumbs("/a/b/c/", "C Page", "Home")
/// // -> Home (/) > A (/a/) > B (/a/b/) > C Page
/// ```
pub fn breadcrumbs(url_path: &str, title: &str, home_label: &str) -> Vec<Crumb> {
    let path = normalize_path(url_path);
    if path == "/" {
        return vec![Crumb {
            label: home_label.to_string(),
            href: None,
        }];
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut crumbs = vec![Crumb {
        label: home_label.to_string(),
        href: Some("/".to_string()),
    }];

    let mut href = String::from("/");
    for segment in &segments[..segments.len() - 1] {
        href.push_str(segment);
        href.push('/');
        crumbs.push(Crumb {
            label: title_case_segment(segment),
            href: Some(href.clone()),
        });
    }

    crumbs.push(Crumb {
        label: title.to_string(),
        href: None,
    });
    crumbs
}

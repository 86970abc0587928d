//! Server-rendered pages
//!
//! Templates are compiled in; only `{{title}}`, `{{server_name}}` and
//! `{{backend}}` are substituted. The contact list page fetches its data from
//! `/contacts` in the browser.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::http::{self, cache};

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
const CONTACT_LIST_TEMPLATE: &str = include_str!("templates/contacts.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    ContactList,
}

impl Page {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "/index.html" => Some(Self::Index),
            "/contact-list" => Some(Self::ContactList),
            _ => None,
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::Index => INDEX_TEMPLATE,
            Self::ContactList => CONTACT_LIST_TEMPLATE,
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Index => "Contact Book",
            Self::ContactList => "Contacts",
        }
    }
}

/// Replace each `{{key}}` with its value; unknown placeholders are left as-is.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{key}}}}}"), value)
    })
}

pub fn serve(
    page: Page,
    state: &AppState,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let html = render(
        page.template(),
        &[
            ("title", page.title()),
            ("server_name", &state.config.http.server_name),
            ("backend", state.store.backend()),
        ],
    );

    let etag = cache::generate_etag(html.as_bytes());
    if cache::etag_matches(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }
    http::build_html_response(html, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryContactStore;
    use hyper::StatusCode;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Config::default(), Arc::new(MemoryContactStore::new()))
    }

    #[test]
    fn test_render_substitutes_known_keys() {
        let out = render("<h1>{{title}}</h1>{{other}}", &[("title", "Hi")]);
        assert_eq!(out, "<h1>Hi</h1>{{other}}");
    }

    #[test]
    fn test_templates_have_no_leftover_placeholders() {
        let state = state();
        for page in [Page::Index, Page::ContactList] {
            let resp = serve(page, &state, None, false);
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let html = render(
            INDEX_TEMPLATE,
            &[("title", "t"), ("server_name", "s"), ("backend", "memory")],
        );
        assert!(!html.contains("{{"), "unrendered placeholder in index");
        let html = render(
            CONTACT_LIST_TEMPLATE,
            &[("title", "t"), ("server_name", "s"), ("backend", "memory")],
        );
        assert!(!html.contains("{{"), "unrendered placeholder in contact list");
    }

    #[test]
    fn test_matching_etag_is_304() {
        let state = state();
        let first = serve(Page::Index, &state, None, false);
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let second = serve(Page::Index, &state, Some(&etag), false);
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_contact_list_page_edits_and_omits_blank_id() {
        let html = render(
            CONTACT_LIST_TEMPLATE,
            &[("title", "t"), ("server_name", "s"), ("backend", "sqlite")],
        );
        assert!(html.contains(r#"<form id="edit-contact" hidden>"#));
        assert!(html.contains("method: 'PUT'"));
        assert!(html.contains("if (data.id === '') delete data.id;"));
    }
}

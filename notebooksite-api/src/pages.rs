//! Maud layouts for every page of the site.
//!
//! Rendered notebooks are already HTML and are inserted with `PreEscaped`;
//! everything else goes through maud's escaping.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use notebooksite_store::NotebookEntry;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::BTreeMap;

const SITE_TITLE: &str = "Notebooks";

// Characters that cannot appear raw in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Link to a notebook's page, with the name percent-encoded.
pub fn notebook_href(name: &str) -> String {
    format!("/notebooks/{}", utf8_percent_encode(name, PATH_SEGMENT))
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (SITE_TITLE) }
            }
            body {
                nav {
                    a href="/" { "Home" } " "
                    a href="/notebooks" { "Notebooks" } " "
                    a href="/projects" { "Projects" } " "
                    a href="/about" { "About" }
                }
                main { (body) }
            }
        }
    }
}

/// Latest notebooks, in the order given.
pub fn home(articles: &[String]) -> Markup {
    layout(
        "Home",
        html! {
            @if articles.is_empty() {
                p { "Nothing published yet." }
            }
            @for article in articles {
                article class="notebook" { (PreEscaped(article)) }
            }
        },
    )
}

/// Every notebook, newest year first.
pub fn notebooks(by_year: &BTreeMap<i32, Vec<NotebookEntry>>) -> Markup {
    layout(
        "All notebooks",
        html! {
            h1 { "All notebooks" }
            @for (year, entries) in by_year.iter().rev() {
                section class="year" {
                    h2 { (year) }
                    ul {
                        @for entry in entries {
                            li { a href=(notebook_href(&entry.name)) { (entry.name) } }
                        }
                    }
                }
            }
        },
    )
}

pub fn notebook(name: &str, content: &str) -> Markup {
    layout(
        name,
        html! {
            article class="notebook" data-name=(name) { (PreEscaped(content)) }
        },
    )
}

pub fn about() -> Markup {
    layout(
        "About",
        html! {
            h1 { "About" }
            p { "Notes and experiments, written as notebooks and published as they change." }
        },
    )
}

pub fn projects() -> Markup {
    layout(
        "Projects",
        html! {
            h1 { "Projects" }
            p { "Source code for the projects discussed here lives alongside the notebooks." }
        },
    )
}

pub fn not_found() -> Markup {
    layout(
        "Not found",
        html! {
            h1 { "Not found" }
            p { "There is no page here. " a href="/notebooks" { "Browse all notebooks" } "." }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notebook_content_is_not_escaped_but_name_is() {
        let page = notebook("<b>.ipynb", "<div id=\"cell\">1 + 1</div>").into_string();
        assert!(page.contains("<div id=\"cell\">1 + 1</div>"));
        assert!(page.contains("&lt;b&gt;.ipynb"));
        assert!(!page.contains("<b>.ipynb"));
    }

    #[test]
    fn years_are_listed_newest_first() {
        let mut by_year = BTreeMap::new();
        by_year.insert(2021, vec![NotebookEntry::new("old.ipynb", 1_614_600_000)]);
        by_year.insert(2022, vec![NotebookEntry::new("new.ipynb", 1_656_676_800)]);

        let page = notebooks(&by_year).into_string();

        let newer = page.find("2022").unwrap();
        let older = page.find("2021").unwrap();
        assert!(newer < older);
        assert!(page.contains("href=\"/notebooks/new.ipynb\""));
    }

    #[test]
    fn hrefs_encode_reserved_characters() {
        assert_eq!(notebook_href("intro.ipynb"), "/notebooks/intro.ipynb");
        assert_eq!(notebook_href("c#1.ipynb"), "/notebooks/c%231.ipynb");
        assert_eq!(notebook_href("what?.ipynb"), "/notebooks/what%3F.ipynb");
        assert_eq!(notebook_href("50% off.ipynb"), "/notebooks/50%25%20off.ipynb");
    }

    #[test]
    fn empty_home_page() {
        assert!(home(&[]).into_string().contains("Nothing published yet."));
    }
}

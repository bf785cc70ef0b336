use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    static ref SEL_HEADING: Selector =
        Selector::parse("title, h1, h2, h3").expect("valid selector");
    static ref SEL_EMPHASIS: Selector = Selector::parse("strong, b").expect("valid selector");
}

/// Text pulled out of one HTML page: the full visible text plus the tag
/// classes that earn term-frequency bonuses at indexing time.
#[derive(Debug)]
pub struct PageText {
    pub body: String,
    pub headings: String,
    pub emphasis: String,
}

/// Extract the page text and the title/h1/h2/h3 and strong/b field text
/// from raw markup. Field text is trimmed per tag and space-joined.
pub fn extract(html: &str) -> PageText {
    let doc = Html::parse_document(html);
    let body = doc
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    PageText {
        body,
        headings: select_text(&doc, &SEL_HEADING),
        emphasis: select_text(&doc, &SEL_EMPHASIS),
    }
}

fn select_text(doc: &Html, sel: &Selector) -> String {
    doc.select(sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fields_from_body() {
        let html = "<html><head><title>Cats</title></head>\
                    <body><h1>About cats</h1><p>A <b>cat</b> sat.</p></body></html>";
        let page = extract(html);
        assert_eq!(page.headings, "Cats About cats");
        assert_eq!(page.emphasis, "cat");
        assert!(page.body.contains("Cats"));
        assert!(page.body.contains("sat."));
    }

    #[test]
    fn missing_tags_yield_empty_fields() {
        let page = extract("<p>plain text</p>");
        assert_eq!(page.headings, "");
        assert_eq!(page.emphasis, "");
        assert_eq!(page.body, "plain text");
    }
}

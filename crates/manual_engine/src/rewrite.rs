use ego_tree::NodeRef;
use manual_core::ExtractionFailure;
use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serializes the children of `root` into a fresh string, rewriting every
/// `<a href>` and `<img src>` to an absolute URL against `base`.
///
/// The parsed document is only read, so the source tree stays untouched.
pub(crate) fn absolutized_inner_html(
    root: ElementRef<'_>,
    base: &Url,
) -> Result<String, ExtractionFailure> {
    let mut writer = MarkupWriter::new(base);
    for child in root.children() {
        writer.visit_node(child, is_raw_text(root.value().name()))?;
    }
    Ok(writer.out)
}

struct MarkupWriter<'b> {
    out: String,
    base: &'b Url,
}

impl<'b> MarkupWriter<'b> {
    fn new(base: &'b Url) -> Self {
        Self {
            out: String::new(),
            base,
        }
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>, raw_text: bool) -> Result<(), ExtractionFailure> {
        match node.value() {
            Node::Text(text) => {
                if raw_text {
                    self.out.push_str(text);
                } else {
                    push_escaped(&mut self.out, text, false);
                }
            }
            Node::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element)?;
                }
            }
            _ => {
                for child in node.children() {
                    self.visit_node(child, raw_text)?;
                }
            }
        }
        Ok(())
    }

    fn visit_element(&mut self, element: ElementRef<'_>) -> Result<(), ExtractionFailure> {
        let name = element.value().name();
        let rewritten = match name {
            "a" => Some("href"),
            "img" => Some("src"),
            _ => None,
        };

        self.out.push('<');
        self.out.push_str(name);
        for (attr, value) in element.value().attrs() {
            self.out.push(' ');
            self.out.push_str(attr);
            self.out.push_str("=\"");
            if rewritten == Some(attr) && !value.is_empty() {
                let absolute = self.resolve(value)?;
                push_escaped(&mut self.out, absolute.as_str(), true);
            } else {
                push_escaped(&mut self.out, value, true);
            }
            self.out.push('"');
        }
        self.out.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return Ok(());
        }

        let raw_text = is_raw_text(name);
        for child in element.children() {
            self.visit_node(child, raw_text)?;
        }

        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        Ok(())
    }

    fn resolve(&self, reference: &str) -> Result<Url, ExtractionFailure> {
        self.base.join(reference).map_err(|err| {
            ExtractionFailure::unexpected(format!("cannot resolve link {reference:?}: {err}"))
                .with_trace(format!("base: {}", self.base))
        })
    }
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

fn push_escaped(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use url::Url;

    use super::absolutized_inner_html;

    fn rewrite(fragment: &str, base: &str) -> String {
        let html = Html::parse_document(&format!("<html><body><div id='root'>{fragment}</div></body></html>"));
        let selector = Selector::parse("#root").unwrap();
        let root = html.select(&selector).next().unwrap();
        absolutized_inner_html(root, &Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn relative_links_and_images_become_absolute() {
        let out = rewrite(
            r#"<p><a href="../guide">Guide</a><img src="/img/a.png" alt="A"></p>"#,
            "https://kb.example.com/docs/page/",
        );
        assert!(out.starts_with(r#"<p><a href="https://kb.example.com/docs/guide">Guide</a><img "#));
        assert!(out.contains(r#"src="https://kb.example.com/img/a.png""#));
        assert!(out.contains(r#"alt="A""#));
        assert!(out.ends_with("></p>"));
    }

    #[test]
    fn other_attributes_and_text_are_escaped_not_rewritten() {
        let out = rewrite(
            r#"<link href="x.css"><span title="a&quot;b">1 &lt; 2 &amp; 3</span>"#,
            "https://kb.example.com/",
        );
        assert!(out.contains(r#"title="a&quot;b""#));
        assert!(out.contains("1 &lt; 2 &amp; 3"));
        assert!(!out.contains("https://kb.example.com/x.css"));
    }

    #[test]
    fn fragments_and_empty_hrefs() {
        let out = rewrite(
            r##"<a href="#top">Top</a><a href="">Empty</a>"##,
            "https://kb.example.com/a/",
        );
        assert_eq!(
            out,
            r##"<a href="https://kb.example.com/a/#top">Top</a><a href="">Empty</a>"##
        );
    }

    #[test]
    fn code_blocks_keep_their_markup() {
        let out = rewrite(
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre><br>",
            "https://kb.example.com/",
        );
        assert_eq!(
            out,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre><br>"
        );
    }
}

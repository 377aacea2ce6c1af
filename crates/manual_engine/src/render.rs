use std::borrow::Cow;

use manual_core::ArticleRecord;

pub const MANUAL_TITLE: &str = "Manual - Knowledge Base";
pub const MANUAL_FILENAME: &str = "manual.html";
pub const MANUAL_CONTENT_TYPE: &str = "text/html";

const HIGHLIGHT_JS_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/styles/default.min.css";
const HIGHLIGHT_JS_SCRIPT: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/highlight.min.js";

const LAYOUT_CSS: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif; line-height: 1.6; margin: 0; padding: 0; background-color: #f8f9fa; color: #212529; }
        .container { max-width: 960px; margin: 20px auto; padding: 30px; background-color: #fff; border: 1px solid #dee2e6; border-radius: 8px; }
        h1, h2 { color: #0056b3; border-bottom: 2px solid #dee2e6; padding-bottom: 10px; }
        h1 { text-align: center; }
        article { margin-top: 40px; padding-top: 20px; border-top: 1px solid #ccc; }
        #index ul { list-style-type: none; padding-left: 0; }
        #index a { text-decoration: none; color: #0056b3; font-size: 1.1em; }
        #index a:hover { text-decoration: underline; }
        img { max-width: 100%; height: auto; border-radius: 4px; border: 1px solid #ddd; }
        a { color: #0066cc; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; margin-bottom: 20px; }
        th, td { border: 1px solid #dee2e6; padding: 12px; text-align: left; }
        th { background-color: #f8f9fa; font-weight: bold; }
        tr:nth-child(even) { background-color: #f8f9fa; }
"#;

// Pygments "default" style scoped to `.codehilite`.
const HIGHLIGHT_CSS: &str = r#"
        pre { line-height: 125%; }
        td.linenos .normal { color: inherit; background-color: transparent; padding-left: 5px; padding-right: 5px; }
        span.linenos { color: inherit; background-color: transparent; padding-left: 5px; padding-right: 5px; }
        td.linenos .special { color: #000000; background-color: #ffffc0; padding-left: 5px; padding-right: 5px; }
        span.linenos.special { color: #000000; background-color: #ffffc0; padding-left: 5px; padding-right: 5px; }
        .codehilite .hll { background-color: #ffffcc }
        .codehilite { background: #f8f8f8; }
        .codehilite .c { color: #3D7B7B; font-style: italic }
        .codehilite .err { border: 1px solid #F00 }
        .codehilite .k { color: #008000; font-weight: bold }
        .codehilite .o { color: #666 }
        .codehilite .ch { color: #3D7B7B; font-style: italic }
        .codehilite .cm { color: #3D7B7B; font-style: italic }
        .codehilite .cp { color: #9C6500 }
        .codehilite .cpf { color: #3D7B7B; font-style: italic }
        .codehilite .c1 { color: #3D7B7B; font-style: italic }
        .codehilite .cs { color: #3D7B7B; font-style: italic }
        .codehilite .gd { color: #A00000 }
        .codehilite .ge { font-style: italic }
        .codehilite .ges { font-weight: bold; font-style: italic }
        .codehilite .gr { color: #E40000 }
        .codehilite .gh { color: #000080; font-weight: bold }
        .codehilite .gi { color: #008400 }
        .codehilite .go { color: #717171 }
        .codehilite .gp { color: #000080; font-weight: bold }
        .codehilite .gs { font-weight: bold }
        .codehilite .gu { color: #800080; font-weight: bold }
        .codehilite .gt { color: #04D }
        .codehilite .kc { color: #008000; font-weight: bold }
        .codehilite .kd { color: #008000; font-weight: bold }
        .codehilite .kn { color: #008000; font-weight: bold }
        .codehilite .kp { color: #008000 }
        .codehilite .kr { color: #008000; font-weight: bold }
        .codehilite .kt { color: #B00040 }
        .codehilite .m { color: #666 }
        .codehilite .s { color: #BA2121 }
        .codehilite .na { color: #687822 }
        .codehilite .nb { color: #008000 }
        .codehilite .nc { color: #00F; font-weight: bold }
        .codehilite .no { color: #800 }
        .codehilite .nd { color: #A2F }
        .codehilite .ni { color: #717171; font-weight: bold }
        .codehilite .ne { color: #CB3F38; font-weight: bold }
        .codehilite .nf { color: #00F }
        .codehilite .nl { color: #767600 }
        .codehilite .nn { color: #00F; font-weight: bold }
        .codehilite .nt { color: #008000; font-weight: bold }
        .codehilite .nv { color: #19177C }
        .codehilite .ow { color: #A2F; font-weight: bold }
        .codehilite .w { color: #BBB }
        .codehilite .mb { color: #666 }
        .codehilite .mf { color: #666 }
        .codehilite .mh { color: #666 }
        .codehilite .mi { color: #666 }
        .codehilite .mo { color: #666 }
        .codehilite .sa { color: #BA2121 }
        .codehilite .sb { color: #BA2121 }
        .codehilite .sc { color: #BA2121 }
        .codehilite .dl { color: #BA2121 }
        .codehilite .sd { color: #BA2121; font-style: italic }
        .codehilite .s2 { color: #BA2121 }
        .codehilite .se { color: #AA5D1F; font-weight: bold }
        .codehilite .sh { color: #BA2121 }
        .codehilite .si { color: #A45A77; font-weight: bold }
        .codehilite .sx { color: #008000 }
        .codehilite .sr { color: #A45A77 }
        .codehilite .s1 { color: #BA2121 }
        .codehilite .ss { color: #19177C }
        .codehilite .bp { color: #008000 }
        .codehilite .fm { color: #00F }
        .codehilite .vc { color: #19177C }
        .codehilite .vg { color: #19177C }
        .codehilite .vi { color: #19177C }
        .codehilite .vm { color: #19177C }
        .codehilite .il { color: #666 }
        .codehilite {
            border: 1px solid #ccc; border-radius: 4px; padding: 10px; overflow-x: auto; margin: 1.5em 0;
            white-space: pre-wrap; word-break: break-all;
        }
        .codehilite strong { font-weight: bold !important; color: #CD0000 !important; }
"#;

/// The single point where stored titles and captured markup enter the
/// document.
///
/// [`Verbatim`] inserts them unchanged, so markup in a title or fragment is
/// interpreted as markup. A sanitizing filter can replace it without touching
/// the layout code.
pub trait FragmentFilter: Send + Sync {
    fn filter<'a>(&self, fragment: &'a str) -> Cow<'a, str>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl FragmentFilter for Verbatim {
    fn filter<'a>(&self, fragment: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(fragment)
    }
}

/// Builds the manual document. Output depends only on the article list.
#[derive(Debug, Default, Clone)]
pub struct ManualRenderer<F = Verbatim> {
    filter: F,
}

impl ManualRenderer<Verbatim> {
    pub fn new() -> Self {
        Self { filter: Verbatim }
    }
}

impl<F: FragmentFilter> ManualRenderer<F> {
    pub fn with_filter(filter: F) -> Self {
        Self { filter }
    }

    pub fn render(&self, articles: &[ArticleRecord]) -> String {
        let mut html = self.header(articles);
        for (index, article) in articles.iter().enumerate() {
            html.push_str(&self.article_section(article, index));
        }
        html.push_str(&self.footer());
        html
    }

    /// Document head, page heading and the index of every article.
    pub fn header(&self, articles: &[ArticleRecord]) -> String {
        let mut html = format!(
            "<!DOCTYPE html>\n<html lang='en'>\n<head>\n  <meta charset='UTF-8'>\n  \
             <title>{MANUAL_TITLE}</title>\n  \
             <link rel=\"stylesheet\" href=\"{HIGHLIGHT_JS_CSS}\">\n  \
             <style>{LAYOUT_CSS}{HIGHLIGHT_CSS}    </style>\n</head>\n<body>\n\
             <div class='container'>\n  <h1>{MANUAL_TITLE}</h1>\n  \
             <section id='index'>\n    <h2>Index</h2>\n    <ul>"
        );
        for (index, article) in articles.iter().enumerate() {
            html.push_str(&format!(
                "<li><a href='#{anchor}'>{title}</a></li>",
                anchor = anchor(index),
                title = self.filter.filter(&article.title),
            ));
        }
        html.push_str("</ul></section>");
        html
    }

    pub fn article_section(&self, article: &ArticleRecord, index: usize) -> String {
        format!(
            "<article id='{anchor}'><h2>{title}</h2>{content}</article>",
            anchor = anchor(index),
            title = self.filter.filter(&article.title),
            content = self.filter.filter(&article.html_content),
        )
    }

    pub fn footer(&self) -> String {
        format!(
            "\n</div>\n<script src=\"{HIGHLIGHT_JS_SCRIPT}\"></script>\n\
             <script>hljs.highlightAll();</script>\n</body>\n</html>"
        )
    }
}

/// Renders `articles` with [`Verbatim`] interpolation.
pub fn render(articles: &[ArticleRecord]) -> String {
    ManualRenderer::new().render(articles)
}

pub fn anchor(index: usize) -> String {
    format!("article-{index}")
}

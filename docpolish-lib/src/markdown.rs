//! Renders Markdown to a complete, styled HTML document with syntax
//! highlighted code blocks.

use crate::parser::serialize::escape_text;
use log::warn;
use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Default readability styling for the generated document.
const DEFAULT_STYLE: &str = r#"
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 0 auto; padding: 20px; }
pre { background-color: #1a1a35; color: #f8f8f2; padding: 5px; border-radius: 5px; overflow-x: auto; }
code { font-family: "Courier New", Courier, monospace; }
img { max-width: 100%; height: auto; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px; }
th { background-color: #f2f2f2; }
.highlight { padding: 5px; border-radius: 5px; margin: 5px 0; }
.empty-code-block { background-color: #1a1a35; color: #f8f8f2; padding: 5px; border-radius: 5px; margin: 5px 0; font-family: monospace; }
.highlight-error { background-color: #1a1a35; color: #f08080; padding: 5px; border-radius: 5px; margin: 5px 0; font-family: monospace; }
"#;

#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Highlighting theme name from syntect's default theme set.
    pub theme: String,
    /// Extra stylesheet text embedded verbatim into the document head.
    pub extra_css: Option<String>,
    /// Title used when the document has no top-level heading.
    pub fallback_title: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions {
            theme: DEFAULT_THEME.to_string(),
            extra_css: None,
            fallback_title: "Document".to_string(),
        }
    }
}

/// Names of the available highlighting themes, sorted.
pub fn available_themes() -> Vec<String> {
    ThemeSet::load_defaults().themes.keys().cloned().collect()
}

/// Renders Markdown into a full HTML document: body from pulldown-cmark
/// (tables, strikethrough and task lists enabled), fenced code blocks
/// highlighted with syntect, title taken from the first top-level heading.
pub fn render_markdown(markdown: &str, options: &MarkdownOptions) -> String {
    let syntaxes = SyntaxSet::load_defaults_newlines();
    let themes = ThemeSet::load_defaults();
    let theme = match themes.themes.get(&options.theme) {
        Some(theme) => theme,
        None => {
            warn!(
                "unknown highlighting theme {:?}, falling back to {}",
                options.theme, DEFAULT_THEME
            );
            &themes.themes[DEFAULT_THEME]
        }
    };

    let mut parser_options = Options::empty();
    parser_options.insert(Options::ENABLE_TABLES);
    parser_options.insert(Options::ENABLE_STRIKETHROUGH);
    parser_options.insert(Options::ENABLE_TASKLISTS);

    let mut events: Vec<Event> = Vec::new();
    let mut code_lang: Option<String> = None;
    let mut code_buf = String::new();
    let mut title: Option<String> = None;
    let mut capturing_title = false;

    for event in Parser::new_ext(markdown, parser_options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_lang = Some(match kind {
                    CodeBlockKind::Fenced(lang) => lang
                        .split_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                });
                code_buf.clear();
            }
            Event::Text(ref text) if code_lang.is_some() => {
                code_buf.push_str(text);
            }
            Event::End(TagEnd::CodeBlock) => {
                let lang = code_lang.take().unwrap_or_default();
                let html = highlight_code(&code_buf, &lang, &syntaxes, theme);
                events.push(Event::Html(html.into()));
            }
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title.is_none() => {
                capturing_title = true;
                title = Some(String::new());
                events.push(event);
            }
            Event::Text(ref text) if capturing_title => {
                if let Some(ref mut t) = title {
                    t.push_str(text);
                }
                events.push(event.clone());
            }
            Event::Code(ref code) if capturing_title => {
                if let Some(ref mut t) = title {
                    t.push_str(code);
                }
                events.push(event.clone());
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if capturing_title => {
                capturing_title = false;
                events.push(event);
            }
            other => events.push(other),
        }
    }

    let mut body = String::new();
    html::push_html(&mut body, events.into_iter());

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| options.fallback_title.clone());

    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("    <meta charset=\"UTF-8\">\n");
    doc.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    doc.push_str(&format!("    <title>{}</title>\n", escape_text(&title)));
    doc.push_str("    <style>");
    doc.push_str(DEFAULT_STYLE);
    doc.push_str("</style>\n");
    if let Some(ref css) = options.extra_css {
        doc.push_str("    <style>\n");
        doc.push_str(css);
        doc.push_str("\n    </style>\n");
    }
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&body);
    doc.push_str("</body>\n</html>\n");
    doc
}

/// Highlights one fenced code block; unknown languages fall back to plain
/// text, highlighting failures to an escaped `<pre>`.
fn highlight_code(code: &str, lang: &str, syntaxes: &SyntaxSet, theme: &Theme) -> String {
    if code.trim().is_empty() {
        return format!(
            "<pre class=\"empty-code-block\">{}</pre>\n",
            escape_text(code)
        );
    }

    let syntax = normalize_language(lang)
        .and_then(|token| syntaxes.find_syntax_by_token(token))
        .unwrap_or_else(|| {
            if !lang.is_empty() {
                warn!("no syntax for language {:?}, using plain text", lang);
            }
            syntaxes.find_syntax_plain_text()
        });

    let css_class = if lang.is_empty() { "text" } else { lang };
    match highlighted_html_for_string(code, syntaxes, syntax, theme) {
        Ok(highlighted) => format!(
            "<div class=\"highlight language-{}\">{}</div>\n",
            css_class, highlighted
        ),
        Err(err) => {
            warn!("highlighting failed: {}", err);
            format!(
                "<pre class=\"highlight-error\">{}</pre>\n",
                escape_text(code)
            )
        }
    }
}

/// Maps common language aliases onto tokens syntect knows.
fn normalize_language(lang: &str) -> Option<&str> {
    if lang.is_empty() {
        return None;
    }
    match lang.to_ascii_lowercase().as_str() {
        "js" | "javascript" | "mongodb" => Some("js"),
        "py" | "python" => Some("py"),
        "sh" | "bash" | "shell" => Some("bash"),
        _ => Some(lang),
    }
}

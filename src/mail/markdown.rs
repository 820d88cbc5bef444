use pulldown_cmark::{Options, Parser, html};

const EMAIL_STYLE: &str = "body{margin:0;padding:0;background:#ffffff;}\
.email-body{max-width:640px;margin:0 auto;padding:16px;\
font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Helvetica,Arial,sans-serif;\
font-size:15px;line-height:1.5;color:#1f2328;}";

/// Renders a markdown body into a self-contained HTML email document.
pub fn markdown_to_html(subject: &str, markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);

    let title = html_escape::encode_text(subject.trim());

    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n<style>{EMAIL_STYLE}</style>\n</head>\n<body>\n\
<div class=\"email-body\">\n{rendered}</div>\n</body>\n</html>\n"
    )
}

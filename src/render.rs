//! HTML rendering for the email digest.
//!
//! Everything here is a pure function of its input: the same results always
//! render to the same bytes.

use crate::search::SearchResult;

const TABLE_OPEN: &str = r#"<table border="1" cellpadding="5" cellspacing="0">"#;

/// Render the two result tables that make up the email body.
pub fn email_html(qa: &[SearchResult], social: &[SearchResult]) -> String {
    let mut html = String::new();

    html.push_str("<h2>Search Results</h2>\n<h3>StackOverflow Questions</h3>\n");
    html.push_str(TABLE_OPEN);
    html.push_str("\n<thead><tr><th>Title</th><th>Tags</th><th>Owner</th><th>Link</th></tr></thead>\n<tbody>\n");
    for item in qa {
        push_qa_row(&mut html, item);
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str("<h3>Reddit Posts</h3>\n");
    html.push_str(TABLE_OPEN);
    html.push_str("\n<thead><tr><th>Title</th><th>Subreddit</th><th>Author</th><th>Link</th></tr></thead>\n<tbody>\n");
    for post in social {
        push_social_row(&mut html, post);
    }
    html.push_str("</tbody>\n</table>\n");

    html
}

fn push_qa_row(html: &mut String, item: &SearchResult) {
    let tags = if item.tags.is_empty() {
        "No tags".to_string()
    } else {
        html_escape(&item.tags.join(", "))
    };

    let owner = match &item.author_url {
        Some(link) => format!(r#"<a href="{}">{}</a>"#, html_escape(link), html_escape(&item.author)),
        None => html_escape(&item.author),
    };

    html.push_str(&format!(
        "<tr><td>{title}</td><td>{tags}</td><td>{owner}</td><td><a href=\"{link}\">View Question</a></td></tr>\n",
        title = html_escape(&item.title),
        link = html_escape(&item.url),
    ));
}

fn push_social_row(html: &mut String, post: &SearchResult) {
    html.push_str(&format!(
        "<tr><td>{title}</td><td>{subreddit}</td><td>{author}</td><td><a href=\"{link}\">View Post</a></td></tr>\n",
        title = html_escape(&post.title),
        subreddit = html_escape(&post.community_label),
        author = html_escape(&post.author),
        link = html_escape(&post.url),
    ));
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

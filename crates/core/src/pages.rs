//! HTML rendering for the landing page and the router's own error
//! responses. Presentation only: callers pass structured input and relay
//! the returned markup as-is.

use crate::registry::Project;
use axum::{http::StatusCode, response::Html};
use std::fmt::Write;

const LANDING_STYLES: &str = r#"
    :root { --bg: #0a0a0a; --fg: #ededed; --accent: #00d4ff; --card-bg: rgba(26, 26, 26, 0.5); --border: #2a2a2a; }
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: var(--bg); color: var(--fg); line-height: 1.6; min-height: 100vh; }
    .container { max-width: 1000px; margin: 0 auto; padding: 2rem; }
    header { margin-bottom: 3rem; text-align: center; }
    h1 { font-size: 3rem; font-weight: 700; margin-bottom: 1rem; background: linear-gradient(110deg, var(--accent) 30%, #00ffaa 70%); -webkit-background-clip: text; -webkit-text-fill-color: transparent; background-clip: text; display: inline-block; }
    .projects { display: grid; grid-template-columns: 1fr; gap: 1.5rem; margin: 3rem auto 0; max-width: 600px; }
    .projects li { list-style: none; background: var(--card-bg); border: 1px solid rgba(255, 255, 255, 0.05); border-radius: 16px; overflow: hidden; transition: transform 0.2s ease, border-color 0.2s ease; }
    .projects li:hover { transform: translateY(-2px); border-color: rgba(0, 212, 255, 0.3); }
    .projects a { display: block; padding: 2rem; text-decoration: none; color: inherit; }
    .projects h3 { margin-bottom: 0.5rem; font-size: 1.5rem; color: #d0d0d0; }
    .projects p { color: #999; font-size: 0.95rem; }
    @media (max-width: 768px) { h1 { font-size: 2rem; } .container { padding: 1rem; } }
"#;

const ERROR_STYLES: &str = r#"
    :root { --bg: #0a0a0a; --fg: #ededed; --accent: #00d4ff; --error: #ff3366; }
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: var(--bg); color: var(--fg); min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 2rem; }
    .error-container { text-align: center; max-width: 600px; }
    .error-code { font-size: 8rem; font-weight: 700; background: linear-gradient(135deg, var(--error), var(--accent)); -webkit-background-clip: text; -webkit-text-fill-color: transparent; background-clip: text; margin-bottom: 1rem; }
    h1 { font-size: 2rem; margin-bottom: 1rem; }
    p { color: #999; margin-bottom: 2rem; font-size: 1.1rem; }
    .error-details { background: #1a1a1a; border: 1px solid #2a2a2a; border-radius: 8px; padding: 1rem; margin: 2rem 0; text-align: left; font-family: "JetBrains Mono", "Consolas", monospace; font-size: 0.9rem; color: #ff6666; overflow-x: auto; }
    a { display: inline-block; padding: 0.75rem 2rem; background: var(--accent); color: var(--bg); text-decoration: none; border-radius: 8px; font-weight: 500; }
"#;

/// Render the directory of projects, in the order the registry holds them.
pub fn render_landing(projects: &[Project]) -> (StatusCode, Html<String>) {
    let mut cards = String::new();
    for project in projects {
        let _ = write!(
            cards,
            r#"<li><a href="/{id}/"><h3>{name}</h3><p>{description}</p></a></li>"#,
            id = escape_html(&project.id),
            name = escape_html(&project.name),
            description = escape_html(&project.description),
        );
    }
    let content = format!(
        r#"<div class="container"><header><h1>Documentation Hub</h1></header><main><ul class="projects">{cards}</ul></main></div>"#
    );
    (
        StatusCode::OK,
        Html(page_shell("Documentation Hub", LANDING_STYLES, &content)),
    )
}

/// Render the 404 page, naming the project when one was asked for.
pub fn render_not_found(project_id: Option<&str>) -> (StatusCode, Html<String>) {
    let message = match project_id {
        Some(id) => format!(
            "Documentation for project \"{}\" not found",
            escape_html(id)
        ),
        None => "Page not found".to_owned(),
    };
    let content = format!(
        r#"<div class="error-container"><div class="error-code">404</div><h1>Not Found</h1><p>{message}</p><a href="/">Back to Documentation Hub</a></div>"#
    );
    (
        StatusCode::NOT_FOUND,
        Html(page_shell("404 - Not Found", ERROR_STYLES, &content)),
    )
}

/// Render the 500 page. The underlying error message is included only when
/// `expose_details` is set; production deployments keep it suppressed.
pub fn render_server_error(message: &str, expose_details: bool) -> (StatusCode, Html<String>) {
    let details = if expose_details {
        format!(
            r#"<div class="error-details">{}</div>"#,
            escape_html(message)
        )
    } else {
        String::new()
    };
    let content = format!(
        r#"<div class="error-container"><div class="error-code">500</div><h1>Server Error</h1><p>Something went wrong while processing your request.</p>{details}<a href="/">Back to Documentation Hub</a></div>"#
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page_shell("500 - Server Error", ERROR_STYLES, &content)),
    )
}

fn page_shell(title: &str, styles: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="anonymous">
<link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">
<style>{styles}</style>
</head>
<body>
{content}
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_owned(),
            name: name.to_owned(),
            description: format!("{name} documentation"),
        }
    }

    #[test]
    fn landing_lists_every_project_in_order() {
        let projects = vec![
            project("muxa", "Muxa"),
            project("denai", "Den AI"),
            project("rill", "Rill"),
        ];
        let (status, Html(body)) = render_landing(&projects);

        assert_eq!(status, StatusCode::OK);
        let positions: Vec<usize> = ["Muxa", "Den AI", "Rill"]
            .iter()
            .map(|name| body.find(name).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
        assert_eq!(body.matches(r#"href="/muxa/""#).count(), 1);
        assert_eq!(body.matches("<li>").count(), 3);
    }

    #[test]
    fn not_found_names_the_project_when_known() {
        let (status, Html(body)) = render_not_found(Some("ghost"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Documentation for project \"ghost\" not found"));

        let (_, Html(generic)) = render_not_found(None);
        assert!(generic.contains("Page not found"));
        assert!(!generic.contains("Documentation for project"));
    }

    #[test]
    fn server_error_details_are_gated_by_exposure() {
        let (status, Html(hidden)) = render_server_error("connection refused", false);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!hidden.contains("connection refused"));
        assert!(!hidden.contains("error-details"));

        let (_, Html(shown)) = render_server_error("connection refused", true);
        assert!(shown.contains("connection refused"));
        assert!(shown.contains("error-details"));
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let (_, Html(body)) = render_not_found(Some("<script>alert(1)</script>"));
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));

        let projects = vec![project("muxa", "a < b & \"c\"")];
        let (_, Html(landing)) = render_landing(&projects);
        assert!(landing.contains("a &lt; b &amp; &quot;c&quot;"));
    }
}

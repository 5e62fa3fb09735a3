use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::platforms::{match_platform, ExtractionStrategy, Platform};
use crate::AppState;

pub const UNSUPPORTED_PLATFORM_MESSAGE: &str =
    "Only ChatGPT, Claude, Poe and Gemini share links are currently supported.";

pub fn validate_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw)
        .map_err(|_| AppError::InvalidUrl("Invalid or unsupported chat link.".to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(AppError::InvalidUrl(
            "Invalid or unsupported chat link.".to_string(),
        )),
    }
}

/// Full extraction pipeline: validate, resolve the platform rule, drive a
/// browser session to a rendered-page snapshot, extract text from it.
pub async fn extract_chat(state: &AppState, raw_url: &str) -> Result<String> {
    let url = validate_url(raw_url)?;

    // Dispatch is pure URL matching, so an unsupported platform never pays
    // for a browser session.
    let Some(platform) = match_platform(url.as_str(), state.config.allowed_platforms.as_deref())
    else {
        tracing::info!(url = %url, "no platform rule matched");
        return Ok(UNSUPPORTED_PLATFORM_MESSAGE.to_string());
    };

    let _permit = state
        .extraction_slots
        .acquire()
        .await
        .map_err(|_| AppError::Browser("extraction limiter closed".to_string()))?;

    tracing::info!(url = %url, platform = platform.name, "starting extraction");
    let start = std::time::Instant::now();

    let mut session = state.browser.launch().await?;
    let outcome = render_page(&mut session, state, &url, platform).await;
    // The session is released before the outcome is allowed to propagate.
    session.close().await;
    let html = outcome?;

    tracing::info!(
        url = %url,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "page rendered"
    );

    let content = extract_content(&html, &platform.strategy);
    Ok(finalize_content(platform, content, state.config.min_content_chars))
}

async fn render_page(
    session: &mut crate::browser::BrowserSession,
    state: &AppState,
    url: &Url,
    platform: &Platform,
) -> Result<String> {
    session
        .goto(url.as_str(), state.config.navigation_timeout)
        .await?;
    session
        .wait_for(platform.wait_selector, state.config.selector_timeout)
        .await?;
    session.source().await
}

/// Applies a platform's extraction strategy to a rendered-page snapshot,
/// producing blank-line separated message blocks in document order.
pub fn extract_content(html: &str, strategy: &ExtractionStrategy) -> String {
    let document = Html::parse_document(html);

    match strategy {
        ExtractionStrategy::RoleTagged { nodes, role_attr } => document
            .select(nodes)
            .filter_map(|element| {
                let role = element.value().attr(role_attr)?;
                let text = clean_text(&element.text().collect::<String>());
                if text.is_empty() {
                    return None;
                }
                Some(format!("{}: {}", role.to_uppercase(), text))
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        ExtractionStrategy::Containers { nodes } => document
            .select(nodes)
            .map(|element| clean_text(&element.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Collapses rendering whitespace: lines are trimmed, empty ones dropped.
fn clean_text(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut first = true;

    for line in raw.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if !first {
                result.push('\n');
            }
            result.push_str(trimmed);
            first = false;
        }
    }

    result
}

/// Implausibly short extractions become a descriptive placeholder instead of
/// failing the request.
pub fn finalize_content(platform: &Platform, content: String, min_chars: usize) -> String {
    if content.chars().count() < min_chars {
        format!(
            "Could not extract content from the {} share link.",
            platform.label
        )
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::PLATFORMS;

    fn platform(name: &str) -> &'static Platform {
        PLATFORMS.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_url("https://chat.openai.com/share/abc").is_ok());
        assert!(validate_url("http://chat.openai.com/share/abc").is_ok());
    }

    #[test]
    fn rejects_non_http_input() {
        for raw in ["", "not a url", "ftp://example.com/x", "file:///etc/passwd"] {
            let err = validate_url(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidUrl(_)), "for {:?}", raw);
        }
    }

    #[test]
    fn role_tagged_nodes_render_in_document_order() {
        let html = r#"
            <html><body><main>
                <div data-message-author-role="user"><p>How do I sort a Vec?</p></div>
                <div data-message-author-role="assistant"><p>Call <code>sort</code> on it.</p></div>
            </main></body></html>
        "#;

        let content = extract_content(html, &platform("chatgpt").strategy);
        assert_eq!(
            content,
            "USER: How do I sort a Vec?\n\nASSISTANT: Call sort on it."
        );
    }

    #[test]
    fn role_tagged_nodes_without_text_are_dropped() {
        let html = r#"
            <html><body><main>
                <div data-message-author-role="user"><p>Hello</p></div>
                <div data-message-author-role="assistant"><img src="x.png"></div>
            </main></body></html>
        "#;

        let content = extract_content(html, &platform("chatgpt").strategy);
        assert_eq!(content, "USER: Hello");
    }

    #[test]
    fn container_nodes_are_trimmed_and_joined() {
        let html = r#"
            <html><body>
                <div class="font-claude-message-abc">
                    First answer,
                    over two lines.
                </div>
                <div class="font-claude-message-abc">   </div>
                <div class="font-claude-message-abc">Second answer.</div>
            </body></html>
        "#;

        let content = extract_content(html, &platform("claude").strategy);
        assert_eq!(
            content,
            "First answer,\nover two lines.\n\nSecond answer."
        );
    }

    #[test]
    fn empty_page_yields_empty_content() {
        let content = extract_content("<html><body></body></html>", &platform("chatgpt").strategy);
        assert_eq!(content, "");
    }

    #[test]
    fn short_content_becomes_platform_placeholder() {
        let replaced = finalize_content(platform("chatgpt"), "hi".to_string(), 20);
        assert_eq!(
            replaced,
            "Could not extract content from the ChatGPT share link."
        );
    }

    #[test]
    fn plausible_content_passes_through() {
        let text = "USER: a question that is long enough to keep".to_string();
        assert_eq!(
            finalize_content(platform("chatgpt"), text.clone(), 20),
            text
        );
    }
}

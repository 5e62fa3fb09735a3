use once_cell::sync::Lazy;
use scraper::Selector;

/// How a platform's conversation text is pulled out of the rendered page.
pub enum ExtractionStrategy {
    /// Message nodes carry a role attribute; each renders as "ROLE: text".
    RoleTagged {
        nodes: Selector,
        role_attr: &'static str,
    },
    /// Message containers matched by a class pattern, joined in document order.
    Containers { nodes: Selector },
}

/// One supported chat platform: URL substrings it is recognized by, the
/// selector that marks the conversation as rendered, and how to extract it.
pub struct Platform {
    pub name: &'static str,
    pub label: &'static str,
    pub url_patterns: &'static [&'static str],
    pub wait_selector: &'static str,
    pub strategy: ExtractionStrategy,
}

// Ordered by priority; first match wins. Adding a platform is a data change.
pub static PLATFORMS: Lazy<Vec<Platform>> = Lazy::new(|| {
    vec![
        Platform {
            name: "chatgpt",
            label: "ChatGPT",
            url_patterns: &["chat.openai.com", "chatgpt.com"],
            wait_selector: "main",
            strategy: ExtractionStrategy::RoleTagged {
                nodes: sel("[data-message-author-role]"),
                role_attr: "data-message-author-role",
            },
        },
        Platform {
            name: "claude",
            label: "Claude",
            url_patterns: &["claude.ai"],
            wait_selector: "main",
            strategy: ExtractionStrategy::Containers {
                nodes: sel(r#"div[class*="font-claude-message"]"#),
            },
        },
        Platform {
            name: "poe",
            label: "Poe",
            url_patterns: &["poe.com"],
            wait_selector: "main",
            strategy: ExtractionStrategy::Containers {
                nodes: sel(r#"div[class*="ChatMessage_chatMessage"]"#),
            },
        },
        Platform {
            name: "gemini",
            label: "Gemini",
            url_patterns: &["gemini.google.com", "g.co/gemini"],
            wait_selector: "message-content",
            strategy: ExtractionStrategy::Containers {
                nodes: sel("message-content"),
            },
        },
    ]
});

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("Failed to parse platform selector")
}

/// First platform whose URL pattern matches, honoring the configured
/// allow-list when one is set.
pub fn match_platform(url: &str, allowed: Option<&[String]>) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|platform| {
        let enabled = allowed
            .map(|names| names.iter().any(|n| n.eq_ignore_ascii_case(platform.name)))
            .unwrap_or(true);
        enabled && platform.url_patterns.iter().any(|pattern| url.contains(pattern))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_chatgpt_share_links_on_both_domains() {
        let legacy = match_platform("https://chat.openai.com/share/abc123", None).unwrap();
        assert_eq!(legacy.name, "chatgpt");

        let current = match_platform("https://chatgpt.com/share/abc123", None).unwrap();
        assert_eq!(current.name, "chatgpt");
    }

    #[test]
    fn matches_each_supported_platform() {
        for (url, expected) in [
            ("https://claude.ai/share/xyz", "claude"),
            ("https://poe.com/s/abc", "poe"),
            ("https://gemini.google.com/share/def", "gemini"),
            ("https://g.co/gemini/share/def", "gemini"),
        ] {
            let platform = match_platform(url, None).unwrap();
            assert_eq!(platform.name, expected, "for {}", url);
        }
    }

    #[test]
    fn unknown_platform_does_not_match() {
        assert!(match_platform("https://example.com/chat/123", None).is_none());
    }

    #[test]
    fn allow_list_restricts_matching() {
        let allowed = vec!["chatgpt".to_string()];

        assert!(match_platform("https://claude.ai/share/xyz", Some(&allowed)).is_none());
        assert!(match_platform("https://chatgpt.com/share/abc", Some(&allowed)).is_some());
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let allowed = vec!["ChatGPT".to_string()];
        assert!(match_platform("https://chatgpt.com/share/abc", Some(&allowed)).is_some());
    }
}

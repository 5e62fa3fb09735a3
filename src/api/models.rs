use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request fields stay raw JSON so a missing, null, or non-string value
// reaches handler validation and comes back as a 400, not a deserializer 422.

#[derive(Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Value,
}

impl ExtractRequest {
    pub fn url(&self) -> Option<&str> {
        self.url.as_str().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub content: String,
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default, rename = "chatText")]
    pub chat_text: Value,
    #[serde(default, rename = "summaryType")]
    pub summary_type: Value,
}

impl SummarizeRequest {
    pub fn chat_text(&self) -> Option<&str> {
        self.chat_text.as_str().filter(|t| !t.trim().is_empty())
    }

    pub fn summary_type(&self) -> Option<&str> {
        self.summary_type.as_str()
    }
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_request_accepts_a_string_url() {
        let req: ExtractRequest = serde_json::from_str(r#"{"url":"https://chatgpt.com/share/a"}"#).unwrap();
        assert_eq!(req.url(), Some("https://chatgpt.com/share/a"));
    }

    #[test]
    fn extract_request_tolerates_malformed_url_fields() {
        for body in [r#"{}"#, r#"{"url":null}"#, r#"{"url":42}"#, r#"{"url":""}"#, r#"{"url":"   "}"#] {
            let req: ExtractRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.url(), None, "for {}", body);
        }
    }

    #[test]
    fn summarize_request_reads_camel_case_fields() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"chatText":"USER: hi","summaryType":"brief"}"#).unwrap();
        assert_eq!(req.chat_text(), Some("USER: hi"));
        assert_eq!(req.summary_type(), Some("brief"));
    }

    #[test]
    fn summarize_request_treats_blank_text_as_missing() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"chatText":"  \n ","summaryType":"brief"}"#).unwrap();
        assert_eq!(req.chat_text(), None);
    }

    #[test]
    fn summarize_request_tolerates_missing_or_non_string_fields() {
        let req: SummarizeRequest = serde_json::from_str(r#"{"chatText":7}"#).unwrap();
        assert_eq!(req.chat_text(), None);
        assert_eq!(req.summary_type(), None);
    }
}

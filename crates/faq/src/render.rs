//! FAQ answer rendering.
//!
//! Plain-string answers get bare URLs turned into hyperlink markup; rich
//! payloads are passed through verbatim for client-side rendering and are
//! never stringified server-side.

use std::sync::OnceLock;

use regex::Regex;

use ub_domain::faq::{FaqAnswer, RichPayload};

/// A bare URL: contiguous non-whitespace starting with http(s)://.
fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

/// What the client receives for a FAQ hit.
#[derive(Debug, Clone)]
pub enum RenderedAnswer {
    /// Plain text with URLs auto-linked.
    Text(String),
    /// Structured payload, tagged as a rich-type response.
    Rich(RichPayload),
}

pub fn render(answer: &FaqAnswer) -> RenderedAnswer {
    match answer {
        FaqAnswer::Text(text) => RenderedAnswer::Text(autolink(text)),
        FaqAnswer::Rich(rich) => RenderedAnswer::Rich(rich.clone()),
    }
}

/// Wrap every bare URL in anchor markup, leaving all other text untouched.
pub fn autolink(text: &str) -> String {
    url_regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let url = &caps[0];
            format!(
                "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>"
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_bare_urls() {
        let out = autolink("Detaylar: https://uni.edu.tr/yaz-okulu sayfasında.");
        assert_eq!(
            out,
            "Detaylar: <a href=\"https://uni.edu.tr/yaz-okulu\" target=\"_blank\" \
             rel=\"noopener noreferrer\">https://uni.edu.tr/yaz-okulu</a> sayfasında."
        );
    }

    #[test]
    fn links_multiple_urls_and_http() {
        let out = autolink("http://a.example ve https://b.example");
        assert_eq!(out.matches("<a href=").count(), 2);
        assert!(out.contains("ve "));
    }

    #[test]
    fn text_without_urls_is_untouched() {
        let text = "Kayıtlar 1 Eylül'de başlıyor.";
        assert_eq!(autolink(text), text);
    }

    #[test]
    fn rich_payload_passes_through_verbatim() {
        let rich = RichPayload {
            title: Some("Bizi takip edin".into()),
            image: Some("https://uni.edu.tr/logo.png".into()),
            text: None,
            social: [("twitter".to_string(), "https://twitter.com/uni".to_string())]
                .into_iter()
                .collect(),
        };
        match render(&FaqAnswer::Rich(rich.clone())) {
            RenderedAnswer::Rich(out) => {
                // No stringification or summarizing on the way through.
                assert_eq!(out.title, rich.title);
                assert_eq!(out.image, rich.image);
                assert_eq!(out.social, rich.social);
            }
            RenderedAnswer::Text(_) => panic!("expected rich answer"),
        }
    }
}

//! Corpus-level matching behavior over a realistic FAQ set.

use ub_domain::config::StemmerLanguage;
use ub_domain::faq::{FaqAnswer, FaqEntry};
use ub_faq::{render, FaqMatcher, Normalizer, RenderedAnswer};

fn corpus() -> Vec<FaqEntry> {
    serde_json::from_str(
        r#"[
        {"question": "Yaz okulu tarihleri ne zaman?",
         "answer": "Yaz okulu 15 Temmuz - 30 Ağustos arasında yapılacaktır."},
        {"question": "Kayıt için hangi belgeler gerekli?",
         "answer": "Detaylar: https://uni.edu.tr/kayit"},
        {"question": "Kütüphane saat kaçta açılıyor?",
         "answer": "Kütüphane hafta içi 08:00 - 22:00 arasında açıktır."},
        {"question": "Sosyal medya hesaplarınız neler?",
         "answer": {"title": "Bizi takip edin",
                    "image": "https://uni.edu.tr/logo.png",
                    "social": {"twitter": "https://twitter.com/uni",
                               "instagram": "https://instagram.com/uni"}}}
    ]"#,
    )
    .unwrap()
}

fn matcher() -> FaqMatcher {
    FaqMatcher::new(corpus(), StemmerLanguage::English, 0.65)
}

#[test]
fn every_corpus_question_matches_itself() {
    let m = matcher();
    for (i, entry) in corpus().iter().enumerate() {
        let hit = m
            .best_match(&entry.question)
            .unwrap_or_else(|| panic!("no match for corpus question {i}"));
        assert_eq!(hit.index, i);
        assert_eq!(hit.confidence, 1.0);
    }
}

#[test]
fn casing_and_punctuation_do_not_matter() {
    let m = matcher();
    let hit = m.best_match("KÜTÜPHANE SAAT KAÇTA AÇILIYOR").unwrap();
    assert_eq!(hit.entry.question, "Kütüphane saat kaçta açılıyor?");
}

#[test]
fn unrelated_input_matches_nothing() {
    let m = matcher();
    assert!(m.best_match("asdkjasnd").is_none());
    assert!(m.best_match("").is_none());
    assert!(m.best_match("What is the meaning of life?").is_none());
}

#[test]
fn plain_hit_renders_with_linked_urls() {
    let m = matcher();
    let hit = m.best_match("Kayıt için hangi belgeler gerekli?").unwrap();
    match render(&hit.entry.answer) {
        RenderedAnswer::Text(html) => {
            assert!(html.contains("<a href=\"https://uni.edu.tr/kayit\""));
        }
        RenderedAnswer::Rich(_) => panic!("expected plain answer"),
    }
}

#[test]
fn rich_hit_renders_as_rich() {
    let m = matcher();
    let hit = m.best_match("Sosyal medya hesaplarınız neler?").unwrap();
    assert!(matches!(hit.entry.answer, FaqAnswer::Rich(_)));
    match render(&hit.entry.answer) {
        RenderedAnswer::Rich(rich) => {
            assert_eq!(rich.social.len(), 2);
        }
        RenderedAnswer::Text(_) => panic!("expected rich answer"),
    }
}

#[test]
fn matcher_agrees_with_standalone_normalizer() {
    // The matcher's precomputed keys are a pure startup optimization;
    // they must not change what a per-call normalization would produce.
    let n = Normalizer::new(StemmerLanguage::English);
    let m = matcher();
    let hit = m.best_match("yaz okulu tarihleri ne zaman").unwrap();
    assert_eq!(
        n.normalized_key(&hit.entry.question),
        n.normalized_key("yaz okulu tarihleri ne zaman?")
    );
}

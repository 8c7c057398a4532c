//! Text sanitizing for speech synthesis.
//!
//! Completion output is written for reading: it may carry Markdown emphasis,
//! links and bullet lists. Speech engines read those markers aloud, so they
//! are stripped before synthesis. SSML produced by a model is extracted from
//! any surrounding chatter and checked against the text it should voice.

use std::sync::LazyLock;

use regex::Regex;

use parley_types::error::SanitizeError;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("link pattern is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

const SPEAK_OPEN: &str = "<speak";
const SPEAK_CLOSE: &str = "</speak>";

/// Remove presentation markup so the text reads naturally when spoken.
///
/// `**bold**` and `*italic*` lose their markers, `[label](url)` keeps only
/// the label, `\n- ` bullets become `, ` and remaining newlines become spaces.
pub fn strip_markup(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    text.replace("\n- ", ", ").replace('\n', " ")
}

/// Extract the `<speak>...</speak>` block from a model response.
///
/// Returns the span from the first `<speak` through the last `</speak>`.
pub fn extract_ssml(raw: &str) -> Result<String, SanitizeError> {
    let start = raw.find(SPEAK_OPEN).ok_or(SanitizeError::MalformedSsml)?;
    let end = raw.rfind(SPEAK_CLOSE).ok_or(SanitizeError::MalformedSsml)?;
    if end < start {
        return Err(SanitizeError::MalformedSsml);
    }
    Ok(raw[start..end + SPEAK_CLOSE.len()].to_string())
}

/// Check that `ssml` voices the same words as `original`.
///
/// Tags are removed and XML entities decoded; both sides are then reduced to
/// lowercase alphanumeric words and compared in order. Punctuation, casing
/// and whitespace differences are tolerated; added, dropped or reordered
/// words are not.
pub fn validate_semantic_identity(original: &str, ssml: &str) -> Result<(), SanitizeError> {
    let spoken = TAG_RE.replace_all(ssml, " ");
    let spoken = decode_entities(&spoken);

    if words(&strip_markup(original)) == words(&spoken) {
        Ok(())
    } else {
        Err(SanitizeError::SemanticMismatch)
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_example() {
        assert_eq!(
            strip_markup("**bold** and *italic* [text](url)\n- item"),
            "bold and italic text, item"
        );
    }

    #[test]
    fn test_strip_markup_plain_text_unchanged() {
        assert_eq!(
            strip_markup("Tell me about your last project."),
            "Tell me about your last project."
        );
    }

    #[test]
    fn test_strip_markup_collapses_newlines() {
        assert_eq!(strip_markup("First line.\nSecond line."), "First line. Second line.");
    }

    #[test]
    fn test_extract_ssml_with_surrounding_chatter() {
        let raw = "Sure! Here it is: <speak>Hello <break time=\"1s\"/> there</speak> Enjoy.";
        assert_eq!(
            extract_ssml(raw).unwrap(),
            "<speak>Hello <break time=\"1s\"/> there</speak>"
        );
    }

    #[test]
    fn test_extract_ssml_spans_first_open_to_last_close() {
        let raw = "<speak>one</speak> and <speak>two</speak>";
        assert_eq!(extract_ssml(raw).unwrap(), raw);
    }

    #[test]
    fn test_extract_ssml_requires_both_tags() {
        assert_eq!(extract_ssml("Hello"), Err(SanitizeError::MalformedSsml));
        assert_eq!(extract_ssml("<speak>Hello"), Err(SanitizeError::MalformedSsml));
        assert_eq!(extract_ssml("Hello</speak>"), Err(SanitizeError::MalformedSsml));
        assert_eq!(
            extract_ssml("</speak> backwards <speak"),
            Err(SanitizeError::MalformedSsml)
        );
    }

    #[test]
    fn test_semantic_identity_accepts_same_words() {
        let original = "**Great** answer! Now, tell me about SQL & indexes.";
        let ssml = "<speak><emphasis>Great</emphasis> answer! <break time=\"500ms\"/> \
                    Now, tell me about <say-as interpret-as=\"characters\">SQL</say-as> \
                    &amp; indexes.</speak>";
        assert!(validate_semantic_identity(original, ssml).is_ok());
    }

    #[test]
    fn test_semantic_identity_rejects_changed_words() {
        let original = "Tell me about SQL indexes.";
        let ssml = "<speak>Tell me about NoSQL indexes.</speak>";
        assert_eq!(
            validate_semantic_identity(original, ssml),
            Err(SanitizeError::SemanticMismatch)
        );

        let ssml = "<speak>Tell me about SQL indexes, please.</speak>";
        assert_eq!(
            validate_semantic_identity(original, ssml),
            Err(SanitizeError::SemanticMismatch)
        );
    }
}

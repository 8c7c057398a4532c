//! Interview prompt templates.
//!
//! Templates are embedded at compile time, one set per [`Language`], and use
//! `{{name}}` placeholders.

use parley_types::language::Language;

const SYSTEM_EN: &str = include_str!("templates/system.en.txt");
const SYSTEM_ID: &str = include_str!("templates/system.id.txt");
const GREETING_EN: &str = include_str!("templates/greeting.en.txt");
const GREETING_ID: &str = include_str!("templates/greeting.id.txt");
const CLOSING_EN: &str = include_str!("templates/closing.en.txt");
const CLOSING_ID: &str = include_str!("templates/closing.id.txt");
const SSML_EN: &str = include_str!("templates/ssml.en.txt");
const SSML_ID: &str = include_str!("templates/ssml.id.txt");

/// Renders the fixed texts of an interview.
pub struct InterviewPromptBuilder;

impl InterviewPromptBuilder {
    /// System prompt that sets up the interviewer persona.
    ///
    /// Skills are joined with `"; "`.
    pub fn system_prompt(role: &str, skills: &[String], language: Language) -> String {
        let template = match language {
            Language::English => SYSTEM_EN,
            Language::Indonesian => SYSTEM_ID,
        };
        render(
            template,
            &[("role", role.trim()), ("skills", &skills.join("; "))],
        )
    }

    /// Opening assistant message.
    pub fn greeting(role: &str, language: Language) -> String {
        let template = match language {
            Language::English => GREETING_EN,
            Language::Indonesian => GREETING_ID,
        };
        render(template, &[("role", role.trim())])
    }

    /// User message appended (never stored) to request closing feedback.
    pub fn closing_instruction(language: Language) -> &'static str {
        match language {
            Language::English => CLOSING_EN.trim(),
            Language::Indonesian => CLOSING_ID.trim(),
        }
    }

    /// System instruction for turning plain text into SSML.
    pub fn ssml_instruction(language: Language) -> String {
        let template = match language {
            Language::English => SSML_EN,
            Language::Indonesian => SSML_ID,
        };
        render(template, &[("locale", language.locale())])
    }
}

/// Fill `{{name}}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned. Unknown placeholders are kept.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let template = template.trim();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

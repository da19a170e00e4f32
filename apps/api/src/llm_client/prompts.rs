// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

use crate::i18n::Language;

/// Appended to every prompt whose response is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Верни ответ СТРОГО в формате JSON без markdown форматирования. \
    Не добавляй текст вне JSON объекта.";

/// "Язык ответа: <language>." line included in every localized prompt.
pub fn response_language_line(lang: Language) -> String {
    format!("Язык ответа: {}.", lang.prompt_name())
}

/// Substitutes `{key}` placeholders in a single pass over the template.
/// Inserted values are never scanned again, so user text that happens to
/// contain a placeholder name stays literal. Unknown `{...}` are kept as is.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let found = tail[1..].find('}').and_then(|end| {
            let key = &tail[1..=end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end + 2))
        });
        match found {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

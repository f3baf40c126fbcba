/// Reply the model is told to give for anything that is not a translation
/// request. The intent filter returns the same text so both refusal paths
/// look identical to the frontend.
pub const REFUSAL_MESSAGE: &str =
    "I am a translation-only assistant. Please provide text to translate and a target language.";

pub const EMPTY_PROMPT_MESSAGE: &str = "Please provide text to translate and a target language.";

pub const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed";

/// Persona sent as the system instruction on every model call
pub const SYSTEM_INSTRUCTION: &str = "You are a translation chatbot named Cosmic Translate. \
Your sole function is to translate user text to a specified language. \
The user will provide the text and the target language in a single message. \
Your response must consist ONLY of the translated text, with no extra comments, greetings, or explanations. \
If the user provides anything other than a translation request, or if you cannot determine the text \
and target language from their message, you MUST reply with the exact phrase: \
\"I am a translation-only assistant. Please provide text to translate and a target language.\"";

/// Build a single prompt from the separate text / target language fields
pub fn build_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {}: {}",
        target_language.trim(),
        text.trim()
    )
}

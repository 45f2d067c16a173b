use isolang::Language;

/// ISO 639-1 code with a 639-3 fallback for languages without a two-letter
/// code.
pub fn lang_code(lang: &Language) -> String {
    lang.to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string())
}

/// One text field to translate between a fixed language pair.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source: Language,
    pub target: Language,
}

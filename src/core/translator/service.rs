//! Translation with memoization.
//!
//! A recipe detail screen carries 10-20 ingredient lines plus a multi-line
//! instruction block, and unit words repeat across recipes. The service keeps
//! a process-lifetime memo table so repeated strings never re-pay the remote
//! translation cost. Failed translations are never cached; callers fall back
//! to the source text.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use isolang::Language;
use reqwest::Client;

use super::types::{lang_code, TranslationRequest};
use crate::shared::error::{AppError, AppResult};

const DEFAULT_TRANSLATE_BASE: &str = "https://translate.googleapis.com";

/// Remote translation backend.
///
/// Treated as a black box that may fail or time out; the cache layer decides
/// what a failure means for the caller.
#[async_trait]
pub trait TranslateProvider: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<String>;
}

/// Client for the unofficial Google Translate endpoint (free tier).
///
/// For production volume, consider the official Cloud Translation API.
pub struct GoogleTranslateClient {
    http: Client,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new() -> AppResult<Self> {
        Self::with_base_url(DEFAULT_TRANSLATE_BASE)
    }

    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("culinary-mastermind/translator")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslateProvider for GoogleTranslateClient {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<String> {
        let url = format!(
            "{}/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.base_url,
            lang_code(&request.source),
            lang_code(&request.target),
            urlencoding::encode(&request.text)
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !res.status().is_success() {
            return Err(AppError::Network(format!(
                "Translation API error: {}",
                res.status()
            )));
        }

        let raw_json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse JSON: {}", e)))?;

        // Sentences arrive as a nested array: [[["Translated text", ...], ...], ...]
        let mut translated = String::new();
        if let Some(sentences) = raw_json.get(0).and_then(|v| v.as_array()) {
            for sentence in sentences {
                if let Some(segment) = sentence.get(0).and_then(|v| v.as_str()) {
                    translated.push_str(segment);
                }
            }
        } else {
            return Err(AppError::Validation(
                "Invalid response format from translator".to_string(),
            ));
        }

        Ok(translated)
    }
}

/// Memo key: the exact source text plus the language pair.
type MemoKey = (String, String, String);

/// Memoizing front for a [`TranslateProvider`].
///
/// The table lives for the process and is never evicted; distinct source
/// strings per session are few enough that unbounded growth is acceptable.
/// Safe for concurrent use - locks are held only for the lookup/insert,
/// never across the remote call, so two concurrent misses for one key may
/// both hit the network and overwrite each other with equal values.
pub struct TranslationService {
    provider: Arc<dyn TranslateProvider>,
    memo: RwLock<HashMap<MemoKey, String>>,
}

impl TranslationService {
    pub fn new(provider: Arc<dyn TranslateProvider>) -> Self {
        Self {
            provider,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Empty or whitespace-only input is returned unchanged with no remote
    /// call. On a memo hit the cached value is returned with no network
    /// activity. On failure nothing is cached and the error carries the
    /// original text so the caller can fall back to it.
    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> AppResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let key = (text.to_string(), lang_code(&source), lang_code(&target));

        {
            let memo = match self.memo.read() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    eprintln!("[Translator] Memo lock poisoned, recovering...");
                    poisoned.into_inner()
                }
            };
            if let Some(cached) = memo.get(&key) {
                return Ok(cached.clone());
            }
        }

        let request = TranslationRequest {
            text: text.to_string(),
            source,
            target,
        };

        match self.provider.translate(&request).await {
            Ok(translated) => {
                let mut memo = match self.memo.write() {
                    Ok(guard) => guard,
                    Err(poisoned) => {
                        eprintln!("[Translator] Memo lock poisoned, recovering...");
                        poisoned.into_inner()
                    }
                };
                memo.insert(key, translated.clone());
                Ok(translated)
            }
            Err(e) => Err(AppError::TranslationUnavailable {
                text: text.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Best-effort translate: a failed translation degrades to the source
    /// text instead of propagating.
    pub async fn translate_or_original(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> String {
        match self.translate(text, source, target).await {
            Ok(translated) => translated,
            Err(AppError::TranslationUnavailable { text, reason }) => {
                eprintln!("[Translator] Falling back to source text: {}", reason);
                text
            }
            Err(e) => {
                eprintln!("[Translator] Falling back to source text: {}", e);
                text.to_string()
            }
        }
    }
}

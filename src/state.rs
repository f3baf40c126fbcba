use std::sync::Arc;

use crate::config::Config;
use crate::llm::{GeminiLLM, TranslationLLM};
use crate::translate::IntentFilter;

/// Read-only state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn TranslationLLM>,
    pub intent_filter: Arc<IntentFilter>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = Arc::new(GeminiLLM::from_config(&config.llm));
        Self::with_llm(config, llm)
    }

    pub fn with_llm(config: Config, llm: Arc<dyn TranslationLLM>) -> anyhow::Result<Self> {
        let intent_filter = IntentFilter::new(&config.intent_filter)?;

        Ok(Self {
            config: Arc::new(config),
            llm,
            intent_filter: Arc::new(intent_filter),
        })
    }
}

//! Configuration loading, validation, and management for Arabot.
//!
//! Loads configuration from `$ARABOT_CONFIG` or `~/.arabot/config.toml`, then
//! applies environment variable overrides (the same variable names the cloud
//! function deployment uses). Validates all settings at startup.

use arabot_core::provider::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.arabot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Google Cloud project and credentials
    #[serde(default)]
    pub gcp: GcpConfig,

    /// Slack credentials and API settings
    #[serde(default)]
    pub slack: SlackConfig,

    /// Keyword sets and thresholds for intent classification
    #[serde(default)]
    pub classifier: ClassifierPolicy,

    /// Persona instructions and prompt templates
    #[serde(default)]
    pub prompts: PromptConfig,

    /// Web page fetching limits
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// PDF summarizer settings
    #[serde(default)]
    pub pdf_summary: PdfSummaryConfig,

    /// Object storage backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

fn default_true() -> bool {
    true
}

// ── Model ─────────────────────────────────────────────────────────────────

/// Which Gemini endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Vertex AI (`aiplatform.googleapis.com`), OAuth bearer token
    Vertex,
    /// Generative Language API (`generativelanguage.googleapis.com`), API key
    Gemini,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_backend")]
    pub backend: ModelBackend,

    /// Model used by the chat bot
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Model used by the PDF summarizer (falls back to `model_id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_model_id: Option<String>,

    /// API key for the `gemini` backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override the endpoint base URL (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default = "default_model_timeout")]
    pub request_timeout_secs: u64,

    /// Generation parameters for chat replies
    #[serde(default)]
    pub chat_generation: GenerationConfig,
}

fn default_backend() -> ModelBackend {
    ModelBackend::Vertex
}
fn default_model_id() -> String {
    "gemini-2.5-flash".into()
}
fn default_model_timeout() -> u64 {
    120
}

impl ModelConfig {
    /// The model the PDF summarizer should use.
    pub fn summary_model(&self) -> &str {
        self.summary_model_id.as_deref().unwrap_or(&self.model_id)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model_id: default_model_id(),
            summary_model_id: None,
            api_key: None,
            api_base: None,
            request_timeout_secs: default_model_timeout(),
            chat_generation: GenerationConfig::default(),
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("backend", &self.backend)
            .field("model_id", &self.model_id)
            .field("summary_model_id", &self.summary_model_id)
            .field("api_key", &redact(&self.api_key))
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("chat_generation", &self.chat_generation)
            .finish()
    }
}

// ── GCP ───────────────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default = "default_location")]
    pub location: String,

    /// Static OAuth access token. When unset, tokens come from the metadata server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_metadata_host")]
    pub metadata_host: String,
}

fn default_location() -> String {
    "us-central1".into()
}
fn default_metadata_host() -> String {
    "http://metadata.google.internal".into()
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: default_location(),
            access_token: None,
            metadata_host: default_metadata_host(),
        }
    }
}

impl std::fmt::Debug for GcpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpConfig")
            .field("project", &self.project)
            .field("location", &self.location)
            .field("access_token", &redact(&self.access_token))
            .field("metadata_host", &self.metadata_host)
            .finish()
    }
}

// ── Slack ─────────────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (xoxb-...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Signing secret for request verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,

    #[serde(default = "default_slack_api_base")]
    pub api_base: String,

    /// Reject signed requests older than this
    #[serde(default = "default_signature_age")]
    pub max_signature_age_secs: u64,

    #[serde(default = "default_slack_timeout")]
    pub request_timeout_secs: u64,

    /// Ignore messages posted by bots (including ourselves)
    #[serde(default = "default_true")]
    pub ignore_bot_messages: bool,
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".into()
}
fn default_signature_age() -> u64 {
    300
}
fn default_slack_timeout() -> u64 {
    30
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            api_base: default_slack_api_base(),
            max_signature_age_secs: default_signature_age(),
            request_timeout_secs: default_slack_timeout(),
            ignore_bot_messages: true,
        }
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("signing_secret", &redact(&self.signing_secret))
            .field("api_base", &self.api_base)
            .field("max_signature_age_secs", &self.max_signature_age_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("ignore_bot_messages", &self.ignore_bot_messages)
            .finish()
    }
}

// ── Classifier ────────────────────────────────────────────────────────────

/// Keyword sets and thresholds that drive intent classification.
///
/// Keyword matching is plain substring containment on the mention-stripped
/// text. Lengths are counted in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierPolicy {
    /// Words that mark a news/report topic (news, article, blog, report, ...)
    #[serde(default = "default_topic_keywords")]
    pub topic_keywords: Vec<String>,

    /// Explicit requests ("summarize this", "analyze this", ...)
    #[serde(default = "default_request_keywords")]
    pub request_keywords: Vec<String>,

    /// Words that make a URL-less history message worth analyzing
    #[serde(default = "default_news_keywords")]
    pub news_keywords: Vec<String>,

    /// Messages longer than this are analyzed as long text
    #[serde(default = "default_long_text_threshold")]
    pub long_text_threshold: usize,

    /// URL-less history messages must be longer than this
    #[serde(default = "default_history_min_chars")]
    pub history_min_chars: usize,

    /// How many recent channel messages to inspect
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_topic_keywords() -> Vec<String> {
    ["뉴스", "기사", "블로그", "리포트", "보고서", "분석", "요약", "정리"]
        .map(String::from)
        .to_vec()
}
fn default_request_keywords() -> Vec<String> {
    ["분석해줘", "분석해달라", "요약해줘", "요약해달라", "정리해줘", "정리해달라"]
        .map(String::from)
        .to_vec()
}
fn default_news_keywords() -> Vec<String> {
    ["뉴스", "기사", "블로그", "리포트", "보고서", "발표", "공지", "소식"]
        .map(String::from)
        .to_vec()
}
fn default_long_text_threshold() -> usize {
    200
}
fn default_history_min_chars() -> usize {
    100
}
fn default_history_window() -> usize {
    10
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            topic_keywords: default_topic_keywords(),
            request_keywords: default_request_keywords(),
            news_keywords: default_news_keywords(),
            long_text_threshold: default_long_text_threshold(),
            history_min_chars: default_history_min_chars(),
            history_window: default_history_window(),
        }
    }
}

// ── Prompts ───────────────────────────────────────────────────────────────

/// Persona instructions and templates. `{context}`, `{content}` and `{text}`
/// are substituted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_analysis_system")]
    pub analysis_system: String,

    #[serde(default = "default_general_system")]
    pub general_system: String,

    #[serde(default = "default_thread_template")]
    pub thread_template: String,

    #[serde(default = "default_history_analysis_template")]
    pub history_analysis_template: String,

    #[serde(default = "default_message_analysis_template")]
    pub message_analysis_template: String,

    /// Reply used when the channel history held nothing to analyze
    #[serde(default = "default_no_content_reply")]
    pub no_content_reply: String,

    /// Prefix of the reply posted when processing fails
    #[serde(default = "default_error_reply_prefix")]
    pub error_reply_prefix: String,

    #[serde(default = "default_pdf_summary_template")]
    pub pdf_summary_template: String,
}

fn default_analysis_system() -> String {
    "# **역할**:\n\
     당신은 최고의 AI 분석 파트너 '아라봇'입니다.\n\
     제공된 **뉴스 기사 본문**을 바탕으로 깊이 있는 분석을 수행해야 합니다.\n\
     단순히 내용을 요약하는 것을 넘어, 이면의 함의, 업계에 미칠 영향, 이해관계자 분석 등을 포함해 주세요.\n\n\
     # **임무**:\n\
     전문 분석가로서 핵심 요약, 주요 쟁점, 잠재적 파급 효과, 결론을 포함한 심층 리포트를 작성하세요."
        .into()
}
fn default_general_system() -> String {
    "# **역할**:\n\
     당신은 친근하고 도움이 되는 AI 어시스턴트 '아라봇'입니다.\n\n\
     # **임무**:\n\
     사용자의 질문에 자연스럽고 창의적인 대화 형태로 응답하세요."
        .into()
}
fn default_thread_template() -> String {
    "다음 대화 맥락을 보고 답변해줘:\n{context}".into()
}
fn default_history_analysis_template() -> String {
    "다음은 수집된 뉴스 기사의 원문 내용입니다. 이를 바탕으로 아주 상세하게 분석해 주세요:\n\n{content}"
        .into()
}
fn default_message_analysis_template() -> String {
    "다음 내용을 심층 분석해 주세요:\n\n{content}".into()
}
fn default_no_content_reply() -> String {
    "최근 대화에서 분석할 만한 뉴스 링크나 긴 텍스트를 찾지 못했습니다.".into()
}
fn default_error_reply_prefix() -> String {
    "오류 발생: ".into()
}
fn default_pdf_summary_template() -> String {
    "다음 PDF 문서의 내용을 5000단어 이내로 상세히 요약해주세요.\n\
     주요 주제, 핵심 아이디어, 중요한 세부 사항을 포함하여 문서의 전체적인 내용을 포괄적으로 다루어주세요.\n\
     가능한 경우 문서에서 언급된 주요 통계, 데이터, 인용구 등을 포함해주세요.\n\
     또한 문서의 구조와 논리적 흐름을 반영하여 요약해주세요.\n\n\
     문서 내용: {text}"
        .into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            analysis_system: default_analysis_system(),
            general_system: default_general_system(),
            thread_template: default_thread_template(),
            history_analysis_template: default_history_analysis_template(),
            message_analysis_template: default_message_analysis_template(),
            no_content_reply: default_no_content_reply(),
            error_reply_prefix: default_error_reply_prefix(),
            pdf_summary_template: default_pdf_summary_template(),
        }
    }
}

// ── Scraper ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,

    /// Scraped text is cut to this many characters
    #[serde(default = "default_scrape_max_chars")]
    pub max_chars: usize,

    /// Some sites refuse obvious bots, so look like a browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_scrape_timeout() -> u64 {
    5
}
fn default_scrape_max_chars() -> usize {
    10_000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .into()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_scrape_timeout(),
            max_chars: default_scrape_max_chars(),
            user_agent: default_user_agent(),
        }
    }
}

// ── PDF summary ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfSummaryConfig {
    /// Bucket to read and write. When unset, the event's bucket is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Only PDFs under this prefix are summarized. Empty = whole bucket.
    #[serde(default = "default_input_folder")]
    pub folder: String,

    #[serde(default = "default_summary_folder")]
    pub summary_folder: String,

    #[serde(default = "default_error_log_folder")]
    pub error_log_folder: String,

    /// Extracted text is cut to this many characters before prompting
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_input_folder() -> String {
    "ai-pdf-folder/".into()
}
fn default_summary_folder() -> String {
    "ai-pdf-folder/summaries/".into()
}
fn default_error_log_folder() -> String {
    "ai-pdf-folder/error_logs/".into()
}
fn default_max_input_chars() -> usize {
    30_000
}

impl Default for PdfSummaryConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            folder: default_input_folder(),
            summary_folder: default_summary_folder(),
            error_log_folder: default_error_log_folder(),
            max_input_chars: default_max_input_chars(),
            generation: GenerationConfig::default(),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Google Cloud Storage JSON API
    Gcs,
    /// Directory tree on local disk: `{root}/{bucket}/{path}`
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_storage_api_base")]
    pub api_base: String,

    /// Root directory for the local backend
    #[serde(default = "default_local_root")]
    pub local_root: String,
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Gcs
}
fn default_storage_api_base() -> String {
    "https://storage.googleapis.com".into()
}
fn default_local_root() -> String {
    ".".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            api_base: default_storage_api_base(),
            local_root: default_local_root(),
        }
    }
}

// ── Gateway ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// How long a delivered event ID is remembered for deduplication
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_dedup_ttl() -> u64 {
    600
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            dedup_ttl_secs: default_dedup_ttl(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from `$ARABOT_CONFIG` or `~/.arabot/config.toml`,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("ARABOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from environment-style lookups.
    ///
    /// Takes the lookup as a closure so tests never touch the process env.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(v);
        }
        if let Some(v) = get("SLACK_SIGNING_SECRET") {
            self.slack.signing_secret = Some(v);
        }
        if let Some(v) = get("MODEL_ID") {
            self.model.model_id = v;
        }
        if let Some(v) = get("SUMMARY_MODEL_ID") {
            self.model.summary_model_id = Some(v);
        }
        if let Some(v) = get("GEMINI_API_KEY") {
            self.model.api_key = Some(v);
            if get("ARABOT_MODEL_BACKEND").is_none() {
                self.model.backend = ModelBackend::Gemini;
            }
        }
        match get("ARABOT_MODEL_BACKEND").as_deref() {
            Some("vertex") => self.model.backend = ModelBackend::Vertex,
            Some("gemini") => self.model.backend = ModelBackend::Gemini,
            Some(other) => tracing::warn!(backend = %other, "Unknown ARABOT_MODEL_BACKEND, ignoring"),
            None => {}
        }
        if let Some(v) = get("GOOGLE_CLOUD_PROJECT").or_else(|| get("GCP_PROJECT")) {
            self.gcp.project = Some(v);
        }
        if let Some(v) = get("GOOGLE_CLOUD_LOCATION") {
            self.gcp.location = v;
        }
        if let Some(v) = get("BUCKET_NAME") {
            self.pdf_summary.bucket = Some(v);
        }
        if let Some(v) = get("FOLDER_NAME") {
            self.pdf_summary.folder = v;
        }
        if let Some(v) = get("SUMMARY_FOLDER_NAME") {
            self.pdf_summary.summary_folder = v;
        }
        if let Some(v) = get("ERROR_LOG_FOLDER_NAME") {
            self.pdf_summary.error_log_folder = v;
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(p) => self.gateway.port = p,
                Err(_) => tracing::warn!(port = %port, "Ignoring unparseable PORT"),
            }
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".arabot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_generation("model.chat_generation", &self.model.chat_generation)?;
        validate_generation("pdf_summary.generation", &self.pdf_summary.generation)?;

        let policy = &self.classifier;
        if policy.topic_keywords.is_empty()
            || policy.request_keywords.is_empty()
            || policy.news_keywords.is_empty()
        {
            return Err(ConfigError::ValidationError(
                "classifier keyword sets must not be empty".into(),
            ));
        }
        if policy.long_text_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.long_text_threshold must be > 0".into(),
            ));
        }
        if policy.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.history_window must be > 0".into(),
            ));
        }

        if self.scraper.timeout_secs == 0 || self.scraper.max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "scraper.timeout_secs and scraper.max_chars must be > 0".into(),
            ));
        }

        if self.pdf_summary.max_input_chars == 0 {
            return Err(ConfigError::ValidationError(
                "pdf_summary.max_input_chars must be > 0".into(),
            ));
        }

        let prompts = &self.prompts;
        for (field, template, placeholder) in [
            ("prompts.thread_template", &prompts.thread_template, "{context}"),
            (
                "prompts.history_analysis_template",
                &prompts.history_analysis_template,
                "{content}",
            ),
            (
                "prompts.message_analysis_template",
                &prompts.message_analysis_template,
                "{content}",
            ),
            ("prompts.pdf_summary_template", &prompts.pdf_summary_template, "{text}"),
        ] {
            if !template.contains(placeholder) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must contain {placeholder}"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

fn validate_generation(field: &str, config: &GenerationConfig) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "{field}.temperature must be between 0.0 and 2.0"
        )));
    }
    if !(config.top_p > 0.0 && config.top_p <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "{field}.top_p must be in (0.0, 1.0]"
        )));
    }
    if config.max_output_tokens == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{field}.max_output_tokens must be > 0"
        )));
    }
    Ok(())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

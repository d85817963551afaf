use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

const DEFAULT_HUGGINGFACE_API_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// No model is called; every quiz comes from the fallback generator.
    None,
    HuggingFace,
    Endpoint,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(Self::None),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "endpoint" => Ok(Self::Endpoint),
            other => Err(format!("unknown LLM provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub upload_dir: String,
    pub max_file_size: usize,
    pub max_questions: usize,
    pub min_document_chars: usize,
    pub llm_provider: LlmProvider,
    pub llm_api_endpoint: String,
    pub huggingface_api_url: String,
    pub huggingface_token: Option<String>,
    pub llm_timeout_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3001"),
            upload_dir: get_env_or("UPLOAD_DIR", "uploads"),
            max_file_size: get_env_parse_or("MAX_FILE_SIZE", 10 * 1024 * 1024)?,
            max_questions: get_env_parse_or("MAX_QUESTIONS", 10)?,
            min_document_chars: get_env_parse_or("MIN_DOCUMENT_CHARS", 100)?,
            llm_provider: get_env_parse_or("LLM_PROVIDER", LlmProvider::None)?,
            llm_api_endpoint: get_env_or("LLM_API_ENDPOINT", "http://localhost:8000/generate"),
            huggingface_api_url: get_env_or("HUGGINGFACE_API_URL", DEFAULT_HUGGINGFACE_API_URL),
            huggingface_token: env::var("HUGGINGFACE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            llm_timeout_secs: get_env_parse_or("LLM_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3001".to_string(),
            upload_dir: "uploads".to_string(),
            max_file_size: 10 * 1024 * 1024,
            max_questions: 10,
            min_document_chars: 100,
            llm_provider: LlmProvider::None,
            llm_api_endpoint: "http://localhost:8000/generate".to_string(),
            huggingface_api_url: DEFAULT_HUGGINGFACE_API_URL.to_string(),
            huggingface_token: None,
            llm_timeout_secs: 30,
        }
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

use eco_detective_core::tts::DEFAULT_TTS_BASE_URL;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported backends for chat completions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatProvider {
    Azure,
    OpenAI,
}

/// Azure Custom Vision prediction settings.
#[derive(Clone, Debug)]
pub struct CustomVisionConfig {
    pub endpoint: String,
    pub key: String,
    pub project_id: String,
    pub iteration_name: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub chat_provider: ChatProvider,
    pub azure_openai_api_key: Option<String>,
    pub azure_openai_endpoint: Option<String>,
    pub azure_openai_version: String,
    pub openai_api_key: Option<String>,
    pub chat_model: String,
    pub custom_vision: CustomVisionConfig,
    pub speech_key: String,
    pub speech_region: String,
    pub speech_endpoint: Option<String>,
    pub tts_base_url: String,
    pub static_dir: PathBuf,
    pub prompts_path: PathBuf,
    pub work_dir: PathBuf,
    pub log_level: Level,
}

/// A set-but-empty variable counts as missing.
fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:7860".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("CHAT_PROVIDER").unwrap_or_else(|_| "azure".to_string());
        let chat_provider = match provider_str.to_lowercase().as_str() {
            "azure" => ChatProvider::Azure,
            "openai" => ChatProvider::OpenAI,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CHAT_PROVIDER".to_string(),
                    format!("'{}' is not one of 'azure', 'openai'", other),
                ));
            }
        };

        let azure_openai_api_key = optional("AZURE_OPENAI_API_KEY");
        let azure_openai_endpoint = optional("AZURE_OPENAI_ENDPOINT");
        let azure_openai_version =
            optional("AZURE_OPENAI_VERSION").unwrap_or_else(|| "2024-06-01".to_string());
        let openai_api_key = optional("OPENAI_API_KEY");

        match chat_provider {
            ChatProvider::Azure => {
                if azure_openai_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "AZURE_OPENAI_API_KEY must be set for 'azure' provider".to_string(),
                    ));
                }
                if azure_openai_endpoint.is_none() {
                    return Err(ConfigError::MissingVar(
                        "AZURE_OPENAI_ENDPOINT must be set for 'azure' provider".to_string(),
                    ));
                }
            }
            ChatProvider::OpenAI => {
                if openai_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
                    ));
                }
            }
        }

        let chat_model = optional("CHAT_MODEL").unwrap_or_else(|| "a24-gpt-4o-mini".to_string());

        let custom_vision = CustomVisionConfig {
            endpoint: required("CUSTOM_VISION_ENDPOINT")?,
            key: required("CUSTOM_VISION_KEY")?,
            project_id: required("CUSTOM_VISION_PROJECT_ID")?,
            iteration_name: required("CUSTOM_VISION_ITERATION_NAME")?,
        };

        let speech_key = required("SPEECH_KEY")?;
        let speech_region =
            optional("SPEECH_REGION").unwrap_or_else(|| "koreacentral".to_string());
        let speech_endpoint = optional("SPEECH_ENDPOINT");

        let tts_base_url =
            optional("TTS_BASE_URL").unwrap_or_else(|| DEFAULT_TTS_BASE_URL.to_string());

        let static_dir = optional("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./static"));
        let prompts_path = optional("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./prompts"));
        let work_dir = optional("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("eco-detective"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            chat_provider,
            azure_openai_api_key,
            azure_openai_endpoint,
            azure_openai_version,
            openai_api_key,
            chat_model,
            custom_vision,
            speech_key,
            speech_region,
            speech_endpoint,
            tts_base_url,
            static_dir,
            prompts_path,
            work_dir,
            log_level,
        })
    }

    /// Directory holding synthesized explanations, served under `/audio`.
    pub fn audio_dir(&self) -> PathBuf {
        self.work_dir.join("audio")
    }

    /// Directory for per-request scratch files (uploads, utterances).
    pub fn scratch_dir(&self) -> PathBuf {
        self.work_dir.join("scratch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    const ALL_VARS: &[&str] = &[
        "BIND_ADDRESS",
        "CHAT_PROVIDER",
        "AZURE_OPENAI_API_KEY",
        "AZURE_OPENAI_ENDPOINT",
        "AZURE_OPENAI_VERSION",
        "OPENAI_API_KEY",
        "CHAT_MODEL",
        "CUSTOM_VISION_ENDPOINT",
        "CUSTOM_VISION_KEY",
        "CUSTOM_VISION_PROJECT_ID",
        "CUSTOM_VISION_ITERATION_NAME",
        "SPEECH_KEY",
        "SPEECH_REGION",
        "SPEECH_ENDPOINT",
        "TTS_BASE_URL",
        "STATIC_DIR",
        "PROMPTS_PATH",
        "WORK_DIR",
        "RUST_LOG",
    ];

    fn clear_env_vars() {
        unsafe {
            for var in ALL_VARS {
                env::remove_var(var);
            }
        }
    }

    fn set_minimal_env_azure() {
        unsafe {
            env::set_var("AZURE_OPENAI_API_KEY", "test-azure-key");
            env::set_var("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com");
            env::set_var("CUSTOM_VISION_ENDPOINT", "https://cv.example.com");
            env::set_var("CUSTOM_VISION_KEY", "test-cv-key");
            env::set_var("CUSTOM_VISION_PROJECT_ID", "proj-1");
            env::set_var("CUSTOM_VISION_ITERATION_NAME", "Iteration1");
            env::set_var("SPEECH_KEY", "test-speech-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal_azure() {
        clear_env_vars();
        set_minimal_env_azure();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:7860");
        assert_eq!(config.chat_provider, ChatProvider::Azure);
        assert_eq!(config.azure_openai_api_key.as_deref(), Some("test-azure-key"));
        assert_eq!(config.azure_openai_version, "2024-06-01");
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.chat_model, "a24-gpt-4o-mini");
        assert_eq!(config.custom_vision.project_id, "proj-1");
        assert_eq!(config.speech_region, "koreacentral");
        assert_eq!(config.speech_endpoint, None);
        assert_eq!(config.tts_base_url, "https://translate.google.com");
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.prompts_path, PathBuf::from("./prompts"));
        assert_eq!(config.work_dir, env::temp_dir().join("eco-detective"));
        assert_eq!(config.audio_dir(), config.work_dir.join("audio"));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_openai_provider() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::remove_var("AZURE_OPENAI_API_KEY");
            env::remove_var("AZURE_OPENAI_ENDPOINT");
            env::set_var("CHAT_PROVIDER", "OpenAI");
            env::set_var("OPENAI_API_KEY", "test-openai-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.chat_provider, ChatProvider::OpenAI);
        assert_eq!(config.openai_api_key.as_deref(), Some("test-openai-key"));
        assert_eq!(config.azure_openai_api_key, None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::set_var("BIND_ADDRESS", "0.0.0.0:8080");
            env::set_var("AZURE_OPENAI_VERSION", "2025-01-01-preview");
            env::set_var("CHAT_MODEL", "gpt-4o");
            env::set_var("SPEECH_REGION", "eastus");
            env::set_var("SPEECH_ENDPOINT", "http://localhost:9000/stt");
            env::set_var("TTS_BASE_URL", "http://localhost:9001");
            env::set_var("STATIC_DIR", "/srv/static");
            env::set_var("PROMPTS_PATH", "/srv/prompts");
            env::set_var("WORK_DIR", "/var/lib/eco-detective");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.azure_openai_version, "2025-01-01-preview");
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.speech_region, "eastus");
        assert_eq!(
            config.speech_endpoint.as_deref(),
            Some("http://localhost:9000/stt")
        );
        assert_eq!(config.tts_base_url, "http://localhost:9001");
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.prompts_path, PathBuf::from("/srv/prompts"));
        assert_eq!(
            config.scratch_dir(),
            PathBuf::from("/var/lib/eco-detective/scratch")
        );
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_provider() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::set_var("CHAT_PROVIDER", "gemini");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "CHAT_PROVIDER"),
            _ => panic!("Expected InvalidValue for CHAT_PROVIDER"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_azure_endpoint() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::remove_var("AZURE_OPENAI_ENDPOINT");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::MissingVar(msg) => assert!(msg.contains("AZURE_OPENAI_ENDPOINT")),
            _ => panic!("Expected MissingVar for AZURE_OPENAI_ENDPOINT"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_openai_key() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::set_var("CHAT_PROVIDER", "openai");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::MissingVar(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            _ => panic!("Expected MissingVar for OPENAI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_custom_vision_and_speech() {
        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::remove_var("CUSTOM_VISION_KEY");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::MissingVar(var) => assert_eq!(var, "CUSTOM_VISION_KEY"),
            _ => panic!("Expected MissingVar for CUSTOM_VISION_KEY"),
        }

        clear_env_vars();
        set_minimal_env_azure();
        unsafe {
            env::remove_var("SPEECH_KEY");
        }
        match Config::from_env().unwrap_err() {
            ConfigError::MissingVar(var) => assert_eq!(var, "SPEECH_KEY"),
            _ => panic!("Expected MissingVar for SPEECH_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_empty_required_var_is_missing() {
        for var in ["SPEECH_KEY", "CUSTOM_VISION_ENDPOINT"] {
            clear_env_vars();
            set_minimal_env_azure();
            unsafe {
                env::set_var(var, "");
            }
            match Config::from_env().unwrap_err() {
                ConfigError::MissingVar(missing) => assert_eq!(missing, var),
                other => panic!("Expected MissingVar for {}, got {:?}", var, other),
            }
        }
    }
}

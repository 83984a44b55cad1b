use std::{collections::HashMap, env, path::Path};
use serde::Deserialize;
use tracing::{debug, info};
use crate::middleware::add_missing_headers::{AddMissingHeadersConfig, HeaderPolicy};
use crate::middleware::config::{MiddlewareConfig, MiddlewareType};

mod error;
pub mod logging;
mod server;

pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use server::{parse_env_var, ServerSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 미들웨어 설정
    #[serde(default, alias = "middlewares")]
    pub middleware: HashMap<String, MiddlewareConfig>,
}

impl Settings {
    /// `PROXY_CONFIG_FILE`이 설정되어 있으면 TOML 파일에서, 아니면 환경 변수에서 로드합니다.
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("PROXY_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("설정 파일 로드: {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| SettingsError::FileError {
            path: path.to_string_lossy().to_string(),
            error: e,
        })?;

        let settings = Self::from_toml_str(&content)?;
        info!("설정 파일 로드 완료: {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            middleware: HashMap::new(),
        };

        // 설정 생성 시점에 바로 검증
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        for (name, middleware) in &self.middleware {
            if !middleware.enabled {
                continue;
            }
            match middleware.middleware_type {
                MiddlewareType::AddMissingHeaders => {
                    AddMissingHeadersConfig::from_settings(&middleware.settings)
                        .and_then(|config| HeaderPolicy::try_from(&config))
                        .map_err(|source| SettingsError::InvalidMiddleware {
                            name: name.clone(),
                            source,
                        })?;
                }
            }
        }

        Ok(())
    }

    /// Docker 라벨을 통해 미들웨어 설정을 추가
    pub fn merge_docker_labels(&mut self, labels: &HashMap<String, String>) -> Result<()> {
        for (name, config) in MiddlewareConfig::from_labels(labels) {
            self.add_middleware(name, config)?;
        }
        self.validate()
    }

    pub fn add_middleware(&mut self, name: String, config: MiddlewareConfig) -> Result<()> {
        if self.middleware.contains_key(&name) {
            return Err(SettingsError::DuplicateMiddleware(name));
        }
        debug!("미들웨어 추가: {}", name);
        self.middleware.insert(name, config);
        Ok(())
    }
}

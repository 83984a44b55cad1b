use super::rules::{BypassRule, CheckMode};
use crate::middleware::MiddlewareError;
use hyper::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 빠진 헤더 추가 미들웨어 설정
///
/// # Docker 라벨 예시
///
/// ```yaml
/// labels:
///   - "rproxy.http.middlewares.defaults.type=add-missing-headers"
///   - "rproxy.http.middlewares.defaults.addMissingHeaders.requestHeaders.X-Forwarded-Proto=https"
///   - "rproxy.http.middlewares.defaults.addMissingHeaders.responseHeaders.Cache-Control=no-store"
///   - "rproxy.http.middlewares.defaults.addMissingHeaders.strictHeaderCheck=false"
///   - "rproxy.http.middlewares.defaults.addMissingHeaders.bypassHeaders.X-Accel-Buffering="
/// ```
///
/// # TOML 예시
///
/// ```toml
/// strictHeaderCheck = true
///
/// [requestHeaders]
/// X-Forwarded-Proto = "https"
///
/// [responseHeaders]
/// Cache-Control = "no-store"
///
/// [bypassHeaders]
/// X-Skip-Processing = "true"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddMissingHeadersConfig {
    /// 요청에 없으면 추가할 헤더
    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,

    /// 응답에 없으면 추가할 헤더
    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,

    /// true면 헤더 키가 없을 때만, false면 값이 비어 있을 때도 추가
    #[serde(default = "default_strict_header_check")]
    pub strict_header_check: bool,

    /// 본문 기록마다 수행하는 자동 flush 비활성화
    #[serde(default)]
    pub disable_explicit_flush: bool,

    /// 미들웨어 우회 조건 (빈 값은 존재 여부만 확인)
    #[serde(default)]
    pub bypass_headers: BTreeMap<String, String>,
}

fn default_strict_header_check() -> bool {
    true
}

impl Default for AddMissingHeadersConfig {
    fn default() -> Self {
        Self {
            request_headers: BTreeMap::new(),
            response_headers: BTreeMap::new(),
            strict_header_check: default_strict_header_check(),
            disable_explicit_flush: false,
            bypass_headers: BTreeMap::new(),
        }
    }
}

impl AddMissingHeadersConfig {
    const LABEL_PREFIX: &'static str = "addMissingHeaders.";

    /// 평탄화된 라벨 설정에서 파싱합니다.
    ///
    /// 키는 `addMissingHeaders.` 접두사가 붙은 형태를 기대하며 다른 키는 무시합니다.
    pub fn from_flat_map(settings: &HashMap<String, String>) -> Result<Self, MiddlewareError> {
        let mut config = Self::default();

        for (key, value) in settings {
            let Some(key) = key.strip_prefix(Self::LABEL_PREFIX) else {
                continue;
            };

            if let Some(name) = key.strip_prefix("requestHeaders.") {
                config.request_headers.insert(name.to_string(), value.clone());
            } else if let Some(name) = key.strip_prefix("responseHeaders.") {
                config.response_headers.insert(name.to_string(), value.clone());
            } else if let Some(name) = key.strip_prefix("bypassHeaders.") {
                config.bypass_headers.insert(name.to_string(), value.clone());
            } else {
                match key {
                    "strictHeaderCheck" => config.strict_header_check = parse_bool(key, value)?,
                    "disableExplicitFlush" => config.disable_explicit_flush = parse_bool(key, value)?,
                    _ => {
                        return Err(MiddlewareError::Config(format!(
                            "알 수 없는 설정 키: {}{}",
                            Self::LABEL_PREFIX,
                            key
                        )))
                    }
                }
            }
        }

        Ok(config)
    }

    /// TOML 문자열에서 파싱합니다.
    pub fn from_toml(content: &str) -> Result<Self, MiddlewareError> {
        toml::from_str(content).map_err(|e| MiddlewareError::Config(e.to_string()))
    }

    /// 미들웨어 설정 항목에서 변환합니다.
    ///
    /// 라벨에서 온 평탄화된 키와 TOML에서 온 구조화된 값을 모두 받습니다.
    pub fn from_settings(settings: &HashMap<String, serde_json::Value>) -> Result<Self, MiddlewareError> {
        if settings.keys().any(|k| k.starts_with(Self::LABEL_PREFIX)) {
            let flat: HashMap<String, String> = settings
                .iter()
                .map(|(k, v)| {
                    let value = v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string());
                    (k.clone(), value)
                })
                .collect();
            return Self::from_flat_map(&flat);
        }

        Ok(serde_json::from_value(serde_json::to_value(settings)?)?)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, MiddlewareError> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(MiddlewareError::Config(format!(
            "{} 값은 true 또는 false 여야 합니다: {}",
            key, value
        ))),
    }
}

/// 검증된 미들웨어 설정
///
/// 미들웨어 생성 시 한 번 만들어지고, 이후 모든 요청이 읽기 전용으로 공유합니다.
#[derive(Debug, Clone, Default)]
pub struct HeaderPolicy {
    pub request_headers: Vec<(HeaderName, HeaderValue)>,
    pub response_headers: Vec<(HeaderName, HeaderValue)>,
    pub bypass_rules: Vec<BypassRule>,
    pub mode: CheckMode,
    pub disable_explicit_flush: bool,
}

impl TryFrom<&AddMissingHeadersConfig> for HeaderPolicy {
    type Error = MiddlewareError;

    fn try_from(config: &AddMissingHeadersConfig) -> Result<Self, Self::Error> {
        let bypass_rules = parse_headers(&config.bypass_headers)?
            .into_iter()
            .map(|(name, value)| BypassRule::new(name, value))
            .collect();

        Ok(Self {
            request_headers: parse_headers(&config.request_headers)?,
            response_headers: parse_headers(&config.response_headers)?,
            bypass_rules,
            mode: CheckMode::from_strict(config.strict_header_check),
            disable_explicit_flush: config.disable_explicit_flush,
        })
    }
}

fn parse_headers(headers: &BTreeMap<String, String>) -> Result<Vec<(HeaderName, HeaderValue)>, MiddlewareError> {
    headers
        .iter()
        .map(|(name, value)| {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|source| {
                MiddlewareError::InvalidHeaderName {
                    name: name.clone(),
                    source,
                }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|source| {
                MiddlewareError::InvalidHeaderValue {
                    name: name.clone(),
                    source,
                }
            })?;
            Ok((header_name, header_value))
        })
        .collect()
}

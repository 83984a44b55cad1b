use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 미들웨어 종류
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MiddlewareType {
    AddMissingHeaders,
}

impl std::str::FromStr for MiddlewareType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add-missing-headers" => Ok(Self::AddMissingHeaders),
            _ => Err(format!("지원하지 않는 미들웨어 타입: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// 미들웨어 타입
    pub middleware_type: MiddlewareType,

    /// 미들웨어 활성화 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 실행 순서 (낮은 숫자가 먼저 실행)
    #[serde(default)]
    pub order: i32,

    /// 미들웨어별 설정
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl MiddlewareConfig {
    const LABEL_PREFIX: &'static str = "rproxy.http.middlewares.";

    /// Docker 라벨에서 미들웨어 설정을 파싱합니다.
    ///
    /// 알 수 없는 타입의 미들웨어는 건너뜁니다.
    pub fn from_labels(labels: &HashMap<String, String>) -> Vec<(String, Self)> {
        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();

        for (key, value) in labels {
            if let Some(rest) = key.strip_prefix(Self::LABEL_PREFIX) {
                if let Some((name, setting)) = rest.split_once('.') {
                    groups
                        .entry(name.to_string())
                        .or_default()
                        .insert(setting.to_string(), value.clone());
                }
            }
        }

        let mut configs = Vec::new();
        for (name, mut settings) in groups {
            let Some(middleware_type) = settings
                .remove("type")
                .and_then(|t| t.parse::<MiddlewareType>().ok())
            else {
                continue;
            };

            let enabled = settings
                .remove("enabled")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true);
            let order = settings
                .remove("order")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);

            let config = MiddlewareConfig {
                middleware_type,
                enabled,
                order,
                settings: settings
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect(),
            };
            configs.push((name, config));
        }

        configs.sort_by(|a, b| a.0.cmp(&b.0));
        configs
    }

    /// TOML 설정에서 미들웨어 설정을 파싱합니다.
    pub fn from_toml(config: &str) -> Result<HashMap<String, Self>, toml::de::Error> {
        #[derive(Deserialize)]
        struct Config {
            #[serde(default)]
            middlewares: HashMap<String, MiddlewareConfig>,
        }

        let config: Config = toml::from_str(config)?;
        Ok(config.middlewares)
    }
}

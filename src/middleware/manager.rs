use super::add_missing_headers::{AddMissingHeaders, AddMissingHeadersConfig};
use super::config::MiddlewareType;
use super::{Handler, MiddlewareConfig, MiddlewareError};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 미들웨어 설정으로부터 `next`를 감싸는 미들웨어를 생성합니다.
fn create_middleware(
    name: &str,
    config: &MiddlewareConfig,
    next: Arc<dyn Handler>,
) -> Result<Arc<dyn Handler>, MiddlewareError> {
    debug!("미들웨어 생성 시작: name={}, type={:?}", name, config.middleware_type);

    match config.middleware_type {
        MiddlewareType::AddMissingHeaders => {
            let settings = AddMissingHeadersConfig::from_settings(&config.settings)?;
            debug!("생성된 헤더 설정: {:?}", settings);
            Ok(Arc::new(AddMissingHeaders::from_config(name, &settings, next)?))
        }
    }
}

/// 활성화된 미들웨어로 핸들러 체인을 구성합니다.
///
/// `order`가 낮은 미들웨어가 바깥쪽에 위치해 먼저 실행됩니다.
/// 생성에 실패한 미들웨어는 로그를 남기고 건너뜁니다.
pub fn build_chain<'a, I>(configs: I, backend: Arc<dyn Handler>) -> Arc<dyn Handler>
where
    I: IntoIterator<Item = (&'a String, &'a MiddlewareConfig)>,
{
    let mut ordered: Vec<_> = configs
        .into_iter()
        .filter(|(_, config)| config.enabled)
        .collect();
    ordered.sort_by(|a, b| a.1.order.cmp(&b.1.order).then_with(|| a.0.cmp(b.0)));

    // 안쪽부터 감싸야 하므로 역순으로 조립
    let mut handler = backend;
    for (name, config) in ordered.into_iter().rev() {
        match create_middleware(name, config, handler.clone()) {
            Ok(middleware) => {
                info!(middleware = %name, order = config.order, "미들웨어 등록");
                handler = middleware;
            }
            Err(e) => {
                error!("미들웨어 생성 실패: {} ({})", name, e);
                continue;
            }
        }
    }

    handler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{handler_fn, BufferedResponse, Request, ResponseSink};
    use bytes::Bytes;
    use http_body_util::Full;
    use hyper::StatusCode;
    use std::collections::HashMap;

    fn middleware(order: i32, enabled: bool, header: &str, value: &str) -> MiddlewareConfig {
        let mut settings = HashMap::new();
        settings.insert(
            format!("addMissingHeaders.responseHeaders.{}", header),
            serde_json::Value::String(value.to_string()),
        );
        MiddlewareConfig {
            middleware_type: MiddlewareType::AddMissingHeaders,
            enabled,
            order,
            settings,
        }
    }

    fn backend() -> Arc<dyn Handler> {
        Arc::new(handler_fn(|_req, sink| {
            sink.write_head(StatusCode::OK);
        }))
    }

    #[tokio::test]
    async fn test_lower_order_runs_first() {
        let mut configs = HashMap::new();
        configs.insert("outer".to_string(), middleware(1, true, "X-Layer", "outer"));
        configs.insert("inner".to_string(), middleware(2, true, "X-Layer", "inner"));

        let chain = build_chain(&configs, backend());
        let mut res = BufferedResponse::new();
        chain.serve(Request::new(Full::new(Bytes::new())), &mut res).await;

        // 안쪽 미들웨어가 먼저 확정 시점을 맞으므로 안쪽 값이 남는다
        assert_eq!(res.committed_headers().unwrap()["x-layer"], "inner");
    }

    #[tokio::test]
    async fn test_disabled_and_invalid_middleware_are_skipped() {
        let mut configs = HashMap::new();
        configs.insert("off".to_string(), middleware(1, false, "X-Off", "1"));
        configs.insert("broken".to_string(), middleware(2, true, "Bad Header", "1"));
        configs.insert("ok".to_string(), middleware(3, true, "X-Ok", "1"));

        let chain = build_chain(&configs, backend());
        let mut res = BufferedResponse::new();
        chain.serve(Request::new(Full::new(Bytes::new())), &mut res).await;

        let headers = res.committed_headers().unwrap();
        assert!(!headers.contains_key("x-off"));
        assert_eq!(headers["x-ok"], "1");
    }
}

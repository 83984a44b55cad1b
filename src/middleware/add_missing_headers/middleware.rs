use super::config::{AddMissingHeadersConfig, HeaderPolicy};
use super::interceptor::ResponseInterceptor;
use super::rules::{augment, should_bypass};
use crate::middleware::{Handler, MiddlewareError, Request, ResponseSink};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// 빠진 헤더 추가 미들웨어
///
/// 요청 헤더는 다음 핸들러로 넘기기 전에, 응답 헤더는 응답이 확정되는 순간에
/// 채워 넣습니다. 이미 값이 있는 헤더는 덮어쓰지 않습니다.
pub struct AddMissingHeaders {
    name: String,
    next: Arc<dyn Handler>,
    policy: Arc<HeaderPolicy>,
}

impl AddMissingHeaders {
    pub fn new(name: impl Into<String>, policy: HeaderPolicy, next: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            next,
            policy: Arc::new(policy),
        }
    }

    /// 원본 설정을 검증한 뒤 미들웨어를 생성합니다.
    pub fn from_config(
        name: impl Into<String>,
        config: &AddMissingHeadersConfig,
        next: Arc<dyn Handler>,
    ) -> Result<Self, MiddlewareError> {
        Ok(Self::new(name, HeaderPolicy::try_from(config)?, next))
    }
}

#[async_trait]
impl Handler for AddMissingHeaders {
    async fn serve(&self, mut req: Request, sink: &mut dyn ResponseSink) {
        let policy = &*self.policy;

        if should_bypass(req.headers(), &policy.bypass_rules) {
            debug!(middleware = %self.name, "우회 헤더 감지, 미들웨어 건너뜀");
            self.next.serve(req, sink).await;
            return;
        }

        augment(req.headers_mut(), &policy.request_headers, policy.mode);

        if policy.response_headers.is_empty() {
            self.next.serve(req, sink).await;
            return;
        }

        let mut interceptor = ResponseInterceptor::new(
            sink,
            &policy.response_headers,
            policy.mode,
            policy.disable_explicit_flush,
        );
        self.next.serve(req, &mut interceptor).await;
    }
}

use super::{Request, ResponseSink};
use async_trait::async_trait;
use std::sync::Arc;

/// 핸들러 트레이트
///
/// 요청을 받아 응답 싱크에 상태 코드, 헤더, 본문을 기록합니다.
/// 미들웨어는 다음 핸들러를 감싸는 또 하나의 핸들러입니다.
#[async_trait]
pub trait Handler: Send + Sync {
    /// HTTP 요청을 처리합니다.
    async fn serve(&self, req: Request, sink: &mut dyn ResponseSink);
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn serve(&self, req: Request, sink: &mut dyn ResponseSink) {
        (**self).serve(req, sink).await
    }
}

/// 동기 클로저를 핸들러로 사용하기 위한 어댑터
pub struct HandlerFn<F> {
    f: F,
}

/// 클로저로부터 핸들러를 생성합니다.
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(Request, &mut dyn ResponseSink) + Send + Sync,
{
    HandlerFn { f }
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(Request, &mut dyn ResponseSink) + Send + Sync,
{
    async fn serve(&self, req: Request, sink: &mut dyn ResponseSink) {
        (self.f)(req, sink)
    }
}

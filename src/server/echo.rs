use crate::middleware::{Handler, Request, ResponseSink};
use async_trait::async_trait;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::StatusCode;
use tracing::warn;

/// 받은 요청 헤더를 본문으로 돌려주는 데모 백엔드
///
/// 미들웨어가 추가한 요청 헤더를 확인하는 데 사용합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn serve(&self, req: Request, sink: &mut dyn ResponseSink) {
        let mut body = String::new();
        for (name, value) in req.headers() {
            body.push_str(name.as_str());
            body.push_str(": ");
            body.push_str(&String::from_utf8_lossy(value.as_bytes()));
            body.push('\n');
        }

        sink.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        sink.write_head(StatusCode::OK);

        if let Err(e) = sink.write(body.as_bytes()) {
            warn!(error = %e, "에코 응답 기록 실패");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::BufferedResponse;
    use bytes::Bytes;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_echoes_request_headers() {
        let req = hyper::Request::builder()
            .header("X-Echo", "hello")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let mut res = BufferedResponse::new();
        EchoHandler.serve(req, &mut res).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body(), b"x-echo: hello\n");
    }
}

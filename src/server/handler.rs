use super::body::ChannelBody;
use super::response::StreamingResponse;
use crate::middleware::Handler;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// hyper 요청을 미들웨어 체인으로 전달하는 어댑터
pub struct RequestHandler {
    handler: Arc<dyn Handler>,
}

impl RequestHandler {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub async fn handle_request(
        &self,
        mut req: Request<Incoming>,
    ) -> Result<Response<ChannelBody>, Infallible> {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        // 1. 업그레이드 핸들은 응답 싱크가 가져감
        let upgrade = hyper::upgrade::on(&mut req);

        // 2. 요청 본문 수집
        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(error = %e, "요청 본문 읽기 실패");
                return Ok(error_response(StatusCode::BAD_REQUEST, "Bad Request"));
            }
        };
        let req = Request::from_parts(parts, Full::new(body));

        // 3. 핸들러 체인 실행
        let (mut sink, head_rx, body) = StreamingResponse::new(Some(upgrade));
        let handler = self.handler.clone();
        tokio::spawn(async move {
            handler.serve(req, &mut sink).await;
            if let Err(e) = sink.finish() {
                debug!(error = %e, "응답 본문 전송 중단");
            }
        });

        // 4. 응답이 확정되면 바로 반환하고 본문은 스트리밍
        match head_rx.await {
            Ok((status, headers)) => {
                info!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "요청 처리"
                );
                let mut response = Response::new(body);
                *response.status_mut() = status;
                *response.headers_mut() = headers;
                Ok(response)
            }
            Err(_) => {
                error!(method = %method, path = %path, "핸들러가 응답을 확정하지 못하고 종료됨");
                Ok(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
            }
        }
    }

    pub async fn handle_connection<I>(&self, io: I) -> Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(io, service_fn(|req| self.handle_request(req)))
            .with_upgrades()
            .await
    }
}

fn error_response(status: StatusCode, message: &'static str) -> Response<ChannelBody> {
    let mut response = Response::new(ChannelBody::from_static(message));
    *response.status_mut() = status;
    response
}

//! 응답 싱크
//!
//! 핸들러가 상태 코드, 헤더, 본문을 기록하는 출력 스트림과
//! 스트림이 선택적으로 제공하는 기능(flush, 연결 가로채기)을 정의합니다.

use super::MiddlewareError;
use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::upgrade::{OnUpgrade, Upgraded};
use hyper::{HeaderMap, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::io;

/// 응답 출력 스트림
///
/// 상태 코드와 헤더는 첫 `write_head` 또는 첫 `write` 시점에 확정(commit)됩니다.
/// 확정 이후의 `write_head` 호출은 무시해야 합니다.
pub trait ResponseSink: Send {
    /// 현재 헤더 컬렉션 (확정 전에는 수정 가능한 실제 컬렉션)
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// 상태 코드와 헤더를 확정합니다.
    fn write_head(&mut self, status: StatusCode);

    /// 본문을 기록합니다. 확정 전이라면 200으로 먼저 확정합니다.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// flush 기능 조회
    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        None
    }

    /// 연결 가로채기 기능 조회
    fn hijacker(&mut self) -> Option<&mut dyn Hijack> {
        None
    }

    /// 진단 메시지에 쓰이는 구체 타입 이름
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 버퍼링된 데이터를 클라이언트로 즉시 내보내는 기능
pub trait Flush {
    fn flush(&mut self) -> io::Result<()>;
}

/// HTTP 연결을 넘겨받는 기능
pub trait Hijack {
    fn hijack(&mut self) -> Result<HijackedConnection, MiddlewareError>;
}

/// 가로챈 연결
///
/// 101 응답이 전송된 뒤 `upgraded()`가 원시 연결을 돌려줍니다.
#[derive(Debug)]
pub struct HijackedConnection {
    upgrade: OnUpgrade,
}

impl HijackedConnection {
    pub fn new(upgrade: OnUpgrade) -> Self {
        Self { upgrade }
    }

    pub async fn upgraded(self) -> Result<TokioIo<Upgraded>, hyper::Error> {
        self.upgrade.await.map(TokioIo::new)
    }
}

/// 메모리에 응답을 기록하는 싱크
///
/// 테스트와 단순한 호스트에서 사용합니다. flush는 지원하지만
/// 연결 가로채기는 지원하지 않습니다.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    committed_headers: Option<HeaderMap>,
    body: BytesMut,
    flushes: usize,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// 확정된 상태 코드. 아무것도 기록되지 않았다면 200입니다.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// 확정 시점에 기록된 헤더 스냅샷
    pub fn committed_headers(&self) -> Option<&HeaderMap> {
        self.committed_headers.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// 기록된 내용을 hyper 응답으로 변환합니다.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        let headers = self.committed_headers.unwrap_or(self.headers);

        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(status);
        self.committed_headers = Some(self.headers.clone());
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }
}

impl Flush for BufferedResponse {
    fn flush(&mut self) -> io::Result<()> {
        self.write_head(StatusCode::OK);
        self.flushes += 1;
        Ok(())
    }
}

use super::rules::{should_inject, CheckMode};
use crate::middleware::sink::{Flush, Hijack, HijackedConnection, ResponseSink};
use crate::middleware::MiddlewareError;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use std::io;
use tracing::{debug, warn};

/// 응답 헤더 주입 래퍼
///
/// 상태 코드와 헤더가 처음 확정되는 순간 한 번만 빠진 응답 헤더를 채워 넣고,
/// 이후 본문 기록과 flush, 연결 가로채기는 하위 싱크로 그대로 전달합니다.
pub struct ResponseInterceptor<'a> {
    inner: &'a mut dyn ResponseSink,
    response_headers: &'a [(HeaderName, HeaderValue)],
    mode: CheckMode,
    disable_explicit_flush: bool,
    can_flush: bool,
    headers_sent: bool,
    status: StatusCode,
}

impl<'a> ResponseInterceptor<'a> {
    pub fn new(
        inner: &'a mut dyn ResponseSink,
        response_headers: &'a [(HeaderName, HeaderValue)],
        mode: CheckMode,
        disable_explicit_flush: bool,
    ) -> Self {
        let can_flush = inner.flusher().is_some();
        Self {
            inner,
            response_headers,
            mode,
            disable_explicit_flush,
            can_flush,
            headers_sent: false,
            status: StatusCode::OK,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.headers_sent
    }

    /// 확정된 (또는 확정될) 상태 코드
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn add_missing_headers(&mut self) {
        let headers = self.inner.headers_mut();
        for (name, value) in self.response_headers {
            if should_inject(headers, name, self.mode) {
                debug!(header = %name, "응답 헤더 추가");
                headers.insert(name.clone(), value.clone());
            }
        }
    }
}

impl ResponseSink for ResponseInterceptor<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_head(&mut self, status: StatusCode) {
        if self.headers_sent {
            return;
        }

        self.add_missing_headers();
        self.inner.write_head(status);

        self.status = status;
        self.headers_sent = true;
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(self.status);

        // flush는 기록 결과와 무관하게 수행, 오류는 기록 쪽이 우선
        let written = self.inner.write(buf);

        if !self.disable_explicit_flush {
            if let Some(flusher) = self.inner.flusher() {
                let flushed = flusher.flush();
                if written.is_ok() {
                    flushed?;
                }
            }
        }

        written
    }

    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        if self.can_flush {
            Some(self)
        } else {
            None
        }
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijack> {
        Some(self)
    }
}

impl Flush for ResponseInterceptor<'_> {
    /// 확정 전이라면 헤더를 먼저 채워 확정한 뒤 flush 합니다.
    fn flush(&mut self) -> io::Result<()> {
        self.write_head(self.status);
        match self.inner.flusher() {
            Some(flusher) => flusher.flush(),
            None => Ok(()),
        }
    }
}

impl Hijack for ResponseInterceptor<'_> {
    fn hijack(&mut self) -> Result<HijackedConnection, MiddlewareError> {
        let type_name = self.inner.type_name();
        match self.inner.hijacker() {
            Some(hijacker) => hijacker.hijack(),
            None => {
                warn!(sink = type_name, "연결 가로채기 미지원");
                Err(MiddlewareError::HijackUnsupported { type_name })
            }
        }
    }
}

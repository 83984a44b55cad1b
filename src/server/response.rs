use super::body::ChannelBody;
use crate::middleware::{Flush, Hijack, HijackedConnection, MiddlewareError, ResponseSink};
use bytes::{Bytes, BytesMut};
use hyper::upgrade::OnUpgrade;
use hyper::{HeaderMap, StatusCode};
use std::io;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// 확정된 상태 코드와 헤더
pub type ResponseHead = (StatusCode, HeaderMap);

/// hyper 응답으로 스트리밍되는 싱크
///
/// 상태 코드와 헤더는 확정 즉시 전송되고, 본문은 flush 될 때마다
/// 하나의 청크로 전달됩니다. 연결 업그레이드 핸들이 있으면 연결 가로채기를 지원합니다.
pub struct StreamingResponse {
    headers: HeaderMap,
    head_tx: Option<oneshot::Sender<ResponseHead>>,
    body_tx: mpsc::UnboundedSender<Bytes>,
    pending: BytesMut,
    upgrade: Option<OnUpgrade>,
}

impl StreamingResponse {
    pub fn new(upgrade: Option<OnUpgrade>) -> (Self, oneshot::Receiver<ResponseHead>, ChannelBody) {
        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, body) = ChannelBody::channel();

        let sink = Self {
            headers: HeaderMap::new(),
            head_tx: Some(head_tx),
            body_tx,
            pending: BytesMut::new(),
            upgrade,
        };
        (sink, head_rx, body)
    }

    /// 아직 확정되지 않았다면 200으로 확정하고 남은 본문을 내보냅니다.
    pub fn finish(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl ResponseSink for StreamingResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) {
        if let Some(tx) = self.head_tx.take() {
            if tx.send((status, self.headers.clone())).is_err() {
                debug!(status = status.as_u16(), "응답 헤더 수신자가 종료됨");
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK);
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijack> {
        if self.upgrade.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl Flush for StreamingResponse {
    fn flush(&mut self) -> io::Result<()> {
        self.write_head(StatusCode::OK);
        if self.pending.is_empty() {
            return Ok(());
        }

        let chunk = self.pending.split().freeze();
        self.body_tx.send(chunk).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "응답 본문 수신자가 종료되었습니다")
        })
    }
}

impl Hijack for StreamingResponse {
    fn hijack(&mut self) -> Result<HijackedConnection, MiddlewareError> {
        self.upgrade
            .take()
            .map(HijackedConnection::new)
            .ok_or(MiddlewareError::HijackUnsupported {
                type_name: std::any::type_name::<Self>(),
            })
    }
}

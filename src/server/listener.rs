use super::handler::RequestHandler;
use hyper_util::rt::TokioIo;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub struct ServerListener {
    http_listener: TcpListener,
}

impl ServerListener {
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let http_listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(error = %e, addr = %addr, "HTTP 포트 바인딩 실패");
            e
        })?;

        info!(addr = %addr, "HTTP 리스너 시작");
        Ok(Self::from_listener(http_listener))
    }

    pub fn from_listener(http_listener: TcpListener) -> Self {
        Self { http_listener }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    /// 연결을 수락하고 연결마다 태스크를 생성합니다. 반환하지 않습니다.
    pub async fn run(self, handler: Arc<RequestHandler>) {
        loop {
            match self.http_listener.accept().await {
                Ok((stream, peer)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        if let Err(err) = handler.handle_connection(io).await {
                            error!(error = %err, peer = %peer, "HTTP 연결 처리 실패");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "HTTP 연결 수락 실패");
                }
            }
        }
    }
}

//! HTTP/1 호스트
//!
//! hyper 연결 위에서 미들웨어 체인을 실행하고, 응답 싱크에 기록된 내용을
//! 스트리밍 응답으로 클라이언트에 전달합니다.

pub mod body;
pub mod echo;
pub mod handler;
pub mod listener;
pub mod response;

pub use body::ChannelBody;
pub use echo::EchoHandler;
pub use handler::RequestHandler;
pub use listener::ServerListener;
pub use response::StreamingResponse;

pub mod add_missing_headers;
pub mod config;
pub mod error;
pub mod manager;
pub mod sink;
pub mod traits;

pub use config::{MiddlewareConfig, MiddlewareType};
pub use error::MiddlewareError;
pub use manager::build_chain;
pub use sink::{BufferedResponse, Flush, Hijack, HijackedConnection, ResponseSink};
pub use traits::{handler_fn, Handler, HandlerFn};

use bytes::Bytes;
use http_body_util::Full;

/// 미들웨어 체인이 다루는 요청 타입
pub type Request = hyper::Request<Full<Bytes>>;

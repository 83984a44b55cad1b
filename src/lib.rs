//! Add Missing Headers는 요청과 응답에 설정된 헤더가 없을 때만 값을 채워 넣는 HTTP 미들웨어입니다.
//!
//! # 주요 기능
//!
//! - 요청 헤더 보충 (다음 핸들러로 넘기기 전)
//! - 응답 헤더 보충 (상태 코드와 헤더가 확정되는 순간 한 번)
//! - 엄격/느슨한 존재 검사 (빈 값을 없는 것으로 볼지 여부)
//! - 우회 헤더로 미들웨어 전체 건너뛰기
//!
//! # 예제
//!
//! ```
//! use add_missing_headers::middleware::add_missing_headers::{AddMissingHeaders, AddMissingHeadersConfig};
//! use add_missing_headers::middleware::{handler_fn, BufferedResponse, Handler, Request, ResponseSink};
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use hyper::StatusCode;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut config = AddMissingHeadersConfig::default();
//! config.response_headers.insert("X-Frame-Options".to_string(), "DENY".to_string());
//!
//! let backend = Arc::new(handler_fn(|_req, sink| {
//!     sink.write_head(StatusCode::NOT_FOUND);
//! }));
//! let middleware = AddMissingHeaders::from_config("defaults", &config, backend).unwrap();
//!
//! let mut res = BufferedResponse::new();
//! middleware.serve(Request::new(Full::new(Bytes::new())), &mut res).await;
//!
//! let response = res.into_response();
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! assert_eq!(response.headers()["x-frame-options"], "DENY");
//! # }
//! ```

pub mod logging;
pub mod middleware;
pub mod server;
pub mod settings;

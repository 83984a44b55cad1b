//! 빠진 헤더 추가 미들웨어
//!
//! 요청과 응답에 설정된 헤더가 없을 때만 값을 채워 넣습니다.
//! 지정된 요청 헤더가 있으면 미들웨어 전체를 우회합니다.

mod config;
mod interceptor;
mod middleware;
pub mod rules;

pub use config::{AddMissingHeadersConfig, HeaderPolicy};
pub use interceptor::ResponseInterceptor;
pub use middleware::AddMissingHeaders;
pub use rules::{BypassCondition, BypassRule, CheckMode};

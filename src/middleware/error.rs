use hyper::header::{InvalidHeaderName, InvalidHeaderValue};

#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("잘못된 헤더 이름 '{name}': {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: InvalidHeaderName,
    },

    #[error("헤더 '{name}'의 값이 잘못되었습니다: {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: InvalidHeaderValue,
    },

    /// 하위 응답 스트림이 연결 가로채기(hijack)를 지원하지 않음
    #[error("응답 스트림이 연결 가로채기를 지원하지 않습니다: {type_name}")]
    HijackUnsupported { type_name: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

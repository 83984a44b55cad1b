use add_missing_headers::{
    logging,
    middleware::build_chain,
    server::{EchoHandler, RequestHandler, ServerListener},
    settings::Settings,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            return Err(e.into());
        }
    };

    let _guard = logging::init_logging(&settings.logging);
    info!(middlewares = settings.middleware.len(), "설정 로드 완료");

    let chain = build_chain(&settings.middleware, Arc::new(EchoHandler));
    let handler = Arc::new(RequestHandler::new(chain));
    let listener = ServerListener::bind(settings.server.socket_addr()).await?;

    tokio::select! {
        _ = listener.run(handler) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "종료 시그널 대기 실패");
            }
            info!("종료 시그널 수신, 서버를 종료합니다");
        }
    }

    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use medner::application::services::ExtractionService;
use medner::infrastructure::annotation::AnnotatorFactory;
use medner::infrastructure::observability::{init_tracing, TracingConfig};
use medner::infrastructure::text_processing::{PdfAdapter, SplitterFactory};
use medner::presentation::config::Settings;
use medner::presentation::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    init_tracing(TracingConfig::default(), settings.server.port);

    let file_loader = Arc::new(PdfAdapter::new());
    let splitter = SplitterFactory::create(&settings.splitter)?;
    let annotator = AnnotatorFactory::create(&settings.annotator)?;

    let extraction_service = Arc::new(ExtractionService::new(
        file_loader,
        splitter,
        annotator,
        settings.pipeline.concurrency,
    ));

    let state = AppState { extraction_service };
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

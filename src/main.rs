use recipebox::{app, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing("recipebox=debug,axum=info,tower_http=info");

    let app_state = AppState::init().await?;
    let addr = app_state.config.bind_addr();

    app::serve(app::build_app(app_state), &addr).await
}

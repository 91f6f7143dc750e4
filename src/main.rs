//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use backoffice::config::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` é opcional; as variáveis do processo têm prioridade
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr.clone();

    // Se a configuração falhar, a aplicação não deve iniciar
    let app_state = AppState::new(settings).await.map_err(|e| {
        tracing::error!("🔥 Falha ao inicializar o estado da aplicação: {:?}", e);
        e
    })?;

    let app = backoffice::routes::app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

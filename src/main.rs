//src/main.rs

use chrono::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use stockroom::config::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stockroom=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env().expect("Configuração inválida.");
    let app_state = AppState::new(&config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Vendas que ficaram Pending numa execução anterior são desfeitas antes de abrir as portas
    if let Err(e) = app_state
        .sales_service
        .recover_pending_sales(Duration::zero())
        .await
    {
        tracing::error!("🔥 Falha ao recuperar vendas pendentes: {}", e);
    }

    let app = stockroom::app(app_state, config.cors_allow_origin.as_deref());

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", config.bind_addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

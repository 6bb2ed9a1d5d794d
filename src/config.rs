// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{
        DocumentStore, InventoryRepository, MemoryDocumentStore, PgDocumentStore, SalesRepository,
        SupplierRepository,
    },
    services::{
        checkout::DEFAULT_SESSION_TTL_MINUTES,
        CheckoutService, CheckoutSessions, DashboardService, InventoryService, SalesService,
        SupplierService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// --- Configuração lida do ambiente (.env opcional) ---
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sem DATABASE_URL o armazenamento fica em memória.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: String,
    pub cors_allow_origin: Option<String>,
    /// Minutos de inatividade até uma sessão de venda ser descartada.
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                anyhow::anyhow!("DATABASE_MAX_CONNECTIONS inválido ('{}'): {}", raw, e)
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let session_ttl_minutes = match env::var("SESSION_TTL_MINUTES") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => anyhow::bail!("SESSION_TTL_MINUTES inválido ('{}')", raw),
            },
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            max_connections,
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cors_allow_origin: non_empty_var("CORS_ALLOW_ORIGIN"),
            session_ttl_minutes,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// --- Estado compartilhado por todos os handlers ---
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub inventory_service: InventoryService,
    pub supplier_service: SupplierService,
    pub dashboard_service: DashboardService,
    pub sales_service: SalesService,
    pub checkout_service: CheckoutService,
    pub i18n_store: I18nStore,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgDocumentStore::new(db_pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL não definida; usando armazenamento em memória");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let sessions = CheckoutSessions::with_ttl(chrono::Duration::minutes(config.session_ttl_minutes));
        Ok(Self::build(store, sessions))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::build(store, CheckoutSessions::new())
    }

    // --- Monta o gráfico de dependências ---
    fn build(store: Arc<dyn DocumentStore>, sessions: CheckoutSessions) -> Self {
        let inventory_repo = InventoryRepository::new(store.clone());
        let supplier_repo = SupplierRepository::new(store.clone());
        let sales_repo = SalesRepository::new(store.clone());

        let inventory_service = InventoryService::new(inventory_repo.clone());
        let supplier_service = SupplierService::new(supplier_repo);
        let dashboard_service = DashboardService::new(inventory_repo.clone());
        let sales_service = SalesService::new(inventory_repo, sales_repo);
        let checkout_service = CheckoutService::new(
            inventory_service.clone(),
            sales_service.clone(),
            sessions,
        );

        Self {
            store,
            inventory_service,
            supplier_service,
            dashboard_service,
            sales_service,
            checkout_service,
            i18n_store: I18nStore::new(),
        }
    }
}

// src/services/checkout.rs
//
// Carrinho e fluxo de venda de uma sessão.
// Browsing -> CheckoutPending -> Submitting -> Completed -> Browsing
//                              Submitting -> Failed -> CheckoutPending

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        inventory::Item,
        sales::{CartLine, CheckoutState, CustomerInfo, Sale},
    },
    services::{inventory_service::InventoryService, sales_service::SalesService},
};

// =============================================================================
//  CARRINHO
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item.id == item_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Soma à linha existente ou cria uma nova. Se a soma passar do estoque
    /// da foto, o carrinho não muda.
    pub fn add(&mut self, item: &Item, requested: u32) -> Result<(), AppError> {
        if requested == 0 {
            return Err(AppError::InvalidQuantity(0));
        }

        let wanted = u64::from(self.quantity_of(&item.id)) + u64::from(requested);
        if wanted > u64::from(item.quantity) {
            return Err(AppError::InsufficientStock {
                item: item.name.clone(),
                requested: wanted,
                available: item.quantity,
            });
        }

        let mut next = self.clone();
        match next.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.quantity += requested,
            None => next.lines.push(CartLine {
                item: item.clone(),
                quantity: requested,
            }),
        }
        next.total_amount()?;
        *self = next;
        Ok(())
    }

    /// `new_quantity <= 0` remove a linha; senão revalida contra a foto.
    pub fn update_quantity(&mut self, item_id: &str, new_quantity: i64) -> Result<(), AppError> {
        if new_quantity <= 0 {
            self.remove(item_id);
            return Ok(());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item.id == item_id)
            .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

        if new_quantity > i64::from(line.item.quantity) {
            return Err(AppError::InsufficientStock {
                item: line.item.name.clone(),
                requested: new_quantity as u64,
                available: line.item.quantity,
            });
        }

        let previous = line.quantity;
        line.quantity = new_quantity as u32;
        if let Err(e) = self.total_amount() {
            if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item_id) {
                line.quantity = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item.id != item_id);
        self.lines.len() != before
    }

    /// Recalculado a cada chamada, sem cache.
    pub fn total_amount(&self) -> Result<Decimal, AppError> {
        self.lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.line_total()?)
                .ok_or_else(|| AppError::AmountOverflow(line.item.name.clone()))
        })
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Atualiza as fotos das linhas com um estoque recém-carregado.
    fn refresh_snapshots(&mut self, available: &[Item]) {
        for line in &mut self.lines {
            if let Some(fresh) = available.iter().find(|i| i.id == line.item.id) {
                line.item = fresh.clone();
            }
        }
    }
}

// =============================================================================
//  SESSÃO DE VENDA
// =============================================================================

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: Uuid,
    state: CheckoutState,
    cart: Cart,
    customer: CustomerInfo,
    // Foto dos itens em estoque, carregada na abertura
    available: Vec<Item>,
    last_sale_id: Option<String>,
    last_error: Option<String>,
}

/// O que a tela de venda recebe.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub state: CheckoutState,
    pub cart: Vec<CartLine>,
    pub total_amount: Decimal,
    pub customer_info: CustomerInfo,
    pub available_items: Vec<Item>,
    pub last_sale_id: Option<String>,
    pub last_error: Option<String>,
}

impl CheckoutSession {
    pub fn new(id: Uuid, available: Vec<Item>) -> Self {
        Self {
            id,
            state: CheckoutState::Browsing,
            cart: Cart::default(),
            customer: CustomerInfo::default(),
            available,
            last_sale_id: None,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn view(&self) -> Result<SessionView, AppError> {
        Ok(SessionView {
            id: self.id,
            state: self.state,
            cart: self.cart.lines().to_vec(),
            total_amount: self.cart.total_amount()?,
            customer_info: self.customer.clone(),
            available_items: self.available.clone(),
            last_sale_id: self.last_sale_id.clone(),
            last_error: self.last_error.clone(),
        })
    }

    fn transition(&mut self, to: CheckoutState) {
        tracing::debug!("Sessão {}: {:?} -> {:?}", self.id, self.state, to);
        self.state = to;
    }

    fn require(&self, expected: CheckoutState) -> Result<(), AppError> {
        if self.state != expected {
            return Err(AppError::InvalidCheckoutState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    pub fn replace_stock(&mut self, available: Vec<Item>) {
        self.cart.refresh_snapshots(&available);
        self.available = available;
    }

    // --- Carrinho (só em Browsing) ---

    pub fn add_to_cart(&mut self, item_id: &str, quantity: u32) -> Result<(), AppError> {
        self.require(CheckoutState::Browsing)?;
        let item = self
            .available
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

        if let Err(e) = self.cart.add(item, quantity) {
            tracing::warn!("⚠️ Carrinho {}: {}", self.id, e);
            return Err(e);
        }
        Ok(())
    }

    pub fn update_cart_quantity(&mut self, item_id: &str, quantity: i64) -> Result<(), AppError> {
        self.require(CheckoutState::Browsing)?;
        if let Err(e) = self.cart.update_quantity(item_id, quantity) {
            tracing::warn!("⚠️ Carrinho {}: {}", self.id, e);
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_from_cart(&mut self, item_id: &str) -> Result<(), AppError> {
        self.require(CheckoutState::Browsing)?;
        self.cart.remove(item_id);
        Ok(())
    }

    // --- Transições ---

    pub fn proceed_to_checkout(&mut self) -> Result<(), AppError> {
        self.require(CheckoutState::Browsing)?;
        if self.cart.is_empty() {
            return Err(AppError::EmptyCart);
        }
        self.last_error = None;
        self.transition(CheckoutState::CheckoutPending);
        Ok(())
    }

    pub fn cancel_checkout(&mut self) -> Result<(), AppError> {
        self.require(CheckoutState::CheckoutPending)?;
        self.transition(CheckoutState::Browsing);
        Ok(())
    }

    pub fn set_customer_info(&mut self, customer: CustomerInfo) -> Result<(), AppError> {
        self.require(CheckoutState::CheckoutPending)?;
        self.customer = customer;
        Ok(())
    }

    /// Portão de validação antes de qualquer escrita. Em erro, nada muda.
    pub fn begin_submit(&mut self) -> Result<(CustomerInfo, Vec<CartLine>), AppError> {
        self.require(CheckoutState::CheckoutPending)?;
        if self.customer.name.trim().is_empty() {
            return Err(AppError::CustomerNameRequired);
        }
        if self.cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        self.transition(CheckoutState::Submitting);
        Ok((self.customer.clone(), self.cart.lines().to_vec()))
    }

    /// Venda gravada: limpa carrinho e cliente e volta para Browsing.
    pub fn complete(&mut self, sale: &Sale) {
        self.transition(CheckoutState::Completed);
        self.cart.clear();
        self.customer = CustomerInfo::default();
        self.last_sale_id = Some(sale.id.clone());
        self.last_error = None;
        self.transition(CheckoutState::Browsing);
    }

    /// Falha: o carrinho é preservado para nova tentativa.
    pub fn fail(&mut self, error: &AppError) {
        self.transition(CheckoutState::Failed);
        self.last_error = Some(error.to_string());
        self.transition(CheckoutState::CheckoutPending);
    }
}

// =============================================================================
//  REGISTRO DE SESSÕES
// =============================================================================

pub type SharedSession = Arc<Mutex<CheckoutSession>>;

/// Sessão sem uso por este tempo é descartada.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

struct SessionEntry {
    session: SharedSession,
    last_touched: DateTime<Utc>,
}

impl SessionEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_touched >= ttl
    }
}

#[derive(Clone)]
pub struct CheckoutSessions {
    sessions: Arc<DashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl Default for CheckoutSessions {
    fn default() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}

impl CheckoutSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Registra a sessão e aproveita para varrer as expiradas.
    pub fn insert(&self, session: CheckoutSession) -> SharedSession {
        self.sweep_expired();
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id,
            SessionEntry {
                session: shared.clone(),
                last_touched: Utc::now(),
            },
        );
        shared
    }

    /// Busca e renova o prazo. Sessão expirada conta como inexistente.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let now = Utc::now();
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(AppError::SessionNotFound(id))?;
        if entry.is_expired(now, self.ttl) {
            drop(entry);
            self.sessions.remove(&id);
            tracing::info!("⌛ Sessão de venda {} expirou", id);
            return Err(AppError::SessionNotFound(id));
        }
        entry.last_touched = now;
        Ok(entry.session.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Remove as sessões paradas há mais que o TTL. Devolve quantas saíram.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired(now, self.ttl));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::info!("⌛ {} sessão(ões) de venda expirada(s) removida(s)", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct CheckoutService {
    inventory: InventoryService,
    sales: SalesService,
    sessions: CheckoutSessions,
}

impl CheckoutService {
    pub fn new(inventory: InventoryService, sales: SalesService, sessions: CheckoutSessions) -> Self {
        Self { inventory, sales, sessions }
    }

    pub async fn open_session(&self) -> Result<SessionView, AppError> {
        let available = self.inventory.available_items().await?;
        let session = CheckoutSession::new(Uuid::new_v4(), available);
        let view = session.view()?;
        self.sessions.insert(session);
        tracing::info!("🛒 Sessão de venda {} aberta", view.id);
        Ok(view)
    }

    pub async fn close_session(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions.remove(id)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<SessionView, AppError> {
        let shared = self.sessions.get(id)?;
        let session = shared.lock().await;
        session.view()
    }

    /// Aplica uma mutação síncrona na sessão e devolve a nova visão.
    async fn with_session<F>(&self, id: Uuid, f: F) -> Result<SessionView, AppError>
    where
        F: FnOnce(&mut CheckoutSession) -> Result<(), AppError>,
    {
        let shared = self.sessions.get(id)?;
        let mut session = shared.lock().await;
        f(&mut *session)?;
        session.view()
    }

    pub async fn refresh_stock(&self, id: Uuid) -> Result<SessionView, AppError> {
        let shared = self.sessions.get(id)?;
        let available = self.inventory.available_items().await?;
        let mut session = shared.lock().await;
        session.replace_stock(available);
        session.view()
    }

    pub async fn add_to_cart(&self, id: Uuid, item_id: &str, quantity: u32) -> Result<SessionView, AppError> {
        self.with_session(id, |s| s.add_to_cart(item_id, quantity)).await
    }

    pub async fn update_cart_quantity(
        &self,
        id: Uuid,
        item_id: &str,
        quantity: i64,
    ) -> Result<SessionView, AppError> {
        self.with_session(id, |s| s.update_cart_quantity(item_id, quantity)).await
    }

    pub async fn remove_from_cart(&self, id: Uuid, item_id: &str) -> Result<SessionView, AppError> {
        self.with_session(id, |s| s.remove_from_cart(item_id)).await
    }

    pub async fn proceed_to_checkout(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.with_session(id, CheckoutSession::proceed_to_checkout).await
    }

    pub async fn cancel_checkout(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.with_session(id, CheckoutSession::cancel_checkout).await
    }

    pub async fn set_customer_info(&self, id: Uuid, customer: CustomerInfo) -> Result<SessionView, AppError> {
        self.with_session(id, |s| s.set_customer_info(customer)).await
    }

    /// Grava a venda e baixa o estoque. O lock da sessão fica preso durante
    /// todo o envio: não há cancelamento nem operação concorrente na sessão.
    pub async fn submit_sale(&self, id: Uuid) -> Result<(Sale, SessionView), AppError> {
        let shared = self.sessions.get(id)?;
        let mut session = shared.lock().await;

        let (customer, lines) = session.begin_submit()?;

        match self.sales.commit_sale(&customer, &lines).await {
            Ok(sale) => {
                session.complete(&sale);
                match self.inventory.available_items().await {
                    Ok(available) => session.replace_stock(available),
                    Err(e) => {
                        // A venda já foi gravada; a foto fica desatualizada até o próximo refresh
                        tracing::warn!("⚠️ Falha ao recarregar estoque da sessão {}: {}", id, e);
                        let mut stale = session.available.clone();
                        for line in &sale.items {
                            if let Some(item) = stale.iter_mut().find(|i| i.id == line.item_id) {
                                item.quantity = item.quantity.saturating_sub(line.quantity);
                                item.updated_at = Some(Utc::now());
                            }
                        }
                        stale.retain(|i| i.quantity > 0);
                        session.replace_stock(stale);
                    }
                }
                let view = session.view()?;
                Ok((sale, view))
            }
            Err(e) => {
                session.fail(&e);
                Err(e)
            }
        }
    }
}

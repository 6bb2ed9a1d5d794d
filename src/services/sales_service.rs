// src/services/sales_service.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, SalesRepository},
    models::sales::{CartLine, CustomerInfo, Sale, SaleLine, SaleStatus},
};

#[derive(Clone)]
pub struct SalesService {
    inventory_repo: InventoryRepository,
    sales_repo: SalesRepository,
    // Um rollback por vez: duas devoluções da mesma venda inflariam o estoque
    rollback_lock: Arc<Mutex<()>>,
}

impl SalesService {
    pub fn new(inventory_repo: InventoryRepository, sales_repo: SalesRepository) -> Self {
        Self {
            inventory_repo,
            sales_repo,
            rollback_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.sales_repo.list_sales().await
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale, AppError> {
        self.sales_repo.get_sale(id).await
    }

    // --- COMMIT DA VENDA ---
    //
    // 1. Grava a venda como Pending (log de baixas vazio)
    // 2. Para cada linha, em sequência: leitura fresca, checagem, baixa, registro no log
    // 3. Marca Completed
    // Qualquer falha em 2 ou 3 desfaz as baixas já aplicadas e marca RolledBack.
    pub async fn commit_sale(&self, customer: &CustomerInfo, lines: &[CartLine]) -> Result<Sale, AppError> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let sale_lines = lines
            .iter()
            .map(SaleLine::try_from)
            .collect::<Result<Vec<SaleLine>, AppError>>()?;
        let total_amount = sale_lines.iter().try_fold(Decimal::ZERO, |acc, l| {
            acc.checked_add(l.line_total)
                .ok_or_else(|| AppError::AmountOverflow(l.name.clone()))
        })?;

        let mut sale = self
            .sales_repo
            .create_pending_sale(customer, sale_lines, total_amount, Utc::now())
            .await?;

        let outcome = async {
            self.apply_decrements(&mut sale).await?;
            self.sales_repo.set_status(&sale.id, SaleStatus::Completed).await
        }
        .await;

        match outcome {
            Ok(()) => {
                sale.status = SaleStatus::Completed;
                tracing::info!(
                    "✅ Venda {} concluída: {} linha(s), total {}",
                    sale.id,
                    sale.items.len(),
                    sale.total_amount
                );
                Ok(sale)
            }
            Err(e) => {
                tracing::warn!("⚠️ Venda {} falhou ({}); desfazendo baixas", sale.id, e);
                let _guard = self.rollback_lock.lock().await;
                if let Err(rollback_err) = self.roll_back(&mut sale).await {
                    tracing::error!(
                        "🔥 Rollback da venda {} falhou: {}. Ela fica Pending para recuperação.",
                        sale.id,
                        rollback_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn apply_decrements(&self, sale: &mut Sale) -> Result<(), AppError> {
        for line in sale.items.clone() {
            if sale.applied_item_ids.contains(&line.item_id) {
                continue;
            }

            // Leitura fresca: o saldo atual do store, não a foto da sessão
            let item = self.inventory_repo.get_item(&line.item_id).await?;
            if item.quantity < line.quantity {
                return Err(AppError::InsufficientStock {
                    item: item.name,
                    requested: u64::from(line.quantity),
                    available: item.quantity,
                });
            }

            self.inventory_repo
                .set_quantity(&item.id, item.quantity - line.quantity, Utc::now())
                .await?;

            // Entra no log em memória antes de persistir: se a gravação do log
            // falhar, o rollback desta execução ainda enxerga a baixa.
            sale.applied_item_ids.push(line.item_id.clone());
            self.sales_repo
                .record_applied(&sale.id, &sale.applied_item_ids)
                .await?;
        }
        Ok(())
    }

    /// Devolve ao estoque, em ordem inversa, cada baixa registrada no log.
    async fn roll_back(&self, sale: &mut Sale) -> Result<(), AppError> {
        while let Some(item_id) = sale.applied_item_ids.last().cloned() {
            let quantity = sale
                .items
                .iter()
                .filter(|l| l.item_id == item_id)
                .map(|l| l.quantity)
                .sum::<u32>();

            match self.inventory_repo.get_item(&item_id).await {
                Ok(item) => {
                    self.inventory_repo
                        .set_quantity(&item_id, item.quantity.saturating_add(quantity), Utc::now())
                        .await?;
                }
                // Item apagado no meio do caminho: não há o que devolver
                Err(AppError::ItemNotFound(_)) => {
                    tracing::warn!("⚠️ Item {} sumiu; baixa da venda {} não devolvida", item_id, sale.id);
                }
                Err(e) => return Err(e),
            }

            sale.applied_item_ids.pop();
            self.sales_repo
                .record_applied(&sale.id, &sale.applied_item_ids)
                .await?;
        }

        self.sales_repo.set_status(&sale.id, SaleStatus::RolledBack).await?;
        sale.status = SaleStatus::RolledBack;
        tracing::info!("↩️ Venda {} desfeita", sale.id);
        Ok(())
    }

    /// Desfaz vendas que ficaram Pending (falha no meio do commit ou no
    /// próprio rollback). Só considera vendas mais velhas que `older_than`,
    /// para não atropelar um commit em andamento. Recuperações concorrentes
    /// rodam em fila; a listagem acontece já com o lock.
    pub async fn recover_pending_sales(&self, older_than: Duration) -> Result<Vec<Sale>, AppError> {
        let _guard = self.rollback_lock.lock().await;
        let cutoff = Utc::now() - older_than;
        let pending: Vec<Sale> = self
            .sales_repo
            .list_sales()
            .await?
            .into_iter()
            .filter(|s| s.status == SaleStatus::Pending && s.sale_date <= cutoff)
            .collect();

        let mut recovered = Vec::with_capacity(pending.len());
        for mut sale in pending {
            match self.roll_back(&mut sale).await {
                Ok(()) => recovered.push(sale),
                Err(e) => tracing::error!("🔥 Recuperação da venda {} falhou: {}", sale.id, e),
            }
        }

        if !recovered.is_empty() {
            tracing::info!("↩️ {} venda(s) pendente(s) recuperada(s)", recovered.len());
        }
        Ok(recovered)
    }
}

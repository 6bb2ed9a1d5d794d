// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Inventory ---
        handlers::inventory::list_items,
        handlers::inventory::get_item,
        handlers::inventory::create_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,

        // --- Suppliers ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier_summary,
        handlers::suppliers::get_supplier,
        handlers::suppliers::create_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Sell ---
        handlers::sell::list_available_items,
        handlers::sell::open_session,
        handlers::sell::get_session,
        handlers::sell::close_session,
        handlers::sell::refresh_stock,
        handlers::sell::add_to_cart,
        handlers::sell::update_cart_quantity,
        handlers::sell::remove_from_cart,
        handlers::sell::proceed_to_checkout,
        handlers::sell::cancel_checkout,
        handlers::sell::set_customer_info,
        handlers::sell::submit_sale,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::recover_pending_sales,
    ),
    components(
        schemas(
            // --- Inventory ---
            models::inventory::Unit,
            models::inventory::Category,
            models::inventory::Item,
            models::inventory::StockStatus,
            models::filters::StockFilter,
            models::filters::ItemSort,

            // --- Suppliers ---
            models::supplier::Supplier,
            models::supplier::SupplierSummary,
            models::supplier::SupplierCategoryCount,

            // --- Sales ---
            models::sales::CartLine,
            models::sales::CustomerInfo,
            models::sales::CheckoutState,
            models::sales::SaleStatus,
            models::sales::SaleLine,
            models::sales::Sale,
            services::checkout::SessionView,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::CategoryStats,
            models::dashboard::ItemValue,

            // --- Payloads ---
            handlers::inventory::ItemPayload,
            handlers::suppliers::SupplierPayload,
            handlers::sell::AddToCartPayload,
            handlers::sell::UpdateQuantityPayload,
            handlers::sell::CustomerPayload,
            handlers::sell::SubmitResponse,
        )
    ),
    tags(
        (name = "Inventory", description = "Cadastro e consulta de itens"),
        (name = "Suppliers", description = "Cadastro de fornecedores"),
        (name = "Dashboard", description = "Indicadores do estoque"),
        (name = "Sell", description = "Carrinho e checkout por sessão"),
        (name = "Sales", description = "Vendas gravadas e recuperação")
    )
)]
pub struct ApiDoc;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estoque API",
        description = r#"
# Estoque Inventory & Sales API

Backend for small retail and wholesale operations: product catalog, suppliers
and clients, stock movements with weighted-average costing, sales orders and
reporting.

## Stock movements

Every change to a product's on-hand quantity goes through a movement:

- **inbound** adds stock and re-prices the product at the quantity-weighted
  average cost
- **outbound** removes stock, flooring at zero
- **adjustment** sets an absolute quantity

## Tax IDs

Suppliers and clients are keyed by a Brazilian CPF (11 digits) or CNPJ
(14 digits). Check digits are validated on every create and update; the
rejection reason (wrong length, repeated digits, check-digit mismatch) is
returned as a field-level validation error.
"#
    ),
    paths(
        crate::handlers::stock::record_movement,
        crate::handlers::stock::list_movements,
        crate::handlers::reports::dashboard,
        crate::handlers::reports::stock_by_category,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::stock::RecordMovementRequest,
        crate::handlers::products::CreateProductRequest,
        crate::handlers::products::UpdateProductRequest,
        crate::handlers::categories::CreateCategoryRequest,
        crate::handlers::categories::UpdateCategoryRequest,
        crate::handlers::suppliers::CreateSupplierRequest,
        crate::handlers::suppliers::UpdateSupplierRequest,
        crate::handlers::clients::CreateClientRequest,
        crate::handlers::clients::UpdateClientRequest,
        crate::handlers::orders::CreateOrderRequest,
        crate::handlers::orders::CreateOrderItemRequest,
        crate::services::reports::DashboardStats,
        crate::services::reports::ProductStats,
        crate::services::reports::MovementStats,
        crate::services::reports::CategoryCount,
        crate::services::reports::CategoryStockSummary,
    )),
    tags(
        (name = "stock", description = "Stock movement recording and history"),
        (name = "reports", description = "Dashboard and valuation reports")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document at `/docs`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

//! Invoice, payment and purchase order repositories

use crate::db::models::{Invoice, Payment, PurchaseOrder};
use sqlx::{Executor, Sqlite};

/// Invoice repository
pub struct InvoiceRepository;

impl InvoiceRepository {
    /// Insert an invoice
    pub async fn create<'c, E>(executor: E, invoice: &Invoice) -> Result<Invoice, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (id, invoice_number, quote_id, customer_id, amount, status, due_date, paid_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.quote_id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(&invoice.status)
        .bind(&invoice.due_date)
        .bind(&invoice.paid_at)
        .bind(&invoice.created_at)
        .fetch_one(executor)
        .await
    }

    /// Get an invoice by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Invoice>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Get the invoice issued for a quote
    pub async fn get_by_quote<'c, E>(executor: E, quote_id: &str) -> Result<Option<Invoice>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE quote_id = ?")
            .bind(quote_id)
            .fetch_optional(executor)
            .await
    }

    /// List invoices, newest first, optionally by status
    pub async fn list<'c, E>(executor: E, status: Option<&str>) -> Result<Vec<Invoice>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE (? IS NULL OR status = ?)
             ORDER BY created_at DESC, invoice_number DESC",
        )
        .bind(status)
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Mark an unpaid invoice paid
    pub async fn mark_paid<'c, E>(executor: E, id: &str, paid_at: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE invoices SET status = 'paid', paid_at = ? WHERE id = ? AND status = 'unpaid'",
        )
        .bind(paid_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Void an invoice (quote cancelled)
    pub async fn void<'c, E>(executor: E, quote_id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE invoices SET status = 'void' WHERE quote_id = ? AND status = 'unpaid'",
        )
        .bind(quote_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Payment repository
pub struct PaymentRepository;

impl PaymentRepository {
    /// Insert a payment record
    pub async fn create<'c, E>(executor: E, payment: &Payment) -> Result<Payment, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, provider_event_id, quote_id, invoice_id, amount, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&payment.id)
        .bind(&payment.provider_event_id)
        .bind(&payment.quote_id)
        .bind(&payment.invoice_id)
        .bind(payment.amount)
        .bind(&payment.status)
        .bind(&payment.created_at)
        .fetch_one(executor)
        .await
    }

    /// Get a payment by provider event id
    pub async fn get_by_event<'c, E>(executor: E, event_id: &str) -> Result<Option<Payment>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE provider_event_id = ?")
            .bind(event_id)
            .fetch_optional(executor)
            .await
    }

    /// Payments recorded for a quote
    pub async fn list_by_quote<'c, E>(executor: E, quote_id: &str) -> Result<Vec<Payment>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE quote_id = ? ORDER BY created_at",
        )
        .bind(quote_id)
        .fetch_all(executor)
        .await
    }
}

/// Purchase order repository
pub struct PurchaseOrderRepository;

impl PurchaseOrderRepository {
    /// Insert a purchase order
    pub async fn create<'c, E>(executor: E, po: &PurchaseOrder) -> Result<PurchaseOrder, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PurchaseOrder>(
            "INSERT INTO purchase_orders (id, po_number, project_id, linguist_id, status, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&po.id)
        .bind(&po.po_number)
        .bind(&po.project_id)
        .bind(&po.linguist_id)
        .bind(&po.status)
        .bind(po.amount)
        .bind(&po.created_at)
        .fetch_one(executor)
        .await
    }

    /// Purchase orders issued for a project
    pub async fn list_by_project<'c, E>(executor: E, project_id: &str) -> Result<Vec<PurchaseOrder>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, PurchaseOrder>(
            "SELECT * FROM purchase_orders WHERE project_id = ? ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await
    }
}

//! Quote creation and the quote/project status workflow

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::error::is_unique_violation_on;
use crate::db::models::{Invoice, Project, Quote};
use crate::db::repositories::{
    CustomerRepository, InvitationRepository, InvoiceRepository, LanguageRepository,
    ProjectRepository, QuoteRepository,
};
use crate::db::{begin_write, timestamp, DatabasePool};
use crate::domain::{ProjectStatus, QuoteStatus, ServiceType};
use crate::services::coupons::{check_coupon, redeem};
use crate::services::format::{format_currency, round_cents};
use crate::services::mail::{Mailer, OutgoingEmail};
use crate::services::numbering::{next_number, DocumentKind, MAX_NUMBER_ATTEMPTS};
use crate::services::pricing::{calculate_quote_price, find_rule, RuleQuery};
use crate::{LinguabridgeError, Result};

/// Days between invoicing and the due date
pub const INVOICE_TERMS_DAYS: i64 = 30;

/// Input for a new quote
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub customer_id: String,
    pub source_language: String,
    pub target_language: String,
    pub service_type: ServiceType,
    pub word_count: i64,

    /// Explicit rate; when absent the pricing rules decide
    pub rate: Option<f64>,
    pub minimum_charge: Option<f64>,

    pub coupon_code: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub scheduled_at: Option<String>,
    pub notes: Option<String>,
}

/// Price, number and store a quote in DRAFT, applying a coupon if given
pub async fn create_quote(pool: &DatabasePool, new: NewQuote, now: DateTime<Utc>) -> Result<Quote> {
    if new.word_count < 0 {
        return Err(LinguabridgeError::Validation(
            "word_count must not be negative".to_string(),
        ));
    }
    if new.rate.is_some_and(|r| r < 0.0) || new.minimum_charge.is_some_and(|m| m < 0.0) {
        return Err(LinguabridgeError::Validation(
            "rate and minimum_charge must not be negative".to_string(),
        ));
    }

    let customer = CustomerRepository::get_by_id(pool, &new.customer_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("customer", new.customer_id.clone()))?;

    for code in [&new.source_language, &new.target_language] {
        if !LanguageRepository::exists(pool, code).await? {
            return Err(LinguabridgeError::Validation(format!(
                "unknown language code: {}",
                code
            )));
        }
    }

    let (rate, minimum_charge) = match new.rate {
        Some(rate) => (rate, new.minimum_charge.unwrap_or(0.0)),
        None => {
            let query = RuleQuery {
                source_language: &new.source_language,
                target_language: &new.target_language,
                service_type: new.service_type,
                state: customer.state.as_deref(),
            };
            let rule = find_rule(pool, &query).await?;
            (rule.rate, new.minimum_charge.unwrap_or(rule.minimum_charge))
        }
    };

    let price = calculate_quote_price(new.word_count, rate, minimum_charge);
    let subtotal = round_cents(price.subtotal);
    let tax = round_cents(price.tax);

    let mut tx = begin_write(pool).await?;

    let applied = match new.coupon_code.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(code) => Some(
            check_coupon(&mut tx, code, Some(&customer.id), subtotal, new.service_type, now).await?,
        ),
        None => None,
    };
    let discount = applied.as_ref().map(|a| a.discount).unwrap_or(0.0);

    let created_at = timestamp(now);
    let mut quote = Quote {
        id: Uuid::new_v4().to_string(),
        quote_number: String::new(),
        customer_id: customer.id.clone(),
        source_language: new.source_language,
        target_language: new.target_language,
        service_type: new.service_type.as_str().to_string(),
        word_count: new.word_count,
        rate,
        minimum_charge,
        subtotal,
        discount,
        tax,
        total: round_cents(subtotal - discount + tax),
        coupon_code: applied.as_ref().map(|a| a.coupon.code.clone()),
        address: new.address,
        latitude: new.latitude,
        longitude: new.longitude,
        scheduled_at: new.scheduled_at,
        status: QuoteStatus::Draft.as_str().to_string(),
        notes: new.notes,
        created_at: created_at.clone(),
        updated_at: created_at,
    };

    let quote = insert_numbered_quote(&mut tx, &mut quote, now).await?;

    if let Some(applied) = &applied {
        redeem(&mut tx, &applied.coupon, &customer.id, &quote.id, applied.discount).await?;
    }

    tx.commit().await?;

    info!(
        "Created quote {} for customer {} ({})",
        quote.quote_number,
        customer.id,
        format_currency(quote.total)
    );
    Ok(quote)
}

async fn insert_numbered_quote(
    conn: &mut SqliteConnection,
    quote: &mut Quote,
    now: DateTime<Utc>,
) -> Result<Quote> {
    let kind = DocumentKind::Quote;
    for attempt in 0..MAX_NUMBER_ATTEMPTS {
        quote.quote_number = next_number(&mut *conn, kind, now.date_naive(), attempt).await?;
        match QuoteRepository::create(&mut *conn, quote).await {
            Ok(created) => return Ok(created),
            Err(e) if is_unique_violation_on(&e, &kind.unique_column()) => {
                warn!("Quote number {} taken, retrying", quote.quote_number);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(LinguabridgeError::Conflict(
        "could not allocate a quote number".to_string(),
    ))
}

/// Records touched by a quote status change
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub quote: Quote,
    pub invoice: Option<Invoice>,
    pub project: Option<Project>,
}

/// Move a quote to `next`, with all side effects in one transaction
pub async fn transition_quote(
    pool: &DatabasePool,
    mailer: &dyn Mailer,
    quote_id: &str,
    next: QuoteStatus,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome> {
    let mut tx = begin_write(pool).await?;

    let quote = QuoteRepository::get_by_id(&mut *tx, quote_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("quote", quote_id))?;
    let outcome = apply_transition(&mut tx, &quote, next, now).await?;

    tx.commit().await?;
    info!(
        "Quote {} moved {} -> {}",
        quote.quote_number, quote.status, outcome.quote.status
    );

    if next == QuoteStatus::Sent {
        notify_quote_sent(pool, mailer, &outcome.quote).await;
    }
    Ok(outcome)
}

async fn notify_quote_sent(pool: &DatabasePool, mailer: &dyn Mailer, quote: &Quote) {
    let customer = match CustomerRepository::get_by_id(pool, &quote.customer_id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => return,
        Err(e) => {
            warn!("Could not load customer for quote {}: {}", quote.quote_number, e);
            return;
        }
    };

    let email = OutgoingEmail::new(customer.email.clone(), "quote_sent")
        .var("customer_name", customer.name.clone())
        .var("quote_number", quote.quote_number.clone())
        .var("total", format_currency(quote.total));
    if let Err(e) = mailer.send(email).await {
        warn!("Failed to email quote {} to {}: {}", quote.quote_number, customer.email, e);
    }
}

/// Apply a status change on an open connection or transaction
pub async fn apply_transition(
    conn: &mut SqliteConnection,
    quote: &Quote,
    next: QuoteStatus,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome> {
    let current = quote
        .status
        .parse::<QuoteStatus>()
        .map_err(LinguabridgeError::Validation)?;
    if !current.can_transition_to(next) {
        return Err(LinguabridgeError::InvalidStateTransition {
            from: current.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    let mut invoice = None;
    let mut project = None;

    match next {
        QuoteStatus::Invoiced => {
            invoice = Some(issue_invoice(&mut *conn, quote, now).await?);
        }
        QuoteStatus::InvoicePaid => {
            let unpaid = match InvoiceRepository::get_by_quote(&mut *conn, &quote.id).await? {
                Some(existing) => existing,
                None => issue_invoice(&mut *conn, quote, now).await?,
            };
            InvoiceRepository::mark_paid(&mut *conn, &unpaid.id, &timestamp(now)).await?;
            invoice = InvoiceRepository::get_by_id(&mut *conn, &unpaid.id).await?;
            project = Some(open_project(&mut *conn, quote, now).await?);
        }
        QuoteStatus::Cancelled => {
            let voided = InvoiceRepository::void(&mut *conn, &quote.id).await?;
            if voided > 0 {
                info!("Voided invoice for cancelled quote {}", quote.quote_number);
            }
        }
        _ => {}
    }

    QuoteRepository::update_status(&mut *conn, &quote.id, next.as_str()).await?;
    let quote = QuoteRepository::get_by_id(&mut *conn, &quote.id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("quote", quote.id.clone()))?;

    Ok(TransitionOutcome {
        quote,
        invoice,
        project,
    })
}

async fn issue_invoice(conn: &mut SqliteConnection, quote: &Quote, now: DateTime<Utc>) -> Result<Invoice> {
    let kind = DocumentKind::Invoice;
    let mut invoice = Invoice {
        id: Uuid::new_v4().to_string(),
        invoice_number: String::new(),
        quote_id: quote.id.clone(),
        customer_id: quote.customer_id.clone(),
        amount: quote.total,
        status: "unpaid".to_string(),
        due_date: (now + Duration::days(INVOICE_TERMS_DAYS))
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
        paid_at: None,
        created_at: timestamp(now),
    };

    for attempt in 0..MAX_NUMBER_ATTEMPTS {
        invoice.invoice_number = next_number(&mut *conn, kind, now.date_naive(), attempt).await?;
        match InvoiceRepository::create(&mut *conn, &invoice).await {
            Ok(created) => {
                info!("Issued invoice {} for quote {}", created.invoice_number, quote.quote_number);
                return Ok(created);
            }
            Err(e) if is_unique_violation_on(&e, &kind.unique_column()) => {
                warn!("Invoice number {} taken, retrying", invoice.invoice_number);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(LinguabridgeError::Conflict(
        "could not allocate an invoice number".to_string(),
    ))
}

async fn open_project(conn: &mut SqliteConnection, quote: &Quote, now: DateTime<Utc>) -> Result<Project> {
    if let Some(existing) = ProjectRepository::get_by_quote(&mut *conn, &quote.id).await? {
        return Ok(existing);
    }

    let created_at = timestamp(now);
    let project = Project {
        id: Uuid::new_v4().to_string(),
        quote_id: quote.id.clone(),
        customer_id: quote.customer_id.clone(),
        name: format!(
            "{} {}>{} {}",
            quote.quote_number, quote.source_language, quote.target_language, quote.service_type
        ),
        source_language: quote.source_language.clone(),
        target_language: quote.target_language.clone(),
        service_type: quote.service_type.clone(),
        address: quote.address.clone(),
        latitude: quote.latitude,
        longitude: quote.longitude,
        scheduled_at: quote.scheduled_at.clone(),
        linguist_id: None,
        status: ProjectStatus::Pending.as_str().to_string(),
        created_at: created_at.clone(),
        updated_at: created_at,
    };
    let project = ProjectRepository::create(&mut *conn, &project).await?;
    info!("Opened project {} for quote {}", project.id, quote.quote_number);
    Ok(project)
}

/// Move a project along its fulfilment workflow
///
/// Assignment only happens through invitation acceptance.
pub async fn transition_project(pool: &DatabasePool, project_id: &str, next: ProjectStatus) -> Result<Project> {
    if next == ProjectStatus::Assigned {
        return Err(LinguabridgeError::Validation(
            "projects are assigned by accepting an invitation".to_string(),
        ));
    }

    let mut tx = begin_write(pool).await?;
    let project = ProjectRepository::get_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("project", project_id))?;

    let current = project
        .status
        .parse::<ProjectStatus>()
        .map_err(LinguabridgeError::Validation)?;
    if !current.can_transition_to(next) {
        return Err(LinguabridgeError::InvalidStateTransition {
            from: current.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    ProjectRepository::update_status(&mut *tx, project_id, next.as_str()).await?;
    if next == ProjectStatus::Cancelled {
        InvitationRepository::expire_pending_for_project(&mut *tx, project_id).await?;
    }
    let project = ProjectRepository::get_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("project", project_id))?;
    tx.commit().await?;

    info!("Project {} moved {} -> {}", project_id, current, next);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Coupon, Customer, PricingRule};
    use crate::db::repositories::{CouponRepository, EmailRepository, PricingRuleRepository};
    use crate::db::DatabaseConnection;
    use crate::services::mail::OutboxMailer;

    async fn setup() -> (DatabaseConnection, OutboxMailer) {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let mut customer = Customer::new("c-1".into(), "Acme".into(), "ap@acme.test".into());
        customer.state = Some("FL".into());
        CustomerRepository::create(db.pool(), &customer).await.unwrap();
        let mailer = OutboxMailer::new(db.pool().clone());
        (db, mailer)
    }

    fn new_quote(word_count: i64, rate: Option<f64>) -> NewQuote {
        NewQuote {
            customer_id: "c-1".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            service_type: ServiceType::Translation,
            word_count,
            rate,
            minimum_charge: None,
            coupon_code: None,
            address: None,
            latitude: None,
            longitude: None,
            scheduled_at: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_quote_from_rule() {
        let (db, _) = setup().await;
        let pool = db.pool();
        let now = crate::db::now_timestamp();
        let rule = PricingRule {
            id: "r-1".into(),
            name: "EN>ES Florida".into(),
            source_language: "en".into(),
            target_language: Some("es".into()),
            service_type: "translation".into(),
            state: Some("FL".into()),
            unit: "per_word".into(),
            rate: 0.12,
            minimum_charge: 35.0,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        PricingRuleRepository::create(pool, &rule).await.unwrap();

        let small = create_quote(pool, new_quote(100, None), Utc::now()).await.unwrap();
        assert_eq!(small.subtotal, 35.0);
        assert_eq!(small.total, 35.0);
        assert_eq!(small.status, "DRAFT");

        let large = create_quote(pool, new_quote(1000, None), Utc::now()).await.unwrap();
        assert_eq!(large.subtotal, 120.0);
        assert_ne!(small.quote_number, large.quote_number);
        assert!(large.quote_number.starts_with("Q-"));
    }

    #[tokio::test]
    async fn test_create_quote_without_rule_is_not_found() {
        let (db, _) = setup().await;
        let err = create_quote(db.pool(), new_quote(100, None), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, LinguabridgeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_coupon_applied_and_redeemed() {
        let (db, _) = setup().await;
        let pool = db.pool();
        let mut coupon = Coupon::new("k-1".into(), "WELCOME10".into(), "percent", 10.0);
        coupon.one_per_customer = true;
        CouponRepository::create(pool, &coupon).await.unwrap();

        let mut input = new_quote(1000, Some(0.2));
        input.coupon_code = Some("welcome10".into());
        let quote = create_quote(pool, input.clone(), Utc::now()).await.unwrap();
        assert_eq!(quote.subtotal, 200.0);
        assert_eq!(quote.discount, 20.0);
        assert_eq!(quote.total, 180.0);
        assert_eq!(quote.coupon_code.as_deref(), Some("WELCOME10"));

        let stored = CouponRepository::get_by_id(pool, "k-1").await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 1);

        let err = create_quote(pool, input, Utc::now()).await.unwrap_err();
        assert!(matches!(
            err,
            LinguabridgeError::CouponRejected(crate::CouponRejection::AlreadyUsedByCustomer)
        ));
    }

    #[tokio::test]
    async fn test_full_quote_lifecycle() {
        let (db, mailer) = setup().await;
        let pool = db.pool();
        let quote = create_quote(pool, new_quote(500, Some(0.1)), Utc::now()).await.unwrap();

        let sent = transition_quote(pool, &mailer, &quote.id, QuoteStatus::Sent, Utc::now())
            .await
            .unwrap();
        assert_eq!(sent.quote.status, "SENT");
        let mail = EmailRepository::list_for_recipient(pool, "ap@acme.test").await.unwrap();
        assert_eq!(mail.len(), 1);

        transition_quote(pool, &mailer, &quote.id, QuoteStatus::Accepted, Utc::now())
            .await
            .unwrap();

        let invoiced = transition_quote(pool, &mailer, &quote.id, QuoteStatus::Invoiced, Utc::now())
            .await
            .unwrap();
        let invoice = invoiced.invoice.unwrap();
        assert_eq!(invoice.amount, 50.0);
        assert_eq!(invoice.status, "unpaid");
        assert!(invoice.invoice_number.starts_with("INV-"));

        let paid = transition_quote(pool, &mailer, &quote.id, QuoteStatus::InvoicePaid, Utc::now())
            .await
            .unwrap();
        assert_eq!(paid.quote.status, "INVOICE_PAID");
        assert_eq!(paid.invoice.unwrap().status, "paid");
        let project = paid.project.unwrap();
        assert_eq!(project.status, "pending");
        assert_eq!(project.quote_id, quote.id);
    }

    #[tokio::test]
    async fn test_invalid_transition_leaves_quote_untouched() {
        let (db, mailer) = setup().await;
        let pool = db.pool();
        let quote = create_quote(pool, new_quote(10, Some(1.0)), Utc::now()).await.unwrap();

        let err = transition_quote(pool, &mailer, &quote.id, QuoteStatus::InvoicePaid, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, LinguabridgeError::InvalidStateTransition { .. }));

        let stored = QuoteRepository::get_by_id(pool, &quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "DRAFT");
        assert!(InvoiceRepository::get_by_quote(pool, &quote.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_project_workflow() {
        let (db, mailer) = setup().await;
        let pool = db.pool();
        let quote = create_quote(pool, new_quote(10, Some(1.0)), Utc::now()).await.unwrap();
        for next in [QuoteStatus::Sent, QuoteStatus::Accepted, QuoteStatus::Invoiced, QuoteStatus::InvoicePaid] {
            transition_quote(pool, &mailer, &quote.id, next, Utc::now()).await.unwrap();
        }
        let project = ProjectRepository::get_by_quote(pool, &quote.id).await.unwrap().unwrap();

        let err = transition_project(pool, &project.id, ProjectStatus::Assigned)
            .await
            .unwrap_err();
        assert!(matches!(err, LinguabridgeError::Validation(_)));
        let err = transition_project(pool, &project.id, ProjectStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, LinguabridgeError::InvalidStateTransition { .. }));

        let cancelled = transition_project(pool, &project.id, ProjectStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, "cancelled");
    }
}

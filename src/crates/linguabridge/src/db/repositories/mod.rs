//! Repository pattern implementations for database access
//!
//! Each repository is a unit struct with associated async functions. They
//! accept any SQLite executor, so the same call works against the pool or
//! inside a transaction (`&mut *tx`).

pub mod coupon_repo;
pub mod customer_repo;
pub mod email_repo;
pub mod invitation_repo;
pub mod invoice_repo;
pub mod language_repo;
pub mod linguist_repo;
pub mod pricing_rule_repo;
pub mod project_repo;
pub mod quote_repo;

pub use coupon_repo::CouponRepository;
pub use customer_repo::CustomerRepository;
pub use email_repo::EmailRepository;
pub use invitation_repo::InvitationRepository;
pub use invoice_repo::{InvoiceRepository, PaymentRepository, PurchaseOrderRepository};
pub use language_repo::LanguageRepository;
pub use linguist_repo::LinguistRepository;
pub use pricing_rule_repo::PricingRuleRepository;
pub use project_repo::ProjectRepository;
pub use quote_repo::QuoteRepository;

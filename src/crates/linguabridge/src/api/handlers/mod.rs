//! API request handlers
//!
//! Handler functions for all API endpoints, organized by resource.

pub mod coupons;
pub mod customers;
pub mod health;
pub mod invitations;
pub mod invoices;
pub mod languages;
pub mod linguists;
pub mod pricing;
pub mod projects;
pub mod quotes;
pub mod system;
pub mod webhooks;

pub use coupons::{create_coupon, delete_coupon, get_coupon, list_coupons, validate_coupon};
pub use customers::{
    create_contact, create_customer, delete_customer, get_customer, list_contacts, list_customers,
    update_customer,
};
pub use health::{health, health_detailed};
pub use invitations::{accept_invitation, decline_invitation, expire_invitations};
pub use invoices::{get_invoice, list_invoices};
pub use languages::{create_language, list_languages};
pub use linguists::{
    create_linguist, delete_linguist, get_linguist, list_linguists, set_linguist_languages,
    update_linguist,
};
pub use pricing::{
    create_pricing_rule, delete_pricing_rule, estimate_price, get_pricing_rule,
    list_pricing_rules, update_pricing_rule,
};
pub use projects::{
    get_project, list_project_invitations, list_projects, list_purchase_orders, preview_matches,
    send_project_invitations, update_project_status,
};
pub use quotes::{create_quote, get_quote, list_quotes, update_quote_status};
pub use system::system_info;
pub use webhooks::payment_webhook;

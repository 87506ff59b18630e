//! Database models
//!
//! Row types for the agency schema. Timestamps are stored as RFC 3339
//! strings (TEXT in SQLite) and status columns as the `as_str` form of the
//! enums in [`crate::domain`].

pub mod coupon;
pub mod customer;
pub mod email;
pub mod invitation;
pub mod invoice;
pub mod language;
pub mod linguist;
pub mod pricing_rule;
pub mod project;
pub mod quote;

pub use coupon::{Coupon, CouponRedemption};
pub use customer::{Contact, Customer};
pub use email::{EmailTemplate, OutboundEmail};
pub use invitation::JobInvitation;
pub use invoice::{Invoice, Payment, PurchaseOrder};
pub use language::Language;
pub use linguist::{Linguist, LinguistLanguage};
pub use pricing_rule::PricingRule;
pub use project::Project;
pub use quote::Quote;

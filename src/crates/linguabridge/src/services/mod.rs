//! Domain services
//!
//! Business logic on top of the repositories. Pure calculations (pricing,
//! coupon rules, geo, ranking) are plain functions; workflows that write
//! several rows run inside one sqlx transaction.

pub mod coupons;
pub mod format;
pub mod geo;
pub mod invitations;
pub mod mail;
pub mod matching;
pub mod numbering;
pub mod payments;
pub mod pricing;
pub mod quotes;

pub use coupons::{discount_for, validate_coupon, AppliedCoupon, CouponContext, CouponRejection};
pub use format::{format_currency, format_date, round_cents};
pub use geo::distance_miles;
pub use invitations::{Acceptance, InvitationSettings, SendSummary};
pub use mail::{Mailer, OutboxMailer, OutgoingEmail};
pub use matching::{find_matches, rank_candidates, MatchCandidate, MatchRequest};
pub use pricing::{calculate_quote_price, resolve_rule, QuotePrice, RuleQuery};
pub use quotes::{NewQuote, TransitionOutcome};

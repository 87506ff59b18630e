//! Job invitations: send, accept, decline, expire
//!
//! Invitation state machine is PENDING -> ACCEPTED | DECLINED | EXPIRED.
//! Acceptance is exclusive: the first linguist to accept gets the project and
//! every other pending invitation for it is expired in the same transaction.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::error::is_unique_violation_on;
use crate::db::models::{JobInvitation, Linguist, Project, PurchaseOrder};
use crate::db::repositories::{
    InvitationRepository, LinguistRepository, ProjectRepository, PurchaseOrderRepository,
};
use crate::db::{begin_write, timestamp, DatabasePool};
use crate::domain::{InvitationStatus, ProjectStatus};
use crate::services::format::{format_date, format_datetime};
use crate::services::mail::{Mailer, OutgoingEmail};
use crate::services::matching::MatchCandidate;
use crate::services::numbering::{next_number, DocumentKind, MAX_NUMBER_ATTEMPTS};
use crate::{LinguabridgeError, Result};

/// Length of the emailed accept/decline token
pub const TOKEN_LENGTH: usize = 48;

/// Random alphanumeric invitation token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Column named in the error when the one-pending-per-linguist index trips
const PENDING_PAIR_COLUMN: &str = "job_invitations.linguist_id";

/// Knobs for sending invitations
#[derive(Debug, Clone)]
pub struct InvitationSettings {
    /// How long an invitation stays open
    pub ttl: Duration,

    /// Base URL the accept/decline links point at
    pub portal_base_url: String,
}

impl Default for InvitationSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(48),
            portal_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Result of a send run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    pub invitations: Vec<JobInvitation>,
}

/// Invite every candidate that does not already hold a pending invitation
///
/// A pending invitation created concurrently by another run trips the
/// one-pending-per-linguist index and counts as skipped. Any other failed
/// insert or email is logged and counted; the run continues.
pub async fn send_invitations(
    pool: &DatabasePool,
    mailer: &dyn Mailer,
    settings: &InvitationSettings,
    project_id: &str,
    candidates: &[MatchCandidate],
    now: DateTime<Utc>,
) -> Result<SendSummary> {
    let project = ProjectRepository::get_by_id(pool, project_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("project", project_id))?;

    if project.linguist_id.is_some()
        || InvitationRepository::count_accepted(pool, project_id).await? > 0
    {
        return Err(LinguabridgeError::Conflict(format!(
            "project {} already has an assigned linguist",
            project_id
        )));
    }
    if project.status != ProjectStatus::Pending.as_str() {
        return Err(LinguabridgeError::Conflict(format!(
            "project {} is {}",
            project_id, project.status
        )));
    }

    let mut summary = SendSummary::default();
    let expires_at = timestamp(now + settings.ttl);

    for candidate in candidates {
        let linguist = &candidate.linguist;

        if InvitationRepository::has_pending(pool, project_id, &linguist.id).await? {
            summary.skipped += 1;
            continue;
        }

        let invitation = JobInvitation {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            linguist_id: linguist.id.clone(),
            token: generate_token(),
            status: InvitationStatus::Pending.as_str().to_string(),
            distance_miles: candidate.distance_miles,
            expires_at: expires_at.clone(),
            responded_at: None,
            created_at: timestamp(now),
        };

        let invitation = match InvitationRepository::create(pool, &invitation).await {
            Ok(created) => created,
            Err(e) if is_unique_violation_on(&e, PENDING_PAIR_COLUMN) => {
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Failed to create invitation for linguist {}: {}", linguist.id, e);
                summary.failed += 1;
                continue;
            }
        };

        let email = invitation_email(&project, linguist, &invitation, settings);
        if let Err(e) = mailer.send(email).await {
            warn!("Failed to email invitation to {}: {}", linguist.email, e);
            summary.failed += 1;
        } else {
            summary.sent += 1;
        }
        summary.invitations.push(invitation);
    }

    info!(
        "Invitations for project {}: {} sent, {} skipped, {} failed",
        project_id, summary.sent, summary.skipped, summary.failed
    );
    Ok(summary)
}

fn invitation_email(
    project: &Project,
    linguist: &Linguist,
    invitation: &JobInvitation,
    settings: &InvitationSettings,
) -> OutgoingEmail {
    let base = settings.portal_base_url.trim_end_matches('/');
    OutgoingEmail::new(linguist.email.clone(), "job_invitation")
        .var("linguist_name", linguist.full_name())
        .var("project_name", project.name.clone())
        .var("service_type", project.service_type.clone())
        .var("source_language", project.source_language.clone())
        .var("target_language", project.target_language.clone())
        .var(
            "scheduled_at",
            project.scheduled_at.as_deref().map(format_datetime).unwrap_or_else(|| "TBD".to_string()),
        )
        .var("address", project.address.clone().unwrap_or_else(|| "remote".to_string()))
        .var(
            "distance",
            invitation
                .distance_miles
                .map(|d| format!("{:.1}", d))
                .unwrap_or_else(|| "n/a".to_string()),
        )
        .var("accept_url", format!("{}/invitations/{}/accept", base, invitation.token))
        .var("decline_url", format!("{}/invitations/{}/decline", base, invitation.token))
        .var("expires_at", format_datetime(&invitation.expires_at))
}

/// Everything produced by a successful acceptance
#[derive(Debug, Clone, Serialize)]
pub struct Acceptance {
    pub invitation: JobInvitation,
    pub project: Project,
    pub purchase_order: PurchaseOrder,

    /// Other pending invitations closed by this acceptance
    pub expired_others: u64,
}

/// Accept an invitation by token
pub async fn accept(
    pool: &DatabasePool,
    mailer: &dyn Mailer,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Acceptance> {
    let responded_at = timestamp(now);
    let mut tx = begin_write(pool).await?;

    let invitation = InvitationRepository::get_by_token(&mut *tx, token)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("invitation", token))?;

    if invitation.status != InvitationStatus::Accepted.as_str()
        && InvitationRepository::count_accepted(&mut *tx, &invitation.project_id).await? > 0
    {
        return Err(LinguabridgeError::Conflict(
            "another linguist already accepted this job".to_string(),
        ));
    }
    check_pending(&invitation)?;

    if invitation.is_expired_at(now) {
        InvitationRepository::resolve_pending(
            &mut *tx,
            &invitation.id,
            InvitationStatus::Expired.as_str(),
            &responded_at,
        )
        .await?;
        tx.commit().await?;
        return Err(LinguabridgeError::Gone(format!(
            "invitation expired at {}",
            invitation.expires_at
        )));
    }

    let project = ProjectRepository::get_by_id(&mut *tx, &invitation.project_id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("project", invitation.project_id.clone()))?;
    if project.status != ProjectStatus::Pending.as_str() {
        return Err(LinguabridgeError::Conflict(format!(
            "project {} is no longer open ({})",
            project.id, project.status
        )));
    }

    let flipped = InvitationRepository::resolve_pending(
        &mut *tx,
        &invitation.id,
        InvitationStatus::Accepted.as_str(),
        &responded_at,
    )
    .await?;
    let assigned =
        ProjectRepository::assign_linguist(&mut *tx, &project.id, &invitation.linguist_id).await?;
    if flipped == 0 || assigned == 0 {
        return Err(LinguabridgeError::Conflict(
            "another linguist already accepted this job".to_string(),
        ));
    }

    let expired_others =
        InvitationRepository::expire_other_pending(&mut *tx, &project.id, &invitation.id).await?;

    let purchase_order = issue_purchase_order(&mut tx, &project, &invitation.linguist_id, now).await?;

    let invitation = InvitationRepository::get_by_token(&mut *tx, token)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("invitation", token))?;
    let project = ProjectRepository::get_by_id(&mut *tx, &project.id)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("project", project.id.clone()))?;

    tx.commit().await?;

    info!(
        "Linguist {} accepted project {} (PO {}, {} other invitations expired)",
        invitation.linguist_id, project.id, purchase_order.po_number, expired_others
    );

    if let Some(linguist) = LinguistRepository::get_by_id(pool, &invitation.linguist_id).await? {
        let email = OutgoingEmail::new(linguist.email.clone(), "invitation_accepted")
            .var("linguist_name", linguist.full_name())
            .var("project_name", project.name.clone())
            .var("po_number", purchase_order.po_number.clone());
        if let Err(e) = mailer.send(email).await {
            warn!("Failed to email assignment confirmation to {}: {}", linguist.email, e);
        }
    }

    Ok(Acceptance {
        invitation,
        project,
        purchase_order,
        expired_others,
    })
}

async fn issue_purchase_order(
    conn: &mut sqlx::SqliteConnection,
    project: &Project,
    linguist_id: &str,
    now: DateTime<Utc>,
) -> Result<PurchaseOrder> {
    let kind = DocumentKind::PurchaseOrder;
    let mut po = PurchaseOrder {
        id: Uuid::new_v4().to_string(),
        po_number: String::new(),
        project_id: project.id.clone(),
        linguist_id: linguist_id.to_string(),
        status: "issued".to_string(),
        amount: None,
        created_at: timestamp(now),
    };

    for attempt in 0..MAX_NUMBER_ATTEMPTS {
        po.po_number = next_number(&mut *conn, kind, now.date_naive(), attempt).await?;
        match PurchaseOrderRepository::create(&mut *conn, &po).await {
            Ok(created) => return Ok(created),
            Err(e) if is_unique_violation_on(&e, &kind.unique_column()) => {
                warn!("PO number {} taken, retrying", po.po_number);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(LinguabridgeError::Conflict(
        "could not allocate a purchase order number".to_string(),
    ))
}

/// Only PENDING invitations can be answered
fn check_pending(invitation: &JobInvitation) -> Result<()> {
    match invitation.status.parse::<InvitationStatus>() {
        Ok(InvitationStatus::Pending) => Ok(()),
        Ok(InvitationStatus::Expired) => Err(LinguabridgeError::Gone(format!(
            "invitation expired at {}",
            format_date(&invitation.expires_at)
        ))),
        Ok(status) => Err(LinguabridgeError::Conflict(format!(
            "invitation already {}",
            status.as_str().to_ascii_lowercase()
        ))),
        Err(e) => Err(LinguabridgeError::Validation(e)),
    }
}

/// Decline an invitation by token
pub async fn decline(pool: &DatabasePool, token: &str, now: DateTime<Utc>) -> Result<JobInvitation> {
    let invitation = InvitationRepository::get_by_token(pool, token)
        .await?
        .ok_or_else(|| LinguabridgeError::not_found("invitation", token))?;
    check_pending(&invitation)?;

    let responded_at = timestamp(now);
    let next = if invitation.is_expired_at(now) {
        InvitationStatus::Expired
    } else {
        InvitationStatus::Declined
    };

    let updated =
        InvitationRepository::resolve_pending(pool, &invitation.id, next.as_str(), &responded_at).await?;
    if updated == 0 {
        return Err(LinguabridgeError::Conflict(
            "invitation was answered concurrently".to_string(),
        ));
    }
    if next == InvitationStatus::Expired {
        return Err(LinguabridgeError::Gone(format!(
            "invitation expired at {}",
            invitation.expires_at
        )));
    }

    info!("Linguist {} declined project {}", invitation.linguist_id, invitation.project_id);
    Ok(JobInvitation {
        status: next.as_str().to_string(),
        responded_at: Some(responded_at),
        ..invitation
    })
}

/// Expire every pending invitation whose deadline has passed
pub async fn expire_overdue(pool: &DatabasePool, now: DateTime<Utc>) -> Result<u64> {
    let expired = InvitationRepository::expire_overdue(pool, &timestamp(now)).await?;
    if expired > 0 {
        info!("Expired {} overdue invitations", expired);
    }
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Customer, Quote};
    use crate::db::repositories::{CustomerRepository, EmailRepository, QuoteRepository};
    use crate::db::DatabaseConnection;
    use crate::services::mail::OutboxMailer;

    async fn seed(pool: &DatabasePool, linguist_ids: &[&str]) -> Project {
        let customer = Customer::new("c-1".into(), "Acme".into(), "ops@acme.test".into());
        CustomerRepository::create(pool, &customer).await.unwrap();

        let now = crate::db::now_timestamp();
        let quote = Quote {
            id: "q-1".into(),
            quote_number: "Q-20260105-0001".into(),
            customer_id: "c-1".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            service_type: "onsite".into(),
            word_count: 2,
            rate: 60.0,
            minimum_charge: 120.0,
            subtotal: 120.0,
            discount: 0.0,
            tax: 0.0,
            total: 120.0,
            coupon_code: None,
            address: Some("1 Court Plaza".into()),
            latitude: Some(26.0),
            longitude: Some(-80.2),
            scheduled_at: Some("2026-02-01T14:00:00Z".into()),
            status: "INVOICE_PAID".into(),
            notes: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        QuoteRepository::create(pool, &quote).await.unwrap();

        let project = Project {
            id: "p-1".into(),
            quote_id: "q-1".into(),
            customer_id: "c-1".into(),
            name: "Deposition".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            service_type: "onsite".into(),
            address: quote.address.clone(),
            latitude: quote.latitude,
            longitude: quote.longitude,
            scheduled_at: quote.scheduled_at.clone(),
            linguist_id: None,
            status: "pending".into(),
            created_at: now.clone(),
            updated_at: now,
        };
        ProjectRepository::create(pool, &project).await.unwrap();

        for id in linguist_ids {
            let l = Linguist::new(id.to_string(), "Test".into(), id.to_string(), format!("{}@x.test", id));
            LinguistRepository::create(pool, &l).await.unwrap();
        }
        project
    }

    async fn candidates(pool: &DatabasePool, ids: &[&str]) -> Vec<MatchCandidate> {
        let mut out = Vec::new();
        for id in ids {
            let linguist = LinguistRepository::get_by_id(pool, id).await.unwrap().unwrap();
            out.push(MatchCandidate {
                linguist,
                distance_miles: Some(5.0),
            });
        }
        out
    }

    /// File-backed database so the pool really opens several connections
    async fn file_db() -> (tempfile::TempDir, DatabaseConnection) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("agency.db").display());
        let db = DatabaseConnection::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        (dir, db)
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_send_skips_pending_and_emails_each() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a", "b"]).await;
        let mailer = OutboxMailer::new(pool.clone());
        let settings = InvitationSettings::default();

        let first = send_invitations(pool, &mailer, &settings, "p-1", &candidates(pool, &["a"]).await, Utc::now())
            .await
            .unwrap();
        assert_eq!((first.sent, first.skipped, first.failed), (1, 0, 0));

        let second = send_invitations(pool, &mailer, &settings, "p-1", &candidates(pool, &["a", "b"]).await, Utc::now())
            .await
            .unwrap();
        assert_eq!((second.sent, second.skipped, second.failed), (1, 1, 0));

        let queued = EmailRepository::list_for_recipient(pool, "a@x.test").await.unwrap();
        assert_eq!(queued.len(), 1);
        assert!(queued[0].body.contains(&first.invitations[0].token));
    }

    #[tokio::test]
    async fn test_one_pending_invitation_per_linguist() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a"]).await;

        let invitation = |id: &str| JobInvitation {
            id: id.to_string(),
            project_id: "p-1".into(),
            linguist_id: "a".into(),
            token: generate_token(),
            status: "PENDING".into(),
            distance_miles: None,
            expires_at: timestamp(Utc::now() + Duration::hours(48)),
            responded_at: None,
            created_at: crate::db::now_timestamp(),
        };

        InvitationRepository::create(pool, &invitation("i-1")).await.unwrap();
        let err = InvitationRepository::create(pool, &invitation("i-2")).await.unwrap_err();
        assert!(is_unique_violation_on(&err, PENDING_PAIR_COLUMN));

        InvitationRepository::resolve_pending(pool, "i-1", "DECLINED", &crate::db::now_timestamp())
            .await
            .unwrap();
        InvitationRepository::create(pool, &invitation("i-3")).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sends_invite_each_linguist_once() {
        let (_dir, db) = file_db().await;
        let pool = db.pool();
        seed(pool, &["a", "b"]).await;
        let batch = candidates(pool, &["a", "b"]).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pool = pool.clone();
            let batch = batch.clone();
            handles.push(tokio::spawn(async move {
                let mailer = OutboxMailer::new(pool.clone());
                send_invitations(&pool, &mailer, &InvitationSettings::default(), "p-1", &batch, Utc::now()).await
            }));
        }

        let (mut sent, mut skipped) = (0, 0);
        for handle in handles {
            let summary = handle.await.unwrap().unwrap();
            assert_eq!(summary.failed, 0);
            sent += summary.sent;
            skipped += summary.skipped;
        }
        assert_eq!((sent, skipped), (2, 6));

        let pending = InvitationRepository::list_by_project(pool, "p-1").await.unwrap();
        assert_eq!(pending.len(), 2);
        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accepts_leave_one_winner() {
        let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let (_dir, db) = file_db().await;
        let pool = db.pool();
        seed(pool, &ids).await;
        let mailer = OutboxMailer::new(pool.clone());
        let summary = send_invitations(
            pool,
            &mailer,
            &InvitationSettings::default(),
            "p-1",
            &candidates(pool, &ids).await,
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(summary.sent, ids.len());

        let mut handles = Vec::new();
        for invitation in summary.invitations {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let mailer = OutboxMailer::new(pool.clone());
                accept(&pool, &mailer, &invitation.token, Utc::now()).await
            }));
        }

        let (mut won, mut conflicts) = (0, 0);
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(LinguabridgeError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected acceptance error: {}", e),
            }
        }
        assert_eq!((won, conflicts), (1, ids.len() - 1));

        assert_eq!(InvitationRepository::count_accepted(pool, "p-1").await.unwrap(), 1);
        let pos = PurchaseOrderRepository::list_by_project(pool, "p-1").await.unwrap();
        assert_eq!(pos.len(), 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_acceptance_is_exclusive() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a", "b", "c"]).await;
        let mailer = OutboxMailer::new(pool.clone());

        let summary = send_invitations(
            pool,
            &mailer,
            &InvitationSettings::default(),
            "p-1",
            &candidates(pool, &["a", "b", "c"]).await,
            Utc::now(),
        )
        .await
        .unwrap();
        let tokens: Vec<_> = summary.invitations.iter().map(|i| i.token.clone()).collect();

        let accepted = accept(pool, &mailer, &tokens[1], Utc::now()).await.unwrap();
        assert_eq!(accepted.invitation.status, "ACCEPTED");
        assert_eq!(accepted.project.status, "assigned");
        assert_eq!(accepted.project.linguist_id.as_deref(), Some("b"));
        assert_eq!(accepted.expired_others, 2);
        assert!(accepted.purchase_order.po_number.starts_with("PO-"));

        for (i, token) in tokens.iter().enumerate() {
            let inv = InvitationRepository::get_by_token(pool, token).await.unwrap().unwrap();
            let expected = if i == 1 { "ACCEPTED" } else { "EXPIRED" };
            assert_eq!(inv.status, expected);
        }

        let late = accept(pool, &mailer, &tokens[0], Utc::now()).await.unwrap_err();
        assert!(matches!(late, LinguabridgeError::Conflict(_)));
        let again = accept(pool, &mailer, &tokens[1], Utc::now()).await.unwrap_err();
        assert!(matches!(again, LinguabridgeError::Conflict(_)));

        let pos = PurchaseOrderRepository::list_by_project(pool, "p-1").await.unwrap();
        assert_eq!(pos.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_invitation_cannot_be_accepted() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a"]).await;
        let mailer = OutboxMailer::new(pool.clone());

        let sent_at = Utc::now() - Duration::hours(72);
        let summary = send_invitations(
            pool,
            &mailer,
            &InvitationSettings::default(),
            "p-1",
            &candidates(pool, &["a"]).await,
            sent_at,
        )
        .await
        .unwrap();
        let token = summary.invitations[0].token.clone();

        let err = accept(pool, &mailer, &token, Utc::now()).await.unwrap_err();
        assert!(matches!(err, LinguabridgeError::Gone(_)));

        let inv = InvitationRepository::get_by_token(pool, &token).await.unwrap().unwrap();
        assert_eq!(inv.status, "EXPIRED");
        let project = ProjectRepository::get_by_id(pool, "p-1").await.unwrap().unwrap();
        assert!(project.linguist_id.is_none());
    }

    #[tokio::test]
    async fn test_decline_and_sweep() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a", "b"]).await;
        let mailer = OutboxMailer::new(pool.clone());

        let sent_at = Utc::now() - Duration::hours(1);
        let summary = send_invitations(
            pool,
            &mailer,
            &InvitationSettings::default(),
            "p-1",
            &candidates(pool, &["a", "b"]).await,
            sent_at,
        )
        .await
        .unwrap();

        let declined = decline(pool, &summary.invitations[0].token, Utc::now()).await.unwrap();
        assert_eq!(declined.status, "DECLINED");
        let again = decline(pool, &summary.invitations[0].token, Utc::now()).await.unwrap_err();
        assert!(matches!(again, LinguabridgeError::Conflict(_)));

        assert_eq!(expire_overdue(pool, Utc::now()).await.unwrap(), 0);
        assert_eq!(expire_overdue(pool, Utc::now() + Duration::hours(48)).await.unwrap(), 1);

        let swept = InvitationRepository::get_by_token(pool, &summary.invitations[1].token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(swept.status, "EXPIRED");
    }

    #[tokio::test]
    async fn test_assigned_project_rejects_new_invitations() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let pool = db.pool();
        seed(pool, &["a", "b"]).await;
        let mailer = OutboxMailer::new(pool.clone());
        ProjectRepository::assign_linguist(pool, "p-1", "a").await.unwrap();

        let err = send_invitations(
            pool,
            &mailer,
            &InvitationSettings::default(),
            "p-1",
            &candidates(pool, &["b"]).await,
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LinguabridgeError::Conflict(_)));
    }
}

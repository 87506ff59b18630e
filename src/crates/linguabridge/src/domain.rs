//! Status and category enums shared by the database layer and the API.
//!
//! Rows store these as TEXT; `as_str` / `FromStr` are the only conversions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of work a quote or project covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Written translation, priced per word
    Translation,
    /// On-site interpretation at the job address
    Onsite,
    /// Video remote interpretation
    Video,
    /// Over-the-phone interpretation
    Phone,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Translation,
        ServiceType::Onsite,
        ServiceType::Video,
        ServiceType::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Translation => "translation",
            ServiceType::Onsite => "onsite",
            ServiceType::Video => "video",
            ServiceType::Phone => "phone",
        }
    }

    /// Interpretation services are the ones linguists get matched for
    pub fn is_interpretation(&self) -> bool {
        !matches!(self, ServiceType::Translation)
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "translation" => Ok(ServiceType::Translation),
            "onsite" => Ok(ServiceType::Onsite),
            "video" | "vri" => Ok(ServiceType::Video),
            "phone" | "opi" => Ok(ServiceType::Phone),
            other => Err(format!("unknown service type: {}", other)),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
    Invoiced,
    InvoicePaid,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "DRAFT",
            QuoteStatus::Sent => "SENT",
            QuoteStatus::Accepted => "ACCEPTED",
            QuoteStatus::Declined => "DECLINED",
            QuoteStatus::Expired => "EXPIRED",
            QuoteStatus::Invoiced => "INVOICED",
            QuoteStatus::InvoicePaid => "INVOICE_PAID",
            QuoteStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the workflow allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Draft, Cancelled)
                | (Sent, Accepted)
                | (Sent, Declined)
                | (Sent, Expired)
                | (Sent, Cancelled)
                | (Accepted, Invoiced)
                | (Accepted, Cancelled)
                | (Invoiced, InvoicePaid)
                | (Invoiced, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Declined
                | QuoteStatus::Expired
                | QuoteStatus::Cancelled
                | QuoteStatus::InvoicePaid
        )
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(QuoteStatus::Draft),
            "SENT" => Ok(QuoteStatus::Sent),
            "ACCEPTED" => Ok(QuoteStatus::Accepted),
            "DECLINED" => Ok(QuoteStatus::Declined),
            "EXPIRED" => Ok(QuoteStatus::Expired),
            "INVOICED" => Ok(QuoteStatus::Invoiced),
            "INVOICE_PAID" => Ok(QuoteStatus::InvoicePaid),
            "CANCELLED" => Ok(QuoteStatus::Cancelled),
            other => Err(format!("unknown quote status: {}", other)),
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfilment status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Assigned => "assigned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Pending, Cancelled)
                | (Assigned, InProgress)
                | (Assigned, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ProjectStatus::Pending),
            "assigned" => Ok(ProjectStatus::Assigned),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!("unknown project status: {}", other)),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job invitation state machine: PENDING -> ACCEPTED | DECLINED | EXPIRED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
            InvitationStatus::Declined => "DECLINED",
            InvitationStatus::Expired => "EXPIRED",
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InvitationStatus::Pending),
            "ACCEPTED" => Ok(InvitationStatus::Accepted),
            "DECLINED" => Ok(InvitationStatus::Declined),
            "EXPIRED" => Ok(InvitationStatus::Expired),
            other => Err(format!("unknown invitation status: {}", other)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_parse_aliases() {
        assert_eq!("On-Site".parse::<ServiceType>(), Ok(ServiceType::Onsite));
        assert_eq!("VRI".parse::<ServiceType>(), Ok(ServiceType::Video));
        assert_eq!("opi".parse::<ServiceType>(), Ok(ServiceType::Phone));
        assert!("courier".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_service_type_round_trip_names() {
        for st in ServiceType::ALL {
            assert_eq!(st.as_str().parse::<ServiceType>(), Ok(st));
        }
        assert!(!ServiceType::Translation.is_interpretation());
        assert!(ServiceType::Onsite.is_interpretation());
    }

    #[test]
    fn test_quote_happy_path_transitions() {
        use QuoteStatus::*;
        let path = [Draft, Sent, Accepted, Invoiced, InvoicePaid];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_quote_terminal_states_are_final() {
        use QuoteStatus::*;
        for terminal in [Declined, Expired, Cancelled, InvoicePaid] {
            assert!(terminal.is_terminal());
            for next in [Draft, Sent, Accepted, Invoiced, InvoicePaid, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_quote_cannot_skip_invoice() {
        assert!(!QuoteStatus::Accepted.can_transition_to(QuoteStatus::InvoicePaid));
        assert!(!QuoteStatus::Draft.can_transition_to(QuoteStatus::Accepted));
    }

    #[test]
    fn test_quote_status_serde_names() {
        let json = serde_json::to_string(&QuoteStatus::InvoicePaid).unwrap();
        assert_eq!(json, "\"INVOICE_PAID\"");
        assert_eq!("invoice_paid".parse::<QuoteStatus>(), Ok(QuoteStatus::InvoicePaid));
    }

    #[test]
    fn test_project_transitions() {
        assert!(ProjectStatus::Pending.can_transition_to(ProjectStatus::Assigned));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::Pending));
        assert_eq!("in_progress".parse::<ProjectStatus>(), Ok(ProjectStatus::InProgress));
    }
}

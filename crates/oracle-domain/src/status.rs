use std::{fmt, str::FromStr};

/// Lifecycle status of a tutorial submission as stored by the registry contract.
///
/// The registry encodes the status as an upper case string. Transitions follow
/// a single directed path:
///
/// ```text
/// PENDING ──► VALID ──► PAID
///    │
///    └──────► INVALID
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    Pending,
    Invalid,
    Valid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission status '{0}'")]
pub struct StatusParseError(pub String);

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Invalid => "INVALID",
            SubmissionStatus::Valid => "VALID",
            SubmissionStatus::Paid => "PAID",
        }
    }

    /// `INVALID` and `PAID` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Invalid | SubmissionStatus::Paid)
    }

    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (SubmissionStatus::Pending, SubmissionStatus::Valid)
                | (SubmissionStatus::Pending, SubmissionStatus::Invalid)
                | (SubmissionStatus::Valid, SubmissionStatus::Paid)
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SubmissionStatus::Pending),
            "INVALID" => Ok(SubmissionStatus::Invalid),
            "VALID" => Ok(SubmissionStatus::Valid),
            "PAID" => Ok(SubmissionStatus::Paid),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Invalid,
        SubmissionStatus::Valid,
        SubmissionStatus::Paid,
    ];

    #[test]
    fn parses_registry_encoding() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase_strings() {
        assert_eq!(
            "APPROVED".parse::<SubmissionStatus>(),
            Err(StatusParseError("APPROVED".to_string()))
        );
        assert!("pending".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn only_forward_transitions_are_allowed() {
        let allowed: Vec<_> = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            allowed,
            vec![
                (SubmissionStatus::Pending, SubmissionStatus::Invalid),
                (SubmissionStatus::Pending, SubmissionStatus::Valid),
                (SubmissionStatus::Valid, SubmissionStatus::Paid),
            ]
        );
    }

    #[test]
    fn terminal_statuses_have_no_successor() {
        for status in ALL.into_iter().filter(SubmissionStatus::is_terminal) {
            assert!(ALL.iter().all(|next| !status.can_transition_to(*next)));
        }
    }
}

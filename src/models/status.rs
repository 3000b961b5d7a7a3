use std::{fmt::Display, sync::Arc};

use parking_lot::RwLock;
use serde::Serialize;

/// Status handle written by the poll loop and read by the host.
pub type SharedStatus = Arc<RwLock<StatusSlot>>;

/// Connection state as reported to the block host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionStatus {
    /// Loaded, no poll has completed yet.
    #[default]
    Connecting,
    /// The last poll succeeded.
    Ready,
    /// The last poll failed with this message.
    Error(String),
}

/// Wire shape of the host's status protocol.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusReport {
    pub status: u8,
    pub msg: String,
}

/// The latest status together with the poll request that produced it.
#[derive(Debug, Default)]
pub struct StatusSlot {
    status: ExtensionStatus,
    seq: Option<u64>,
}

impl StatusSlot {
    pub fn shared() -> SharedStatus {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn status(&self) -> &ExtensionStatus {
        &self.status
    }

    /// Store the outcome of poll request `seq`, unless a request issued later
    /// has already reported. Returns whether it was kept.
    pub fn record(&mut self, seq: u64, status: ExtensionStatus) -> bool {
        if matches!(self.seq, Some(held) if held >= seq) {
            return false;
        }
        self.status = status;
        self.seq = Some(seq);
        true
    }
}

impl ExtensionStatus {
    /// 0 = error, 1 = not ready yet, 2 = ready.
    pub fn code(&self) -> u8 {
        match self {
            ExtensionStatus::Error(_) => 0,
            ExtensionStatus::Connecting => 1,
            ExtensionStatus::Ready => 2,
        }
    }

    pub fn report(&self) -> StatusReport {
        StatusReport {
            status: self.code(),
            msg: self.to_string(),
        }
    }
}

impl Display for ExtensionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtensionStatus::Connecting => write!(f, "Waiting for the ROBO LT"),
            ExtensionStatus::Ready => write!(f, "Ready"),
            ExtensionStatus::Error(message) => write!(f, "Device not reachable: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_outcome_of_older_request_is_dropped() {
        let mut slot = StatusSlot::default();
        assert_eq!(*slot.status(), ExtensionStatus::Connecting);

        assert!(slot.record(3, ExtensionStatus::Ready));
        assert!(!slot.record(2, ExtensionStatus::Error("timed out".into())));
        assert!(!slot.record(3, ExtensionStatus::Error("timed out".into())));
        assert_eq!(*slot.status(), ExtensionStatus::Ready);

        assert!(slot.record(4, ExtensionStatus::Error("refused".into())));
        assert_eq!(slot.status().code(), 0);
    }

    #[test]
    fn test_report() {
        assert_eq!(ExtensionStatus::default().report().status, 1);
        assert_eq!(
            ExtensionStatus::Ready.report(),
            StatusReport {
                status: 2,
                msg: "Ready".into()
            }
        );
        let report = ExtensionStatus::Error("timed out".into()).report();
        assert_eq!(report.status, 0);
        assert!(report.msg.ends_with("timed out"));
    }
}

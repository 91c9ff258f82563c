//! Order lifecycle: status values and the transitions the exporter
//! confirmation step is allowed to perform.

use crate::error::CoreError;

/// Lifecycle status of a persisted order.
///
/// Orders are created `PendingSync`; an external exporter-confirmation step
/// moves them to `Synced` or `Error`. `Cancelled` orders are excluded from
/// quota arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingSync,
    Synced,
    Error,
    Cancelled,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending_sync" => Ok(Self::PendingSync),
            "synced" => Ok(Self::Synced),
            "error" => Ok(Self::Error),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown order status '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingSync => "pending_sync",
            Self::Synced => "synced",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Validate a status transition requested by the exporter confirmation step.
///
/// `pending_sync` may move to any other status; `synced` and `error` may
/// only be cancelled; a cancelled order is terminal (its lines have already
/// been released back to the quota pool).
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    use OrderStatus::*;
    let allowed = match (from, to) {
        (PendingSync, Synced | Error | Cancelled) => true,
        (Synced | Error, Cancelled) => true,
        _ => false,
    };
    if !allowed {
        return Err(CoreError::Conflict(format!(
            "Order status cannot move from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for s in ["pending_sync", "synced", "error", "cancelled"] {
            assert_eq!(OrderStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(OrderStatus::parse("shipped").is_err());
    }

    #[test]
    fn pending_moves_anywhere() {
        assert!(validate_transition(OrderStatus::PendingSync, OrderStatus::Synced).is_ok());
        assert!(validate_transition(OrderStatus::PendingSync, OrderStatus::Error).is_ok());
        assert!(validate_transition(OrderStatus::PendingSync, OrderStatus::Cancelled).is_ok());
    }

    #[test]
    fn terminal_states_only_cancel() {
        assert!(validate_transition(OrderStatus::Synced, OrderStatus::Cancelled).is_ok());
        assert!(validate_transition(OrderStatus::Error, OrderStatus::Cancelled).is_ok());
        assert!(validate_transition(OrderStatus::Synced, OrderStatus::PendingSync).is_err());
        assert!(validate_transition(OrderStatus::Cancelled, OrderStatus::PendingSync).is_err());
        assert!(validate_transition(OrderStatus::Cancelled, OrderStatus::Synced).is_err());
    }
}

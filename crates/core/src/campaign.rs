//! Campaign domain types, window-status evaluation, and admission policy.
//!
//! A campaign is the unit customers order against: it has a country scope,
//! an active date window, an assignment mode governing who may enter, and an
//! order type that flows through to the ERP export.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

/// A customer's market. Customers are identified by the composite
/// (customer_number, country).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Be,
    Lu,
}

impl Country {
    /// Parse the stored/transmitted representation (`"BE"` / `"LU"`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "BE" => Ok(Self::Be),
            "LU" => Ok(Self::Lu),
            other => Err(CoreError::Validation(format!(
                "Unknown country '{other}', expected BE or LU"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Be => "BE",
            Self::Lu => "LU",
        }
    }
}

/// Country scope of a campaign. `Both` campaigns serve BE and LU customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignCountry {
    Be,
    Lu,
    Both,
}

impl CampaignCountry {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "BE" => Ok(Self::Be),
            "LU" => Ok(Self::Lu),
            "BOTH" => Ok(Self::Both),
            other => Err(CoreError::Validation(format!(
                "Unknown campaign country '{other}', expected BE, LU or BOTH"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Be => "BE",
            Self::Lu => "LU",
            Self::Both => "BOTH",
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment mode
// ---------------------------------------------------------------------------

/// Policy governing which customers may enter a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    /// Every identified customer is admitted.
    Automatic,
    /// Only customers on the campaign's explicit allow-list are admitted.
    Manual,
    /// Admission requires the campaign password and a successful lookup in
    /// the external customer directory.
    Protected,
}

impl AssignmentMode {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "automatic" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            "protected" => Ok(Self::Protected),
            other => Err(CoreError::Validation(format!(
                "Unknown assignment mode '{other}', expected automatic, manual or protected"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
            Self::Protected => "protected",
        }
    }
}

// ---------------------------------------------------------------------------
// Order type
// ---------------------------------------------------------------------------

/// Single-letter order classification carried into the ERP H-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    V,
    W,
}

impl OrderType {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "V" => Ok(Self::V),
            "W" => Ok(Self::W),
            other => Err(CoreError::Validation(format!(
                "Unknown order type '{other}', expected V or W"
            ))),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::V => 'V',
            Self::W => 'W',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V => "V",
            Self::W => "W",
        }
    }
}

// ---------------------------------------------------------------------------
// Window status
// ---------------------------------------------------------------------------

/// Where a campaign stands relative to its active window and activation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Upcoming,
    Ended,
    Inactive,
    Active,
}

/// Evaluate a campaign's window status for a given civil date.
///
/// Precedence: the date window is checked before the activation flag, so a
/// campaign that has ended reports `Ended` even if it was also deactivated.
pub fn window_status(
    starts_on: NaiveDate,
    ends_on: NaiveDate,
    is_active: bool,
    today: NaiveDate,
) -> CampaignStatus {
    if today < starts_on {
        CampaignStatus::Upcoming
    } else if today > ends_on {
        CampaignStatus::Ended
    } else if !is_active {
        CampaignStatus::Inactive
    } else {
        CampaignStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Admission denial
// ---------------------------------------------------------------------------

/// Why a visitor was not admitted into a campaign's catalog.
///
/// These are expected outcomes, rendered as structured responses at the API
/// boundary -- not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    Upcoming,
    Ended,
    Inactive,
    AccessDenied,
    QuotasExhausted,
}

impl DenialReason {
    /// Stable machine-readable code for API responses.
    pub fn code(self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ended => "ENDED",
            Self::Inactive => "INACTIVE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::QuotasExhausted => "QUOTAS_EXHAUSTED",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Upcoming => "This campaign has not started yet",
            Self::Ended => "This campaign has ended",
            Self::Inactive => "This campaign is not currently available",
            Self::AccessDenied => "You are not authorized to enter this campaign",
            Self::QuotasExhausted => "All items in this campaign are sold out",
        }
    }

    /// Map a non-`Active` window status to its denial reason.
    ///
    /// Returns `None` for `Active`, which is an admission, not a denial.
    pub fn from_status(status: CampaignStatus) -> Option<Self> {
        match status {
            CampaignStatus::Upcoming => Some(Self::Upcoming),
            CampaignStatus::Ended => Some(Self::Ended),
            CampaignStatus::Inactive => Some(Self::Inactive),
            CampaignStatus::Active => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant validation
// ---------------------------------------------------------------------------

/// Validate that a campaign window is well-ordered.
pub fn validate_window(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<(), CoreError> {
    if starts_on > ends_on {
        return Err(CoreError::Validation(format!(
            "Campaign start date {starts_on} is after end date {ends_on}"
        )));
    }
    Ok(())
}

/// Validate that a protected campaign carries a non-empty password.
pub fn validate_password(
    mode: AssignmentMode,
    order_password: Option<&str>,
) -> Result<(), CoreError> {
    if mode == AssignmentMode::Protected
        && order_password.map(str::trim).is_none_or(str::is_empty)
    {
        return Err(CoreError::Validation(
            "Protected campaigns require a non-empty order password".into(),
        ));
    }
    Ok(())
}

/// Validate that a deferred-delivery campaign carries a delivery date.
pub fn validate_delivery(
    deferred_delivery: bool,
    delivery_on: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if deferred_delivery && delivery_on.is_none() {
        return Err(CoreError::Validation(
            "Deferred-delivery campaigns require a delivery date".into(),
        ));
    }
    Ok(())
}

/// Validate item consumption limits: both, when present, must be positive.
pub fn validate_item_limits(
    max_total: Option<i64>,
    max_per_customer: Option<i64>,
) -> Result<(), CoreError> {
    if let Some(n) = max_total {
        if n <= 0 {
            return Err(CoreError::Validation(format!(
                "max_total must be positive, got {n}"
            )));
        }
    }
    if let Some(n) = max_per_customer {
        if n <= 0 {
            return Err(CoreError::Validation(format!(
                "max_per_customer must be positive, got {n}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // -- window_status --

    #[test]
    fn campaign_starting_tomorrow_is_upcoming() {
        let today = d(2025, 11, 3);
        // Active flag and everything else must not matter.
        let status = window_status(d(2025, 11, 4), d(2025, 11, 30), true, today);
        assert_eq!(status, CampaignStatus::Upcoming);
    }

    #[test]
    fn campaign_ended_yesterday_is_ended() {
        let today = d(2025, 12, 1);
        let status = window_status(d(2025, 11, 1), d(2025, 11, 30), true, today);
        assert_eq!(status, CampaignStatus::Ended);
    }

    #[test]
    fn deactivated_campaign_in_window_is_inactive() {
        let today = d(2025, 11, 15);
        let status = window_status(d(2025, 11, 1), d(2025, 11, 30), false, today);
        assert_eq!(status, CampaignStatus::Inactive);
    }

    #[test]
    fn campaign_in_window_and_active_is_active() {
        let today = d(2025, 11, 15);
        let status = window_status(d(2025, 11, 1), d(2025, 11, 30), true, today);
        assert_eq!(status, CampaignStatus::Active);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let starts = d(2025, 11, 1);
        let ends = d(2025, 11, 30);
        assert_eq!(window_status(starts, ends, true, starts), CampaignStatus::Active);
        assert_eq!(window_status(starts, ends, true, ends), CampaignStatus::Active);
    }

    // -- parsing --

    #[test]
    fn parse_known_countries() {
        assert_eq!(Country::parse("BE").unwrap(), Country::Be);
        assert_eq!(Country::parse("LU").unwrap(), Country::Lu);
        assert!(Country::parse("FR").is_err());
        assert!(Country::parse("be").is_err());
    }

    #[test]
    fn parse_campaign_countries() {
        assert_eq!(CampaignCountry::parse("BOTH").unwrap(), CampaignCountry::Both);
        assert!(CampaignCountry::parse("ALL").is_err());
    }

    #[test]
    fn parse_assignment_modes() {
        assert_eq!(
            AssignmentMode::parse("protected").unwrap(),
            AssignmentMode::Protected
        );
        assert!(AssignmentMode::parse("open").is_err());
    }

    #[test]
    fn parse_order_types() {
        assert_eq!(OrderType::parse("V").unwrap(), OrderType::V);
        assert_eq!(OrderType::parse("W").unwrap().as_char(), 'W');
        assert!(OrderType::parse("X").is_err());
    }

    // -- invariants --

    #[test]
    fn window_start_after_end_rejected() {
        assert!(validate_window(d(2025, 12, 1), d(2025, 11, 1)).is_err());
        assert!(validate_window(d(2025, 11, 1), d(2025, 11, 1)).is_ok());
    }

    #[test]
    fn protected_without_password_rejected() {
        assert!(validate_password(AssignmentMode::Protected, None).is_err());
        assert!(validate_password(AssignmentMode::Protected, Some("  ")).is_err());
        assert!(validate_password(AssignmentMode::Protected, Some("s3cret")).is_ok());
        assert!(validate_password(AssignmentMode::Automatic, None).is_ok());
    }

    #[test]
    fn deferred_delivery_requires_date() {
        assert!(validate_delivery(true, None).is_err());
        assert!(validate_delivery(true, Some(d(2026, 1, 15))).is_ok());
        assert!(validate_delivery(false, None).is_ok());
    }

    #[test]
    fn item_limits_must_be_positive() {
        assert!(validate_item_limits(Some(0), None).is_err());
        assert!(validate_item_limits(None, Some(-3)).is_err());
        assert!(validate_item_limits(Some(10), Some(2)).is_ok());
        assert!(validate_item_limits(None, None).is_ok());
    }
}

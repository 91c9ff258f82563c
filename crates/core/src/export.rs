//! Fixed-width legacy text encoding for the downstream ERP import job.
//!
//! Pure `order -> text` rendering with no I/O, so the exact byte layout is
//! unit-testable. The format is a three-line group:
//!
//! ```text
//! I00{order_date:DDMMYY}[{delivery_date:DDMMYY}]
//! H{customer_number:8}{order_type:1}{campaign_name_compact}
//! D{product_code}{quantity:10, zero-padded}    (one per order line)
//! ```
//!
//! Lines are CRLF-terminated; the delivery-date suffix appears only for
//! deferred-delivery orders.

use chrono::{NaiveDate, NaiveDateTime};

use crate::campaign::{Country, OrderType};

/// One D-line of the export document.
#[derive(Debug, Clone)]
pub struct ErpLine<'a> {
    pub product_code: &'a str,
    pub quantity: i64,
}

/// Everything the encoder needs to render one order.
#[derive(Debug, Clone)]
pub struct ErpOrder<'a> {
    /// Civil date stamped into the I-line (the day of encoding).
    pub order_date: NaiveDate,
    /// Present only for deferred-delivery campaigns.
    pub delivery_date: Option<NaiveDate>,
    /// Raw customer number; normalized by the encoder.
    pub customer_number: &'a str,
    pub order_type: OrderType,
    pub campaign_name: &'a str,
    pub lines: &'a [ErpLine<'a>],
}

/// Render the full export document.
pub fn encode(order: &ErpOrder<'_>) -> String {
    let mut out = String::new();

    out.push_str("I00");
    out.push_str(&ddmmyy(order.order_date));
    if let Some(delivery) = order.delivery_date {
        out.push_str(&ddmmyy(delivery));
    }
    out.push_str("\r\n");

    out.push('H');
    out.push_str(&normalize_customer_number(order.customer_number));
    out.push(order.order_type.as_char());
    out.push_str(&compact_campaign_name(order.campaign_name));
    out.push_str("\r\n");

    for line in order.lines {
        out.push('D');
        out.push_str(line.product_code);
        out.push_str(&format!("{:010}", line.quantity));
        out.push_str("\r\n");
    }

    out
}

/// Normalize a raw customer number to exactly 8 digits.
///
/// The steps are fixed by the ERP import contract and must not be reordered:
///
/// 1. Remove the literal substrings `*`, `-`, `E`, `CB`.
/// 2. Drop every remaining non-digit character.
/// 3. A 6-digit result gets `"00"` appended.
/// 4. A result longer than 8 is truncated to its first 8 digits.
/// 5. Anything shorter is left-padded with `'0'` to 8.
///
/// Idempotent on already-normalized 8-digit input.
pub fn normalize_customer_number(raw: &str) -> String {
    let stripped = raw
        .replace('*', "")
        .replace('-', "")
        .replace('E', "")
        .replace("CB", "");
    let mut digits: String = stripped.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 6 {
        digits.push_str("00");
    }
    if digits.len() > 8 {
        digits.truncate(8);
        digits
    } else {
        format!("{digits:0>8}")
    }
}

/// Campaign name as it appears in the H-line: spaces, hyphens, and
/// underscores stripped; every other character kept as-is.
pub fn compact_campaign_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, ' ' | '-' | '_')).collect()
}

/// `commande_BE` / `commande_LU` -- the per-country export drop directory.
pub fn export_subdir(country: Country) -> String {
    format!("commande_{}", country.as_str())
}

/// `WebAction_{timestamp}_{customer8}.txt` -- the artifact file name the ERP
/// import job picks up.
pub fn export_file_name(generated_at: NaiveDateTime, customer8: &str) -> String {
    format!(
        "WebAction_{}_{}.txt",
        generated_at.format("%Y%m%d%H%M%S"),
        customer8
    )
}

fn ddmmyy(date: NaiveDate) -> String {
    date.format("%d%m%y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // -- customer number normalization --

    #[test]
    fn six_digits_get_double_zero_suffix() {
        assert_eq!(normalize_customer_number("802412"), "80241200");
    }

    #[test]
    fn hyphenated_suffix_folds_into_eight_digits() {
        assert_eq!(normalize_customer_number("802412-12"), "80241212");
    }

    #[test]
    fn star_prefix_stripped_then_left_padded() {
        assert_eq!(normalize_customer_number("*12345"), "00012345");
    }

    #[test]
    fn over_eight_digits_truncated() {
        assert_eq!(normalize_customer_number("123456789"), "12345678");
    }

    #[test]
    fn marker_substrings_removed() {
        assert_eq!(normalize_customer_number("E8024120"), "08024120");
        assert_eq!(normalize_customer_number("CB8024120"), "08024120");
    }

    #[test]
    fn normalization_is_idempotent_on_eight_digits() {
        let once = normalize_customer_number("802412-12");
        assert_eq!(normalize_customer_number(&once), once);
        assert_eq!(normalize_customer_number("80241200"), "80241200");
    }

    #[test]
    fn non_digits_discarded_before_padding() {
        assert_eq!(normalize_customer_number("A12B34"), "00001234");
    }

    // -- campaign name compaction --

    #[test]
    fn compact_name_strips_separators_only() {
        assert_eq!(compact_campaign_name("Black Friday 2025"), "BlackFriday2025");
        assert_eq!(compact_campaign_name("spring_sale-BE"), "springsaleBE");
        assert_eq!(compact_campaign_name("Été.2025"), "Été.2025");
    }

    // -- document encoding --

    #[test]
    fn encodes_full_document() {
        let lines = [
            ErpLine {
                product_code: "P4711",
                quantity: 3,
            },
            ErpLine {
                product_code: "P0002",
                quantity: 120,
            },
        ];
        let order = ErpOrder {
            order_date: d(2025, 11, 28),
            delivery_date: None,
            customer_number: "802412",
            order_type: OrderType::W,
            campaign_name: "Black Friday 2025",
            lines: &lines,
        };

        let text = encode(&order);
        assert_eq!(
            text,
            "I00281125\r\n\
             H80241200WBlackFriday2025\r\n\
             DP47110000000003\r\n\
             DP00020000000120\r\n"
        );
    }

    #[test]
    fn header_carries_delivery_date_only_when_deferred() {
        let order = ErpOrder {
            order_date: d(2025, 12, 1),
            delivery_date: Some(d(2026, 1, 15)),
            customer_number: "80241200",
            order_type: OrderType::V,
            campaign_name: "Nouvel An",
            lines: &[],
        };
        let text = encode(&order);
        assert!(text.starts_with("I00011225150126\r\n"));
        assert!(text.contains("H80241200VNouvelAn\r\n"));
    }

    #[test]
    fn quantity_zero_padded_to_ten_digits() {
        let lines = [ErpLine {
            product_code: "X",
            quantity: 1,
        }];
        let order = ErpOrder {
            order_date: d(2025, 6, 5),
            delivery_date: None,
            customer_number: "1",
            order_type: OrderType::V,
            campaign_name: "c",
            lines: &lines,
        };
        assert!(encode(&order).contains("DX0000000001\r\n"));
    }

    // -- artifact naming --

    #[test]
    fn export_paths_follow_erp_contract() {
        assert_eq!(export_subdir(Country::Be), "commande_BE");
        assert_eq!(export_subdir(Country::Lu), "commande_LU");

        let at = d(2025, 11, 28).and_hms_opt(14, 30, 5).unwrap();
        assert_eq!(
            export_file_name(at, "80241200"),
            "WebAction_20251128143005_80241200.txt"
        );
    }
}

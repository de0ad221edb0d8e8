use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use log::warn;
use rust_decimal::Decimal;

use crate::math::{safe_add, safe_multiply};

use super::{RawRecord, RecordKind, TransactionRecord};

/// Converts raw records into canonical ones, preserving input order.
///
/// All defensive field coercion lives here so the allocation engine can
/// assume well-typed, fully populated records: missing numerics default
/// to 0, the type tag is lower-cased and resolved to a [`RecordKind`],
/// `totalCost` is derived with exact arithmetic, and the execution date is
/// normalized to a canonical ISO instant (`""` on bad input, never an
/// error).
pub fn normalize_records(raw_records: &[RawRecord]) -> Vec<TransactionRecord> {
    raw_records.iter().map(normalize_record).collect()
}

fn normalize_record(raw: &RawRecord) -> TransactionRecord {
    let num_shares = raw.num_shares.unwrap_or(Decimal::ZERO);
    let price_per_share = raw.price_per_share.unwrap_or(Decimal::ZERO);
    let commission = raw.commission.unwrap_or(Decimal::ZERO);
    let total_cost = safe_add(safe_multiply(num_shares, price_per_share), commission);

    let record_type = raw
        .record_type
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let transfer_to = raw.transfer_to.clone().filter(|t| !t.is_empty());
    let transfer_from = raw.transfer_from.clone().filter(|t| !t.is_empty());
    let kind = resolve_kind(&record_type, transfer_to.as_deref());

    TransactionRecord {
        date: normalize_date(raw.execution_date.as_deref()),
        record_type,
        num_shares,
        price_per_share,
        commission,
        total_cost,
        transfer_to,
        transfer_from,
        kind,
    }
}

fn resolve_kind(record_type: &str, transfer_to: Option<&str>) -> Option<RecordKind> {
    match record_type {
        "buy" => Some(RecordKind::Buy),
        "sell" => Some(RecordKind::Sell),
        "transfer" => match transfer_to {
            Some(to) => Some(RecordKind::TransferOut { to: to.to_string() }),
            None => Some(RecordKind::TransferIn),
        },
        _ => None,
    }
}

/// Normalizes an execution date to a canonical RFC3339 UTC instant with
/// millisecond precision. Absent or unparseable dates become `""` rather
/// than failing the batch.
fn normalize_date(execution_date: Option<&str>) -> String {
    let raw = match execution_date {
        Some(d) if !d.trim().is_empty() => d.trim(),
        _ => return String::new(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return naive
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return naive
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true);
        }
    }

    warn!("Unparseable execution date '{}', normalizing to empty", raw);
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(
        date: Option<&str>,
        record_type: Option<&str>,
        num_shares: Option<Decimal>,
        price: Option<Decimal>,
        commission: Option<Decimal>,
    ) -> RawRecord {
        RawRecord {
            execution_date: date.map(str::to_string),
            record_type: record_type.map(str::to_string),
            num_shares,
            price_per_share: price,
            commission,
            transfer_to: None,
            transfer_from: None,
        }
    }

    #[test]
    fn derives_total_cost_exactly() {
        let records = normalize_records(&[raw(
            Some("2023-01-01"),
            Some("BUY"),
            Some(dec!(10)),
            Some(dec!(100)),
            Some(dec!(5)),
        )]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_type, "buy");
        assert_eq!(records[0].kind, Some(RecordKind::Buy));
        assert_eq!(records[0].total_cost, dec!(1005));
        assert_eq!(records[0].date, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let records = normalize_records(&[raw(None, Some("sell"), None, None, None)]);
        assert_eq!(records[0].num_shares, Decimal::ZERO);
        assert_eq!(records[0].price_per_share, Decimal::ZERO);
        assert_eq!(records[0].commission, Decimal::ZERO);
        assert_eq!(records[0].total_cost, Decimal::ZERO);
        assert_eq!(records[0].date, "");
    }

    #[test]
    fn bad_dates_normalize_to_empty_string() {
        let records = normalize_records(&[raw(
            Some("not-a-date"),
            Some("buy"),
            Some(dec!(1)),
            Some(dec!(1)),
            None,
        )]);
        assert_eq!(records[0].date, "");
    }

    #[test]
    fn already_canonical_instants_pass_through() {
        let records = normalize_records(&[raw(
            Some("2023-06-15T09:30:00.000Z"),
            Some("buy"),
            None,
            None,
            None,
        )]);
        assert_eq!(records[0].date, "2023-06-15T09:30:00.000Z");
    }

    #[test]
    fn transfer_resolution_depends_on_target() {
        let mut out = raw(None, Some("Transfer"), Some(dec!(5)), None, Some(dec!(1)));
        out.transfer_to = Some("TARGET".to_string());
        let mut incoming = raw(None, Some("transfer"), Some(dec!(5)), None, None);
        incoming.transfer_from = Some("SOURCE".to_string());

        let records = normalize_records(&[out, incoming]);
        assert_eq!(
            records[0].kind,
            Some(RecordKind::TransferOut {
                to: "TARGET".to_string()
            })
        );
        assert_eq!(records[1].kind, Some(RecordKind::TransferIn));
    }

    #[test]
    fn unknown_types_are_kept_but_unresolved() {
        let records = normalize_records(&[raw(None, Some("dividend"), None, None, None)]);
        assert_eq!(records[0].record_type, "dividend");
        assert_eq!(records[0].kind, None);
    }
}

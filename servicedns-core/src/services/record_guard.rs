//! DNS correctness checks run before any remote call.

use servicedns_provider::{RecordType, canonicalize};

use crate::error::{CoreError, CoreResult};
use crate::types::Record;

/// Records whose host names the same owner as `host` (`""`, `"@"`, relative
/// and fully qualified spellings compare equal).
pub fn records_at_host<'a>(zone: &str, host: &str, records: &'a [Record]) -> Vec<&'a Record> {
    let name = canonicalize(host, zone);
    records
        .iter()
        .filter(|r| canonicalize(&r.host, zone) == name)
        .collect()
}

/// CNAME exclusivity: a CNAME cannot join other types at a host, nor the reverse.
pub fn check_conflict(
    zone: &str,
    host: &str,
    record_type: RecordType,
    existing_at_host: &[&Record],
) -> CoreResult<()> {
    let clash = existing_at_host.iter().find(|r| {
        if record_type == RecordType::Cname {
            r.record_type != RecordType::Cname
        } else {
            r.record_type == RecordType::Cname
        }
    });

    match clash {
        Some(existing) => Err(CoreError::CnameConflict {
            host: canonicalize(host, zone),
            record_type: record_type.to_string(),
            existing: existing.record_type.to_string(),
        }),
        None => Ok(()),
    }
}

/// Exact (host, type, value) repeat.
pub fn check_duplicate(
    zone: &str,
    host: &str,
    record_type: RecordType,
    value: &str,
    existing_at_host: &[&Record],
) -> CoreResult<()> {
    if existing_at_host
        .iter()
        .any(|r| r.record_type == record_type && r.value == value)
    {
        return Err(CoreError::DuplicateRecord {
            host: canonicalize(host, zone),
            record_type: record_type.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

//! Record-set reconciliation helpers shared by every provider.
//!
//! - [`canonicalize`]: `(subname, zone)` to a trailing-dot FQDN
//! - [`merge_values`]: add one value to an existing record-set without dropping siblings
//! - [`normalize_nameservers`]: drop empty `ns1..ns5` slots and append the trailing dot

/// Build the canonical (trailing-dot, fully qualified) name of a record.
///
/// Precedence is fixed:
/// 1. `""` or `"@"` is the apex: `zone.`
/// 2. a subname that already contains the zone is treated as qualified
/// 3. anything else is joined with the zone
pub fn canonicalize(subname: &str, zone: &str) -> String {
    if subname.is_empty() || subname == "@" {
        return format!("{zone}.");
    }
    if subname.contains(zone) {
        return format!("{}.", subname.trim_end_matches('.'));
    }
    format!("{subname}.{zone}.")
}

/// Relative name of a canonical record name inside `zone`.
///
/// `"www.example.com."` in `example.com` is `"www"`; the apex is `""`.
pub fn relative_name(name: &str, zone: &str) -> String {
    let name = name.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');
    if name == zone {
        String::new()
    } else if let Some(sub) = name.strip_suffix(&format!(".{zone}")) {
        sub.to_string()
    } else {
        name.to_string()
    }
}

/// Subname of a host as a relative-name API expects it.
///
/// `""` and `"@"` collapse to `apex`; qualified hosts are made relative to `zone`.
pub fn subname_for_api(host: &str, zone: &str, apex: &str) -> String {
    let relative = relative_name(&canonicalize(host, zone), zone);
    if relative.is_empty() {
        apex.to_string()
    } else {
        relative
    }
}

/// Append `new_value` to `existing` unless it is already present.
///
/// First-seen order is kept and duplicates already in `existing` are collapsed,
/// so `merge_values(&merge_values(e, v), v) == merge_values(e, v)`.
pub fn merge_values(existing: &[String], new_value: &str) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + 1);
    for value in existing.iter().map(String::as_str).chain([new_value]) {
        if !merged.iter().any(|v| v == value) {
            merged.push(value.to_string());
        }
    }
    merged
}

/// Filter empty nameserver slots and normalise each entry to `name.`.
pub fn normalize_nameservers(nameservers: &[String]) -> Vec<String> {
    nameservers
        .iter()
        .map(|ns| ns.trim())
        .filter(|ns| !ns.is_empty())
        .map(|ns| format!("{}.", ns.trim_end_matches('.')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    // ---- canonicalize ----

    #[test]
    fn apex_forms_are_equal() {
        assert_eq!(canonicalize("", "example.com"), "example.com.");
        assert_eq!(canonicalize("@", "example.com"), "example.com.");
    }

    #[test]
    fn relative_subname_is_joined() {
        assert_eq!(canonicalize("www", "example.com"), "www.example.com.");
        assert_eq!(canonicalize("a.b", "example.com"), "a.b.example.com.");
    }

    #[test]
    fn qualified_subname_keeps_one_trailing_dot() {
        assert_eq!(
            canonicalize("www.example.com", "example.com"),
            "www.example.com."
        );
        assert_eq!(
            canonicalize("www.example.com..", "example.com"),
            "www.example.com."
        );
    }

    #[test]
    fn substring_rule_wins_over_join() {
        // "example.com" appears inside the subname, so it is taken as-is.
        assert_eq!(
            canonicalize("myexample.com", "example.com"),
            "myexample.com."
        );
    }

    // ---- relative names ----

    #[test]
    fn relative_name_strips_zone() {
        assert_eq!(relative_name("www.example.com.", "example.com"), "www");
        assert_eq!(relative_name("example.com.", "example.com"), "");
        assert_eq!(relative_name("other.org.", "example.com"), "other.org");
    }

    #[test]
    fn subname_for_api_uses_apex_marker() {
        assert_eq!(subname_for_api("", "example.com", "@"), "@");
        assert_eq!(subname_for_api("@", "example.com", ""), "");
        assert_eq!(subname_for_api("www.example.com", "example.com", "@"), "www");
        assert_eq!(subname_for_api("mail", "example.com", "@"), "mail");
    }

    // ---- merge ----

    #[test]
    fn merge_skips_present_value() {
        assert_eq!(
            merge_values(&values(&["1.2.3.4"]), "1.2.3.4"),
            values(&["1.2.3.4"])
        );
    }

    #[test]
    fn merge_appends_novel_value() {
        assert_eq!(
            merge_values(&values(&["1.2.3.4"]), "5.6.7.8"),
            values(&["1.2.3.4", "5.6.7.8"])
        );
    }

    #[test]
    fn merge_into_empty() {
        assert_eq!(merge_values(&[], "v=spf1 -all"), values(&["v=spf1 -all"]));
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = values(&["a", "b", "a"]);
        let once = merge_values(&existing, "c");
        assert_eq!(merge_values(&once, "c"), once);
        assert_eq!(once, values(&["a", "b", "c"]));
    }

    // ---- nameservers ----

    #[test]
    fn nameservers_normalized() {
        let ns = values(&["ns1.example.net.", "ns2.example.net", "", "  "]);
        assert_eq!(
            normalize_nameservers(&ns),
            values(&["ns1.example.net.", "ns2.example.net."])
        );
    }
}

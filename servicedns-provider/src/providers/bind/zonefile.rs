//! Minimal RFC 1035 master file model for zones written by this crate.
//!
//! Supports `$ORIGIN`, `$TTL`, one-line records (`name ttl IN type value`)
//! and `;` comments. Every owner name is kept in canonical (trailing-dot) form.
//! TXT and SPF values are held unquoted and written as quoted character-strings.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Default `$TTL` of a new zone.
pub(crate) const DEFAULT_ZONE_TTL: u32 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ZoneFileError {
    #[error("line {line}: {detail}")]
    Syntax { line: usize, detail: String },
    #[error("zone file has no SOA record")]
    MissingSoa,
}

/// Start of authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Soa {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl Soa {
    fn render(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }

    fn parse(value: &str, line: usize) -> Result<Self, ZoneFileError> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        let [mname, rname, serial, refresh, retry, expire, minimum] = parts.as_slice() else {
            return Err(ZoneFileError::Syntax {
                line,
                detail: format!("SOA needs 7 fields, got {}", parts.len()),
            });
        };
        let num = |s: &str| {
            s.parse::<u32>().map_err(|_| ZoneFileError::Syntax {
                line,
                detail: format!("invalid SOA number '{s}'"),
            })
        };
        Ok(Self {
            mname: (*mname).to_string(),
            rname: (*rname).to_string(),
            serial: num(serial)?,
            refresh: num(refresh)?,
            retry: num(retry)?,
            expire: num(expire)?,
            minimum: num(minimum)?,
        })
    }
}

/// All records of one (name, type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ZoneRrset {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ZoneFile {
    pub origin: String,
    pub default_ttl: u32,
    pub soa: Soa,
    pub rrsets: Vec<ZoneRrset>,
}

impl ZoneFile {
    /// Fresh zone with an SOA and the apex NS set.
    pub fn new(origin: &str, nameservers: &[String], today: NaiveDate) -> Self {
        let mname = nameservers
            .first()
            .cloned()
            .unwrap_or_else(|| format!("ns1.{origin}"));
        let mut rrsets = Vec::new();
        if !nameservers.is_empty() {
            rrsets.push(ZoneRrset {
                name: origin.to_string(),
                record_type: "NS".to_string(),
                ttl: DEFAULT_ZONE_TTL,
                values: nameservers.to_vec(),
            });
        }
        Self {
            origin: origin.to_string(),
            default_ttl: DEFAULT_ZONE_TTL,
            soa: Soa {
                mname,
                rname: format!("hostmaster.{origin}"),
                serial: next_serial(0, today),
                refresh: 10800,
                retry: 3600,
                expire: 604_800,
                minimum: DEFAULT_ZONE_TTL,
            },
            rrsets,
        }
    }

    pub fn find(&self, name: &str, record_type: &str) -> Option<&ZoneRrset> {
        self.rrsets
            .iter()
            .find(|r| r.name == name && r.record_type == record_type)
    }

    /// Replace (or add) the rrset at (name, type), keeping its position.
    pub fn replace(&mut self, name: &str, record_type: &str, ttl: u32, values: Vec<String>) {
        let rrset = ZoneRrset {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl,
            values,
        };
        match self
            .rrsets
            .iter_mut()
            .find(|r| r.name == name && r.record_type == record_type)
        {
            Some(existing) => *existing = rrset,
            None => self.rrsets.push(rrset),
        }
    }

    /// Remove the rrset at (name, type); returns whether it existed.
    pub fn remove(&mut self, name: &str, record_type: &str) -> bool {
        let before = self.rrsets.len();
        self.rrsets
            .retain(|r| !(r.name == name && r.record_type == record_type));
        self.rrsets.len() != before
    }

    pub fn bump_serial(&mut self, today: NaiveDate) {
        self.soa.serial = next_serial(self.soa.serial, today);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "$ORIGIN {}", self.origin);
        let _ = writeln!(out, "$TTL {}", self.default_ttl);
        let _ = writeln!(
            out,
            "{} {} IN SOA {}",
            self.origin,
            self.default_ttl,
            self.soa.render()
        );
        for rrset in &self.rrsets {
            for value in &rrset.values {
                let value = if is_text_type(&rrset.record_type) {
                    quote(value)
                } else {
                    Cow::Borrowed(value.as_str())
                };
                let _ = writeln!(
                    out,
                    "{} {} IN {} {}",
                    rrset.name, rrset.ttl, rrset.record_type, value
                );
            }
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self, ZoneFileError> {
        let mut origin = String::new();
        let mut default_ttl = DEFAULT_ZONE_TTL;
        let mut soa = None;
        let mut rrsets: Vec<ZoneRrset> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("$ORIGIN") {
                origin = absolute(rest.trim(), "");
                continue;
            }
            if let Some(rest) = line.strip_prefix("$TTL") {
                default_ttl = rest.trim().parse().map_err(|_| ZoneFileError::Syntax {
                    line: line_no,
                    detail: format!("invalid $TTL '{}'", rest.trim()),
                })?;
                continue;
            }

            let (name, ttl, record_type, value) = split_record(line, line_no, default_ttl)?;
            let name = absolute(name, &origin);

            if record_type == "SOA" {
                soa = Some(Soa::parse(value, line_no)?);
                continue;
            }

            let value = if is_text_type(record_type) {
                unquote(value).unwrap_or_else(|| value.to_string())
            } else {
                value.to_string()
            };

            match rrsets
                .iter_mut()
                .find(|r| r.name == name && r.record_type == record_type)
            {
                Some(rrset) => rrset.values.push(value),
                None => rrsets.push(ZoneRrset {
                    name,
                    record_type: record_type.to_string(),
                    ttl,
                    values: vec![value],
                }),
            }
        }

        Ok(Self {
            origin,
            default_ttl,
            soa: soa.ok_or(ZoneFileError::MissingSoa)?,
            rrsets,
        })
    }
}

/// Next `YYYYMMDDnn` serial: today's first serial, or one past the current one.
///
/// Increments wrap in serial number arithmetic (RFC 1982), skipping 0.
pub(crate) fn next_serial(current: u32, today: NaiveDate) -> u32 {
    let base = today.year().unsigned_abs() * 1_000_000 + today.month() * 10_000 + today.day() * 100;
    if current < base {
        return base;
    }
    match current.wrapping_add(1) {
        0 => 1,
        next => next,
    }
}

fn is_text_type(record_type: &str) -> bool {
    matches!(record_type, "TXT" | "SPF")
}

/// Presentation form of a TXT value. Values that already start and end
/// with `"` are taken as character-strings and written verbatim.
fn quote(value: &str) -> Cow<'_, str> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Content of `text` when it is exactly one quoted character-string.
fn unquote(text: &str) -> Option<String> {
    let mut chars = text.strip_prefix('"')?.chars();
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return chars.as_str().trim().is_empty().then_some(out),
            _ => out.push(c),
        }
    }
    None
}

/// Drop a `;` comment that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Qualify a relative owner name against the origin.
fn absolute(name: &str, origin: &str) -> String {
    if name == "@" {
        origin.to_string()
    } else if name.ends_with('.') {
        name.to_string()
    } else if origin.is_empty() {
        format!("{name}.")
    } else {
        format!("{name}.{origin}")
    }
}

/// Split `name [ttl] [IN] type value...`.
fn split_record(
    line: &str,
    line_no: usize,
    default_ttl: u32,
) -> Result<(&str, u32, &str, &str), ZoneFileError> {
    let syntax = |detail: &str| ZoneFileError::Syntax {
        line: line_no,
        detail: detail.to_string(),
    };

    let (name, mut rest) = next_token(line).ok_or_else(|| syntax("missing owner name"))?;

    let mut ttl = default_ttl;
    let (token, after) = next_token(rest).ok_or_else(|| syntax("missing record type"))?;
    if let Ok(parsed) = token.parse::<u32>() {
        ttl = parsed;
        rest = after;
    }

    let (token, after) = next_token(rest).ok_or_else(|| syntax("missing record type"))?;
    if token.eq_ignore_ascii_case("IN") {
        rest = after;
    }

    let (record_type, value) = next_token(rest).ok_or_else(|| syntax("missing record type"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(syntax("missing record value"));
    }
    Ok((name, ttl, record_type, value))
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

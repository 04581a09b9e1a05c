//! Cell value coercion.
//!
//! Pure conversions between typed cell values and their text forms. Two text
//! forms exist: the *display* string shown in a read-only cell (locale
//! formatting, option labels) and the *edit* string exchanged with editors and
//! the clipboard (raw values). Parsing never fails: bad input resolves to a
//! safe default so a bulk paste is never blocked by one bad cell.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use editgrid_core::{CellType, CellValue, ColumnDef};

/// Text shown for `value` in a read-only cell of `column`.
pub fn to_display_string(value: &CellValue, column: &ColumnDef) -> String {
    match (column.cell_type, value) {
        (_, CellValue::Empty) => String::new(),
        (CellType::Number, CellValue::Number(n)) => format_number(*n),
        (CellType::Date, CellValue::Date(d)) => format_date(*d),
        // Unparseable dates show their raw text instead of failing
        (CellType::Date, CellValue::Text(s)) => parse_date(s).map(format_date).unwrap_or_else(|| s.clone()),
        (CellType::Checkbox, v) => bool_text(v.truthy()).to_string(),
        (CellType::Select, CellValue::Choice(s) | CellValue::Text(s)) => {
            column.option_label(s).unwrap_or(s.as_str()).to_string()
        }
        (_, v) => to_edit_string(v),
    }
}

/// Raw text form of a value, as handed to an editor or written to the clipboard.
pub fn to_edit_string(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(s) | CellValue::Choice(s) => s.clone(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Bool(b) => bool_text(*b).to_string(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

/// Parse editor or clipboard text into a value of the given cell type.
pub fn from_edit_string(text: &str, cell_type: CellType) -> CellValue {
    match cell_type {
        CellType::Number => CellValue::Number(parse_number(text)),
        CellType::Checkbox => CellValue::Bool(text.trim().eq_ignore_ascii_case("true")),
        CellType::Date => {
            if text.trim().is_empty() {
                CellValue::Empty
            } else {
                parse_date(text).map(CellValue::Date).unwrap_or_else(|| CellValue::text(text))
            }
        }
        CellType::Select => {
            if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::choice(text)
            }
        }
        CellType::Text | CellType::File | CellType::Readonly => {
            if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::text(text)
            }
        }
    }
}

/// Like [`from_edit_string`], but a select column also accepts an option's
/// label and stores the matching option value.
pub fn coerce_for_column(text: &str, column: &ColumnDef) -> CellValue {
    if column.cell_type == CellType::Select && !column.options.iter().any(|o| o.value == text) {
        // Option values take precedence over labels
        if let Some(opt) = column.options.iter().find(|o| o.label == text) {
            return CellValue::choice(opt.value.clone());
        }
    }
    from_edit_string(text, column.cell_type)
}

/// Parse a number the way `parseFloat` does: the longest numeric prefix wins
/// and anything unparseable is 0. Thousands separators are ignored.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    numeric_prefix(&cleaned).parse().unwrap_or(0.0)
}

fn numeric_prefix(s: &str) -> &str {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return "";
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    &s[..i]
}

/// Locale-style number: thousands separators, at most three fraction digits.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if n < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse an ISO date, an RFC 3339 timestamp, or a US `m/d/yyyy` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

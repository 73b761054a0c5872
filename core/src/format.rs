//! Number formatting for chart labels.

const UNITS: [&str; 5] = ["", "K", "M", "B", "T"];

/// Abbreviate a magnitude with one decimal: 1500 -> "1.5K", 2.3e6 -> "2.3M".
///
/// Divides by 1000 while |x| >= 1000, walking K, M, B, T and finally P.
pub fn human_format(value: f64) -> String {
    let mut num = value;
    for unit in UNITS {
        if num.abs() < 1000.0 {
            return format!("{num:.1}{unit}");
        }
        num /= 1000.0;
    }
    format!("{num:.1}P")
}

/// Integer part with comma thousands separators: 1234567.8 -> "1,234,567".
pub fn thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    out
}

/// Share of `total` as a percentage with one decimal. A zero total gives "0.0%".
pub fn percent(value: f64, total: f64) -> String {
    let pct = if total == 0.0 { 0.0 } else { value / total * 100.0 };
    format!("{pct:.1}%")
}

//! Unit Conversion Utilities
//!
//! Satoshi amounts are integers everywhere in this crate; BTC only appears
//! as a display string, so conversions here avoid floating point.

/// Satoshis per Bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Convert satoshis to BTC string (e.g., "0.00100000")
pub fn sats_to_btc_string(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// Convert satoshis to human-readable string
/// e.g., 100000 -> "100,000 sats (0.00100000 BTC)"
pub fn sats_to_display(sats: u64) -> String {
    format!("{} sats ({} BTC)", group_thousands(sats), sats_to_btc_string(sats))
}

/// Parse a decimal BTC amount ("0.5", "1.00000001") into satoshis
///
/// Returns `None` for more than 8 fractional digits or overflow.
pub fn btc_to_sats(btc: &str) -> Option<u64> {
    let btc = btc.trim();
    let (whole, frac) = match btc.split_once('.') {
        Some((w, f)) => (w, f),
        None => (btc, ""),
    };

    if frac.len() > 8 || (whole.is_empty() && frac.is_empty()) {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{:0<8}", frac).parse().ok()?
    };

    whole.checked_mul(SATS_PER_BTC)?.checked_add(frac)
}

/// Parse satoshi amount from string
pub fn parse_sats(s: &str) -> Option<u64> {
    s.trim().replace([',', '_'], "").parse().ok()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

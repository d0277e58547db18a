//! Display formatting for dashboard stats. Pure functions, no I/O.

/// Formats a wei-denominated gas price into a human-scaled Gwei string.
///
/// Three bands: below 0.01 Gwei the value is shown in milli-Gwei (`MGwei`),
/// above 1000 Gwei in kilo-Gwei (`KGwei`), otherwise plain Gwei. Always two
/// decimal places; a zero price short-circuits to `"0 Gwei"`.
pub fn format_gas_price(wei: u128) -> String {
    if wei == 0 {
        return "0 Gwei".to_string();
    }

    let gwei = wei as f64 / 1e9;

    if gwei < 0.01 {
        format!("{:.2} MGwei", gwei * 1000.0)
    } else if gwei >= 1000.0 {
        format!("{:.2} KGwei", gwei / 1000.0)
    } else {
        format!("{:.2} Gwei", gwei)
    }
}

/// Formats a count with K/M/B suffixes, one decimal place per tier.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

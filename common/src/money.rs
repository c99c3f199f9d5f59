//! Display formatting for rupee amounts coming from the store.
//!
//! Amounts live in the backend as nullable numerics; this layer only
//! formats them and never does arithmetic on them.

/// Format a non-negative rupee amount for display, e.g. "₹1,250".
///
/// Whole rupees render without decimals; fractional amounts keep two.
pub fn format_inr(amount: f64) -> String {
    let total_paise = (amount.max(0.0) * 100.0).round() as u64;
    let whole = total_paise / 100;
    let paise = total_paise % 100;
    if paise == 0 {
        format!("₹{}", group_digits(whole))
    } else {
        format!("₹{}.{paise:02}", group_digits(whole))
    }
}

// Indian digit grouping: last three digits, then pairs (12,34,567).
fn group_digits(n: u64) -> String {
    let s = n.to_string();
    if s.len() <= 3 {
        return s;
    }
    let (head, tail) = s.split_at(s.len() - 3);
    let mut groups = Vec::new();
    let bytes = head.as_bytes();
    let mut i = bytes.len();
    while i > 2 {
        groups.push(&head[i - 2..i]);
        i -= 2;
    }
    groups.push(&head[..i]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_have_no_decimals() {
        assert_eq!(format_inr(250.0), "₹250");
        assert_eq!(format_inr(0.0), "₹0");
    }

    #[test]
    fn fractional_amounts_keep_two_places() {
        assert_eq!(format_inr(99.5), "₹99.50");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(1250.0), "₹1,250");
        assert_eq!(format_inr(1234567.0), "₹12,34,567");
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert_eq!(format_inr(-10.0), "₹0");
    }
}

//! Display formatting shared by the views

/// Group the integer part of a number with commas: `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Format an amount of money: `1234.5` -> `$1,234.50`
pub fn money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Format a share as a percentage with one decimal
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(9.99), "$9.99");
        assert_eq!(money(1234567.5), "$1,234,567.50");
        assert_eq!(money(-12.5), "-$12.50");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(75.0), "75.0%");
        assert_eq!(percent(33.333), "33.3%");
    }
}

/// Group the integer digits of a non-negative whole number: 1234567 -> "1,234,567".
fn group_thousands(digits: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Round to the nearest whole currency unit and add thousands separators: ₹10,662
pub fn money(val: f64, symbol: &str) -> String {
    if !val.is_finite() {
        return format!("{symbol}0");
    }
    let rounded = val.round();
    let digits = format!("{:.0}", rounded.abs());
    if rounded < 0.0 {
        format!("-{symbol}{}", group_thousands(&digits))
    } else {
        format!("{symbol}{}", group_thousands(&digits))
    }
}

/// Shortest plain rendering of a number: integral values drop the fraction,
/// so 120000.0 prints as "120000" and 8.5 as "8.5".
pub fn plain_number(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{:.0}", val)
    } else {
        format!("{val}")
    }
}

pub fn days_label(days: i64) -> String {
    match days {
        0 => "due today".to_string(),
        1 => "in 1 day".to_string(),
        d if d > 1 => format!("in {d} days"),
        -1 => "1 day overdue".to_string(),
        d => format!("{} days overdue", -d),
    }
}

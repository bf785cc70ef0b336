/// Round `x` away from zero to two decimal places.
///
/// Works on the shortest decimal representation of `x` (what `Display`
/// prints), not its binary expansion, so a weight parsed back as `1.23`
/// stays `1.23` while any nonzero digit past the hundredths place bumps
/// the value to the next hundredth: `1.233 -> 1.24`, `1.005 -> 1.01`.
pub fn round_up_2dp(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let repr = format!("{x}");
    let (sign, digits) = match repr.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, repr.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    let Ok(int) = int_part.parse::<i64>() else {
        return x;
    };
    let mut cents: i64 = 0;
    let mut remainder = false;
    for (i, b) in frac_part.bytes().enumerate() {
        let digit = i64::from(b - b'0');
        match i {
            0 => cents += digit * 10,
            1 => cents += digit,
            _ => {
                if digit != 0 {
                    remainder = true;
                    break;
                }
            }
        }
    }
    let mut hundredths = int * 100 + cents;
    if remainder {
        hundredths += 1;
    }
    sign * hundredths as f64 / 100.0
}

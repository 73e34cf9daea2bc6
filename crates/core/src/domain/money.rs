/// Renders integer minor units as Brazilian reais, e.g. `123456` → `R$ 1.234,56`.
///
/// The sign is dropped; callers phrase direction in the surrounding message.
pub fn format_brl(minor_units: i64) -> String {
    let magnitude = minor_units.unsigned_abs();
    let major = (magnitude / 100).to_string();
    let cents = magnitude % 100;

    let mut grouped = String::with_capacity(major.len() + major.len() / 3);
    for (index, digit) in major.chars().enumerate() {
        if index > 0 && (major.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("R$ {grouped},{cents:02}")
}

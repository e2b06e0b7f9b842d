pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Scale a percentage in `[0, 100]` of `total` pixels, flooring to whole pixels.
pub(crate) fn percent_of_floor(total: u32, percent: f32) -> u32 {
    let v = (f64::from(total) * f64::from(percent) / 100.0).floor();
    v.clamp(0.0, f64::from(total)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

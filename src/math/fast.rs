use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Quake-style inverse square root (one Newton–Raphson refinement).
#[inline]
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let i = 0x5f37_59df - (x.to_bits() >> 1);
    let y = f32::from_bits(i);
    y * (1.5 - x * 0.5 * y * y)
}

#[inline]
pub fn fast_sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    x * fast_inv_sqrt(x)
}

/// Bhaskara I sine approximation, max error ≈ 0.0016.
pub fn fast_sin(x: f32) -> f32 {
    let mut x = x.rem_euclid(TAU);
    let sign = if x < PI {
        1.0
    } else {
        x -= PI;
        -1.0
    };
    let x2 = x * (PI - x);
    sign * 16.0 * x2 / (5.0 * PI * PI - 4.0 * x2)
}

#[inline]
pub fn fast_cos(x: f32) -> f32 {
    fast_sin(x + FRAC_PI_2)
}

/// First-order atan2, max error ≈ 0.07 rad.
pub fn fast_atan2(y: f32, x: f32) -> f32 {
    let abs_y = y.abs() + 1e-10;
    let angle = if x >= 0.0 {
        let r = (x - abs_y) / (x + abs_y);
        FRAC_PI_4 - FRAC_PI_4 * r
    } else {
        let r = (x + abs_y) / (abs_y - x);
        3.0 * FRAC_PI_4 - FRAC_PI_4 * r
    };
    if y < 0.0 { -angle } else { angle }
}

use std::f32::consts::{PI, TAU};

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(a: f32) -> f32 {
    if !a.is_finite() {
        return 0.0;
    }
    if a > -PI && a <= PI {
        return a;
    }
    let mut x = a.rem_euclid(TAU);
    if x > PI {
        x -= TAU;
    }
    x
}

/// Signed delta that rotates `current` onto `target` along the shorter arc.
pub fn shortest_arc(current: f32, target: f32) -> f32 {
    wrap_angle(target - current)
}

//! Adaptive cruise control.
//!
//! Inside the slowdown distance the target speed falls off linearly with the
//! forward clearance, bottoming out at a fixed fraction of the base speed.

/// Forward clearance below which the vehicle starts to slow down.
pub const SLOWDOWN_DISTANCE: f32 = 10.0;

/// Lowest fraction of base speed the controller will ask for.
pub const MIN_SPEED_FRACTION: f32 = 0.1;

/// Target speed for the given forward clearance.
pub fn regulate(forward_clearance: f32, base_speed: f32) -> f32 {
    // NaN compares false and falls through to cruising.
    if forward_clearance < SLOWDOWN_DISTANCE {
        base_speed * (forward_clearance / SLOWDOWN_DISTANCE).max(MIN_SPEED_FRACTION)
    } else {
        base_speed
    }
}

//! Tackle and dodge break-even formulas
//!
//! Companion helpers for planning archmonster hunts: given the opponent's
//! lock or dodge characteristic, compute the stat needed to escape a tackle
//! while keeping a target number of action/movement points.

/// Lock needed so the opponent escapes with exactly the given points
///
/// # Arguments
/// * `dodge` - The escaping opponent's dodge
/// * `init_p` - Points (action/movement) before the escape
/// * `final_p` - Points left after the escape
pub fn optimal_lock(dodge: i32, init_p: i32, final_p: i32) -> i32 {
    let mut lock =
        (init_p as f64 * (dodge as f64 + 2.0)) / ((final_p as f64 + 0.5) * 2.0) - 2.0;
    if lock.fract() == 0.0 && final_p % 2 != 0 {
        lock += 1.0;
    }
    lock.ceil() as i32
}

/// Dodge needed to escape an opponent while keeping the given points
///
/// # Arguments
/// * `lock` - The tackling opponent's lock
/// * `init_p` - Points (action/movement) before the escape
/// * `final_p` - Points to keep after the escape
pub fn optimal_dodge(lock: i32, init_p: i32, final_p: i32) -> i32 {
    let mut dodge =
        (final_p as f64 - 0.5) * (2.0 * (lock as f64 + 2.0)) / init_p as f64 - 2.0;
    if dodge.fract() == 0.0 && final_p % 2 != 0 {
        dodge += 1.0;
    }
    dodge.ceil() as i32
}

/// Points left after escaping a tackle
///
/// # Arguments
/// * `dodge` - The escaping character's dodge
/// * `lock` - The tackler's lock
/// * `init_p` - The escaping character's points before the escape
pub fn remaining_points(dodge: i32, lock: i32, init_p: i32) -> i32 {
    let final_p = ((dodge as f64 + 2.0) * init_p as f64) / (2.0 * (lock as f64 + 2.0));
    final_p.round() as i32
}

//! Wraparound-safe millisecond timestamps
//!
//! The frame clock is a free-running `u32` millisecond counter that wraps
//! after ~49.7 days. Every deadline and age comparison goes through the
//! helpers here, which use wrapping subtraction reinterpreted as `i32`.
//! Plain `<`/`>` on raw timestamps is wrong near the rollover.

/// A 32-bit millisecond timestamp from the free-running frame clock.
pub type Millis = u32;

/// Signed distance from `since` to `now`, correct across one wrap.
#[inline]
pub fn signed_delta(now: Millis, since: Millis) -> i32 {
    now.wrapping_sub(since) as i32
}

/// True while `now` is strictly before `deadline`.
#[inline]
pub fn is_before(now: Millis, deadline: Millis) -> bool {
    signed_delta(now, deadline) < 0
}

/// True once `now` has reached or passed `deadline`.
#[inline]
pub fn has_reached(now: Millis, deadline: Millis) -> bool {
    !is_before(now, deadline)
}

/// Elapsed milliseconds since `born` (unsigned wrapping age).
#[inline]
pub fn age(now: Millis, born: Millis) -> u32 {
    now.wrapping_sub(born)
}

/// Milliseconds left until `deadline`, zero once it has passed.
#[inline]
pub fn remaining(now: Millis, deadline: Millis) -> u32 {
    if is_before(now, deadline) {
        deadline.wrapping_sub(now)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_ordering_without_wrap() {
        assert!(is_before(100, 200));
        assert!(has_reached(200, 200));
        assert!(has_reached(300, 200));
        assert_eq!(remaining(150, 200), 50);
        assert_eq!(remaining(250, 200), 0);
    }

    #[test]
    fn test_deadline_across_rollover() {
        // Deadline set just before the wrap, now has wrapped past it
        let deadline = u32::MAX - 10;
        let now = 5u32;
        assert!(has_reached(now, deadline));
        assert!(!is_before(now, deadline));

        // Deadline after the wrap, now still before it
        let deadline = 20u32;
        let now = u32::MAX - 3;
        assert!(is_before(now, deadline));
        assert_eq!(remaining(now, deadline), 24);
    }

    #[test]
    fn test_age_wraps() {
        assert_eq!(age(3, u32::MAX - 1), 5);
        assert_eq!(age(1_000, 400), 600);
    }
}

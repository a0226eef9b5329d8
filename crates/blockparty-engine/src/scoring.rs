//! Line-clear scoring, leveling, and gravity speed.

use std::time::Duration;

/// Points for clearing one row in a single lock.
pub const POINTS_SINGLE: u32 = 100;
/// Points for clearing two rows in a single lock.
pub const POINTS_DOUBLE: u32 = 300;
/// Points for clearing three rows in a single lock.
pub const POINTS_TRIPLE: u32 = 500;
/// Points for clearing four rows in a single lock (a "tetris").
pub const POINTS_TETRIS: u32 = 800;

/// Cumulative cleared lines needed per level.
pub const LEVEL_LINES: u32 = 10;

/// Gravity interval at level 1.
pub const INITIAL_GRAVITY: Duration = Duration::from_millis(1000);

/// Points awarded for clearing `lines` rows in one lock.
pub fn points_for(lines: u32) -> u32 {
    match lines {
        1 => POINTS_SINGLE,
        2 => POINTS_DOUBLE,
        3 => POINTS_TRIPLE,
        4 => POINTS_TETRIS,
        _ => 0,
    }
}

/// Level reached after `total_lines` cumulative cleared lines.
pub fn level_for(total_lines: u32) -> u32 {
    total_lines / LEVEL_LINES + 1
}

/// How often gravity should issue a `MoveDown` at `level`.
pub fn gravity_interval(level: u32) -> Duration {
    INITIAL_GRAVITY / level.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 500);
        assert_eq!(points_for(4), 800);
        assert_eq!(points_for(5), 0);
    }

    #[test]
    fn test_points_reward_multi_row_clears_super_linearly() {
        for n in 2..=4 {
            assert!(points_for(n) > n * points_for(1));
        }
    }

    #[test]
    fn test_level_for_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(9), 1);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(25), 3);
    }

    #[test]
    fn test_gravity_interval_speeds_up() {
        assert_eq!(gravity_interval(1), Duration::from_millis(1000));
        assert_eq!(gravity_interval(4), Duration::from_millis(250));
        assert_eq!(gravity_interval(0), INITIAL_GRAVITY);
    }
}

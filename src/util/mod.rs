//! Global utility functions, publicly re-exported in `prelude.rs`.

pub mod general;
pub mod interp;

pub use general::*;
pub use interp::lerp;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_conversion() {
        let level = 0.5;
        let db = level_to_db(level);
        assert!(within_tolerance(db, -6.020_599_913_279_624, 1e-12));
        assert!(within_tolerance(db_to_level(db), level, 1e-12));
    }

    #[test]
    fn test_decibel_reference_points() {
        assert!(epsilon_eq(db_to_level(0.0), 1.0));
        assert!(within_tolerance(db_to_level(-20.0), 0.1, 1e-12));
        assert!(within_tolerance(db_to_level(6.0), 1.995_262_314_968_879_6, 1e-12));
    }

    #[test]
    fn test_bounded_frames() {
        assert_eq!(bounded_frames(64, &[128, 32, 64]), 32);
        assert_eq!(bounded_frames(16, &[128, 32]), 16);
        assert_eq!(bounded_frames(16, &[]), 16);
        assert_eq!(bounded_frames(16, &[0, 32]), 0);
    }
}

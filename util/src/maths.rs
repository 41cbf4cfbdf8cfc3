//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Length of the arc subtended by `angle_deg` at `radius`.
pub fn arc_length<T>(radius: T, angle_deg: T) -> T
where
    T: Float,
{
    radius * angle_deg.to_radians()
}

/// Length of the chord subtended by `angle_deg` at `radius`.
pub fn chord_length<T>(radius: T, angle_deg: T) -> T
where
    T: Float,
{
    let two = T::one() + T::one();
    two * radius * (angle_deg.to_radians() / two).sin()
}

/// Round an integer up to the next multiple of `step`.
///
/// Values that are already a multiple are returned unchanged. A `step` of zero or less returns
/// `value`.
pub fn round_up_to_step(value: i32, step: i32) -> i32 {
    if step <= 0 {
        return value;
    }

    let rem = value.rem_euclid(step);

    if rem == 0 {
        value
    } else {
        value + (step - rem)
    }
}

/// Signed difference `b - a` between two angles in degrees, wrapped into `(-180, 180]`.
pub fn ang_diff_deg<T>(a: T, b: T) -> T
where
    T: Float,
{
    let full = T::from(360.0).unwrap_or_else(T::zero);
    let half = T::from(180.0).unwrap_or_else(T::zero);

    let mut d = (b - a) % full;

    if d > half {
        d = d - full;
    }
    if d <= -half {
        d = d + full;
    }

    d
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_arc_and_chord() {
        // A quarter circle of radius 2
        let arc = arc_length(2f64, 90f64);
        assert!((arc - std::f64::consts::PI).abs() < 1e-9);

        // The chord at 60 degrees equals the radius
        let chord = chord_length(50f64, 60f64);
        assert!((chord - 50f64).abs() < 1e-9);

        // Chord is always shorter than the arc for the same angle
        assert!(chord_length(40f64, 20f64) < arc_length(40f64, 20f64));
    }

    #[test]
    fn test_round_up_to_step() {
        assert_eq!(round_up_to_step(91, 2), 92);
        assert_eq!(round_up_to_step(90, 2), 90);
        assert_eq!(round_up_to_step(-3, 2), -2);
        assert_eq!(round_up_to_step(7, 0), 7);
    }

    #[test]
    fn test_ang_diff_deg() {
        assert_eq!(ang_diff_deg(10f64, 20f64), 10f64);
        assert_eq!(ang_diff_deg(20f64, 10f64), -10f64);
        assert_eq!(ang_diff_deg(350f64, 10f64), 20f64);
        assert_eq!(ang_diff_deg(10f64, 350f64), -20f64);
        assert_eq!(ang_diff_deg(0f64, 180f64), 180f64);
    }
}

//! Sweep acquisition

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::ScanHead;
use log::{debug, trace};
use std::time::Duration;

// Internal
use super::{
    angle_of_index, ScanSample, Sweep, SweepError, SweepParams, NUM_SWEEP_SAMPLES,
    SWEEP_MIN_ANGLE_DEG,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives the scan head through a full sweep.
#[derive(Debug, Clone, Default)]
pub struct Sweeper {
    params: SweepParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sweeper {
    pub fn new(params: SweepParams) -> Self {
        Self { params }
    }

    /// Perform one sweep.
    ///
    /// The head is first returned to the start angle and allowed to settle, then sampled at every
    /// step up to the end angle.
    pub fn sweep<H: ScanHead>(&self, head: &mut H) -> Result<Sweep, SweepError> {
        head.sweep_to(SWEEP_MIN_ANGLE_DEG)?;
        head.settle(Duration::from_millis(self.params.initial_settle_ms));

        let mut samples = [ScanSample::default(); NUM_SWEEP_SAMPLES];

        for (i, s) in samples.iter_mut().enumerate() {
            let angle_deg = angle_of_index(i);
            let reading = head.sweep_to(angle_deg)?;

            *s = ScanSample::from_reading(angle_deg, &reading);

            if self.params.log_samples {
                trace!(
                    "{:>3} deg: us {:>6.1} cm, ir {:>5} ({:>6.1} cm)",
                    s.angle_deg,
                    s.ultrasonic_distance_cm,
                    s.infrared_raw,
                    s.infrared_distance_cm
                );
            }
        }

        debug!("Sweep complete");

        Ok(Sweep::from_samples(samples))
    }
}

impl Sweep {
    pub(crate) fn from_samples(samples: [ScanSample; NUM_SWEEP_SAMPLES]) -> Self {
        Self { samples }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::{EqptError, HeadReading};

    /// Head which records the angles it was asked for.
    #[derive(Default)]
    struct RecordingHead {
        angles: Vec<i32>,
        settled: bool,
    }

    impl ScanHead for RecordingHead {
        fn sweep_to(&mut self, angle_deg: i32) -> Result<HeadReading, EqptError> {
            self.angles.push(angle_deg);
            Ok(HeadReading {
                ultrasonic_distance_cm: 100.0,
                infrared_raw: angle_deg as u16,
                infrared_distance_cm: 0.0,
            })
        }

        fn settle(&mut self, _duration: Duration) {
            self.settled = true;
        }
    }

    struct BrokenHead;

    impl ScanHead for BrokenHead {
        fn sweep_to(&mut self, _angle_deg: i32) -> Result<HeadReading, EqptError> {
            Err(EqptError::Disconnected)
        }
    }

    #[test]
    fn test_sweep_order() {
        let mut head = RecordingHead::default();
        let sweep = Sweeper::default().sweep(&mut head).unwrap();

        // Slew to start, then every step
        assert!(head.settled);
        assert_eq!(head.angles.len(), NUM_SWEEP_SAMPLES + 1);
        assert_eq!(head.angles[0], 0);
        assert_eq!(head.angles[1], 0);
        assert_eq!(*head.angles.last().unwrap(), 180);

        assert_eq!(sweep.get(40).unwrap().infrared_raw, 40);
    }

    #[test]
    fn test_sweep_error() {
        assert!(matches!(
            Sweeper::default().sweep(&mut BrokenHead),
            Err(SweepError::ScanHeadError(EqptError::Disconnected))
        ));
    }
}

//! Zero-phase filtering keeps symmetric peaks in place

use chrom_twin::denoise::zero_phase_smooth;
use proptest::prelude::*;

mod common;
use common::{argmax, gaussian_signal};

const LENGTH: usize = 1000;
const CENTRE: usize = 500;

fn odd_window() -> impl Strategy<Value = usize> {
    (2usize..=50).prop_map(|half| 2 * half + 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn symmetric_peak_does_not_move(window in odd_window(), width in 10.0f64..=30.0) {
        let signal = gaussian_signal(LENGTH, CENTRE as f64, width);
        let smoothed = zero_phase_smooth(&signal, window, 3).unwrap();

        prop_assert_eq!(smoothed.len(), LENGTH);
        let peak = argmax(&smoothed);
        prop_assert!(peak.abs_diff(CENTRE) <= 1, "peak moved to {} (window {})", peak, window);
    }
}

#[test]
fn test_smallest_and_largest_windows() {
    let signal = gaussian_signal(LENGTH, CENTRE as f64, 15.0);

    for window in [5, 101] {
        let smoothed = zero_phase_smooth(&signal, window, 3).unwrap();
        assert!(argmax(&smoothed).abs_diff(CENTRE) <= 1);
    }
}

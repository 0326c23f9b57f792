use gpu_matrix_multiply::utils::{measure_time, round_up};
use std::time::Duration;

#[test]
fn test_round_up() {
    assert_eq!(round_up(512, 16), 512);
    assert_eq!(round_up(513, 16), 528);
    assert_eq!(round_up(33, 16), 48);
    assert_eq!(round_up(1, 16), 16);
    assert_eq!(round_up(0, 16), 0);
}

#[test]
fn test_round_up_zero_multiple() {
    assert_eq!(round_up(7, 0), 7);
}

#[test]
fn test_measure_time_reports_elapsed() {
    let (value, duration) = measure_time(|| {
        std::thread::sleep(Duration::from_millis(10));
        42
    });

    assert_eq!(value, 42);
    assert!(duration >= Duration::from_millis(10));
}

use super::*;
use std::thread;

#[test]
fn test_search_limits_depth_only() {
    let limits = SearchLimits::depth(5);
    assert_eq!(limits.min_depth, 5);
    assert_eq!(limits.max_depth, 5);
    assert!(limits.move_time.is_none());
    assert!(!limits.time_control.is_stopped());
}

#[test]
fn test_search_limits_with_time() {
    let limits = SearchLimits::depth_and_time(2, 6, Duration::from_millis(100));
    assert_eq!(limits.min_depth, 2);
    assert_eq!(limits.max_depth, 6);
    assert_eq!(limits.move_time, Some(Duration::from_millis(100)));
}

#[test]
fn test_min_depth_clamped_to_max() {
    let limits = SearchLimits::depth_and_time(9, 3, Duration::ZERO);
    assert_eq!(limits.min_depth, 3);
}

#[test]
fn test_time_control_expiry() {
    let mut tc = TimeControl::new(Some(Duration::from_millis(10)));
    tc.start();
    assert!(!tc.is_stopped());

    thread::sleep(Duration::from_millis(20));
    tc.check_time();
    assert!(tc.is_stopped());
    assert!(tc.elapsed() >= Duration::from_millis(10));
}

#[test]
fn test_time_control_no_limit() {
    let mut tc = TimeControl::new(None);
    tc.start();
    thread::sleep(Duration::from_millis(10));
    tc.check_time();
    assert!(!tc.is_stopped());
}

#[test]
fn test_stop_from_clone_is_shared() {
    let mut tc = TimeControl::new(None);
    tc.start();
    let other = tc.clone();
    let handle = thread::spawn(move || other.stop());
    handle.join().unwrap();
    assert!(tc.is_stopped());

    // starting again does not drop the request
    tc.start();
    assert!(tc.is_stopped());
}

#[test]
fn test_check_interval() {
    let tc = TimeControl::default();
    assert!(tc.should_check_time(1024));
    assert!(tc.should_check_time(4096));
    assert!(!tc.should_check_time(1000));
}

#[test]
fn test_stop_before_start_is_kept() {
    let mut limits = SearchLimits::time(Duration::from_secs(60));
    limits.time_control.stop_handle().store(true, Ordering::SeqCst);
    limits.start();
    assert!(limits.time_control.is_stopped());
    assert!(limits.time_control.check_time());
}

#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn new_sampler_reports_zero_velocity() {
    let sampler = VelocitySampler::new();
    assert_eq!(sampler.velocity(), Point::default());
    assert!(sampler.last_sample().is_none());
}

#[test]
fn single_sample_sets_baseline_only() {
    let mut sampler = VelocitySampler::new();
    assert!(sampler.push(Point::new(10.0, 10.0), 0.0));
    assert_eq!(sampler.velocity(), Point::default());
    assert_eq!(sampler.last_sample().map(|s| s.at), Some(Point::new(10.0, 10.0)));
}

#[test]
fn velocity_is_units_per_second() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 1000.0);
    sampler.push(Point::new(10.0, -5.0), 1100.0);
    assert_eq!(sampler.velocity(), Point::new(100.0, -50.0));
}

#[test]
fn only_the_latest_pair_counts() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 0.0);
    sampler.push(Point::new(100.0, 0.0), 10.0);
    sampler.push(Point::new(101.0, 0.0), 20.0);
    assert_eq!(sampler.velocity(), Point::new(100.0, 0.0));
}

#[test]
fn duplicate_timestamp_is_discarded() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 0.0);
    sampler.push(Point::new(10.0, 0.0), 100.0);
    assert!(!sampler.push(Point::new(500.0, 500.0), 100.0));
    assert_eq!(sampler.velocity(), Point::new(100.0, 0.0));
    assert_eq!(sampler.last_sample().map(|s| s.at), Some(Point::new(10.0, 0.0)));
}

#[test]
fn backwards_timestamp_is_discarded() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 50.0);
    assert!(!sampler.push(Point::new(1.0, 1.0), 40.0));
    assert_eq!(sampler.velocity(), Point::default());
    assert_eq!(sampler.last_sample().map(|s| s.ts_ms), Some(50.0));
}

#[test]
fn discarded_sample_does_not_shift_baseline() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 0.0);
    sampler.push(Point::new(99.0, 99.0), 0.0);
    sampler.push(Point::new(10.0, 0.0), 100.0);
    assert_eq!(sampler.velocity(), Point::new(100.0, 0.0));
}

#[test]
fn reset_clears_estimate_and_baseline() {
    let mut sampler = VelocitySampler::new();
    sampler.push(Point::new(0.0, 0.0), 0.0);
    sampler.push(Point::new(10.0, 0.0), 100.0);
    sampler.reset();
    assert_eq!(sampler.velocity(), Point::default());
    assert!(sampler.last_sample().is_none());
}

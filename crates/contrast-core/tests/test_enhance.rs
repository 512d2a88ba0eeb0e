mod common;

use contrast_core::bounds::{BoundsPolicy, IgnoreFraction, SkipRounding};
use contrast_core::enhance::{enhance_global_contrast, EnhanceOptions};
use contrast_core::parallel::Executor;
use contrast_core::raster::Image;

fn options(fraction: f64) -> EnhanceOptions {
    EnhanceOptions {
        ignore_fraction: IgnoreFraction::new(fraction).unwrap(),
        ..EnhanceOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_two_by_two_grayscale() {
    let mut img = common::gray(2, 2, vec![10, 10, 250, 250]);
    let report = enhance_global_contrast(&mut img, &options(0.0), &Executor::sequential()).unwrap();

    assert_eq!(report.to_skip, 0);
    assert_eq!(report.bounds[0].low(), 10);
    assert_eq!(report.bounds[0].high(), 250);
    assert_eq!(img.into_pixels(), vec![0, 0, 255, 255]);
}

#[test]
fn test_uniform_rgb_collapses_to_zero() {
    for fraction in [0.0, 0.1, 0.3, 0.49] {
        let mut img = common::rgb(4, 1, vec![128; 12]);
        enhance_global_contrast(&mut img, &options(fraction), &Executor::sequential()).unwrap();
        assert_eq!(img.pixels(), &[0; 12], "fraction = {fraction}");
    }
}

#[test]
fn test_flat_channel_maps_to_zero_others_stretch() {
    // Green is flat; red and blue span a range.
    let mut img = common::rgb(2, 1, vec![10, 77, 0, 20, 77, 100]);
    enhance_global_contrast(&mut img, &options(0.0), &Executor::sequential()).unwrap();
    assert_eq!(img.pixels(), &[0, 0, 0, 255, 0, 255]);
}

#[test]
fn test_percentile_discards_outliers() {
    // 98 mid-gray pixels plus one black and one white outlier.
    let mut pixels = vec![100u8; 49];
    pixels.extend(vec![150u8; 49]);
    pixels.push(0);
    pixels.push(255);
    let mut img = common::gray(10, 10, pixels);

    let report = enhance_global_contrast(&mut img, &options(0.01), &Executor::sequential()).unwrap();
    assert_eq!(report.to_skip, 1);
    assert_eq!((report.bounds[0].low(), report.bounds[0].high()), (100, 150));

    let out = img.pixels();
    assert_eq!(out[0], 0);
    assert_eq!(out[49], 255);
    assert_eq!(out[98], 0);
    assert_eq!(out[99], 255);
}

#[test]
fn test_max_intensity_below_255() {
    let mut img = Image::new(vec![20, 30, 40, 60], 1, 4, 1, 100).unwrap();
    enhance_global_contrast(&mut img, &options(0.0), &Executor::sequential()).unwrap();
    // (v - 20) * 100 / 40
    assert_eq!(img.pixels(), &[0, 25, 50, 100]);
}

#[test]
fn test_max_intensity_zero() {
    let mut img = Image::new(vec![0; 6], 3, 2, 1, 0).unwrap();
    enhance_global_contrast(&mut img, &options(0.2), &Executor::sequential()).unwrap();
    assert_eq!(img.pixels(), &[0; 6]);
}

#[test]
fn test_global_policy_preserves_channel_balance() {
    let mut img = common::rgb(2, 1, vec![50, 100, 150, 60, 110, 200]);
    let opts = EnhanceOptions {
        policy: BoundsPolicy::Global,
        ..options(0.0)
    };
    let report = enhance_global_contrast(&mut img, &opts, &Executor::sequential()).unwrap();
    assert!(report.bounds.iter().all(|b| (b.low(), b.high()) == (50, 200)));
    // (v - 50) * 255 / 150
    assert_eq!(img.pixels(), &[0, 85, 170, 17, 102, 255]);
}

#[test]
fn test_rounding_option_reaches_solver() {
    let pixels = vec![5, 10, 20, 30, 40, 50, 60, 70, 80, 90];
    let mut floor_img = common::gray(10, 1, pixels.clone());
    let mut round_img = common::gray(10, 1, pixels);

    let floor = enhance_global_contrast(&mut floor_img, &options(0.15), &Executor::sequential()).unwrap();
    let round_opts = EnhanceOptions {
        rounding: SkipRounding::Round,
        ..options(0.15)
    };
    let round = enhance_global_contrast(&mut round_img, &round_opts, &Executor::sequential()).unwrap();

    assert_eq!(floor.to_skip, 1);
    assert_eq!(round.to_skip, 2);
    assert_ne!(floor_img.pixels(), round_img.pixels());
}

#[test]
fn test_percent_cutoff_on_ramp() {
    // Ramp 0..=99: ignoring 29% skips exactly 29 pixels per tail, so the
    // cutoffs land on the 30th bin from either end.
    let mut img = common::gray(100, 1, (0..100).collect());
    let opts = EnhanceOptions {
        ignore_fraction: IgnoreFraction::from_percent(29).unwrap(),
        ..EnhanceOptions::default()
    };
    let report = enhance_global_contrast(&mut img, &opts, &Executor::sequential()).unwrap();

    assert_eq!(report.to_skip, 29);
    assert_eq!((report.bounds[0].low(), report.bounds[0].high()), (29, 70));
    let out = img.pixels();
    assert_eq!(out[28], 0);
    assert_eq!(out[29], 0);
    assert_eq!(out[30], 6);
    assert_eq!(out[70], 255);
    assert_eq!(out[99], 255);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_histogram_invariant_after_enhance() {
    let (w, h) = (123, 77);
    let mut img = common::rgb(w, h, common::low_contrast(w * h * 3, 40, 90, 1));
    let executor = Executor::sequential();
    assert_eq!(img.refresh_histogram(&executor).channel_total(1), (w * h) as u64);

    enhance_global_contrast(&mut img, &options(0.05), &executor).unwrap();

    let hist = img.histogram().expect("histogram rebuilt after enhance");
    for c in 0..3 {
        assert_eq!(hist.channel_total(c), (w * h) as u64);
    }
}

#[test]
fn test_output_within_max_intensity() {
    let mut img = Image::new(common::noise(64 * 64 * 3, 180, 4), 3, 64, 64, 180).unwrap();
    enhance_global_contrast(&mut img, &options(0.1), &Executor::sequential()).unwrap();
    assert!(img.pixels().iter().all(|&v| v <= 180));
}

#[test]
fn test_zero_ignore_is_idempotent() {
    let (w, h) = (90, 60);
    let mut img = common::rgb(w, h, common::low_contrast(w * h * 3, 70, 140, 8));
    let executor = Executor::sequential();

    enhance_global_contrast(&mut img, &options(0.0), &executor).unwrap();
    let once = img.pixels().to_vec();
    enhance_global_contrast(&mut img, &options(0.0), &executor).unwrap();
    assert_eq!(img.pixels(), once.as_slice());
}

#[test]
fn test_deterministic_across_thread_counts() {
    let (w, h) = (640, 480);
    let pixels = common::low_contrast(w * h * 3, 30, 200, 21);

    let mut reference = common::rgb(w, h, pixels.clone());
    let ref_report =
        enhance_global_contrast(&mut reference, &options(0.02), &Executor::sequential()).unwrap();

    for threads in [0, 2, 3, 8] {
        let mut img = common::rgb(w, h, pixels.clone());
        let report =
            enhance_global_contrast(&mut img, &options(0.02), &Executor::new(threads).unwrap())
                .unwrap();
        assert_eq!(report, ref_report, "threads = {threads}");
        assert_eq!(img.pixels(), reference.pixels(), "threads = {threads}");
    }
}

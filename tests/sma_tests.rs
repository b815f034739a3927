use stock_dashboard::indicator::sma::{rolling_mean, Sma};

#[test]
fn basic_sma() {
    let mut sma = Sma::new(3);
    assert_eq!(sma.push(1.0), None);
    assert_eq!(sma.push(2.0), None);
    assert!(!sma.is_ready());

    let v = sma.push(3.0).unwrap();
    assert!((v - 2.0).abs() < f64::EPSILON);

    let v = sma.push(4.0).unwrap();
    assert!((v - 3.0).abs() < f64::EPSILON);
    assert_eq!(sma.period(), 3);
}

#[test]
fn ring_buffer_wraps_correctly() {
    let mut sma = Sma::new(3);
    sma.push(10.0);
    sma.push(20.0);
    sma.push(30.0);

    let v = sma.push(40.0).unwrap();
    assert!((v - 30.0).abs() < f64::EPSILON);

    let v = sma.push(50.0).unwrap();
    assert!((v - 40.0).abs() < f64::EPSILON);
}

#[test]
fn rolling_mean_has_no_drift_over_long_series() {
    let values: Vec<f64> = (0..10_000u64).map(|i| (i as f64) * 0.1 + 0.01).collect();
    let out = rolling_mean(&values, 20);

    for (i, got) in out.iter().enumerate() {
        match got {
            None => assert!(i < 19),
            Some(v) => {
                let naive = values[i - 19..=i].iter().sum::<f64>() / 20.0;
                assert!((v - naive).abs() < 1e-8, "drift at i={}: {} vs {}", i, v, naive);
            }
        }
    }
}

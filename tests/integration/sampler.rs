use std::sync::Arc;

use load_average::load::{AvgStat, LoadAverageSampler, LoadSnapshot};
use load_average::Error;
use tokio_util::sync::CancellationToken;

use crate::common::{fast_config, wait_for_samples, TestProvider};

#[tokio::test]
async fn test_zero_state_before_first_tick() {
    let (provider, readings) = TestProvider::scripted();
    let sampler = LoadAverageSampler::new(Arc::new(provider), fast_config()).unwrap();

    // The first read blocks until a reading is fed.
    assert_eq!(sampler.snapshot(), LoadSnapshot::default());
    tokio::time::sleep(fast_config().interval * 5).await;
    let snapshot = sampler.snapshot();
    assert_eq!(snapshot.load, AvgStat::default());
    assert!(snapshot.last_error.is_none());
    assert_eq!(sampler.avg(), Ok(AvgStat::default()));

    readings.send(Ok(1.0)).unwrap();
    wait_for_samples(&sampler, 1).await;
    assert!(sampler.avg().unwrap().load1 > 0.0);
}

#[tokio::test]
async fn test_averages_converge_monotonically() {
    let (provider, readings) = TestProvider::scripted();
    let sampler = LoadAverageSampler::new(Arc::new(provider), fast_config()).unwrap();
    let _ = sampler.snapshot();

    let mut previous = AvgStat::default();
    for tick in 1..=20 {
        readings.send(Ok(2.0)).unwrap();
        wait_for_samples(&sampler, tick).await;

        let load = sampler.avg().unwrap();
        for (now, before) in load.as_array().iter().zip(previous.as_array()) {
            assert!(*now > before, "tick {tick}: {now} did not grow past {before}");
            assert!(*now < 2.0);
        }
        previous = load;
    }
}

#[tokio::test]
async fn test_read_error_is_surfaced_without_halting() {
    let (provider, readings) = TestProvider::scripted();
    let sampler = LoadAverageSampler::new(Arc::new(provider), fast_config()).unwrap();
    let _ = sampler.snapshot();

    readings.send(Ok(1.0)).unwrap();
    readings.send(Ok(1.0)).unwrap();
    wait_for_samples(&sampler, 2).await;
    let before = sampler.snapshot();
    assert!(before.last_error.is_none());

    readings.send(Err(Error::SampleRead("tick 3".to_string()))).unwrap();
    wait_for_samples(&sampler, 3).await;
    let failed = sampler.snapshot();
    assert_eq!(failed.last_error, Some(Error::SampleRead("tick 3".to_string())));
    assert_eq!(sampler.avg(), Err(Error::SampleRead("tick 3".to_string())));
    // The failed read's zero was folded in.
    assert!(failed.load.load1 < before.load.load1);

    readings.send(Ok(1.0)).unwrap();
    wait_for_samples(&sampler, 4).await;
    let recovered = sampler.snapshot();
    assert!(recovered.last_error.is_none());
    assert_eq!(recovered.samples, 4);
    assert!(recovered.load.load1 > failed.load.load1);
}

#[tokio::test]
async fn test_cancellation_stops_updates() {
    let (provider, readings) = TestProvider::scripted();
    let sampler = LoadAverageSampler::new(Arc::new(provider), fast_config()).unwrap();
    let token = CancellationToken::new();
    let _ = sampler.snapshot_with_cancel(&token);

    readings.send(Ok(3.0)).unwrap();
    readings.send(Ok(3.0)).unwrap();
    wait_for_samples(&sampler, 2).await;
    token.cancel();

    let frozen = sampler.snapshot();
    for _ in 0..3 {
        let _ = readings.send(Ok(50.0));
    }
    tokio::time::sleep(fast_config().interval * 10).await;

    assert_eq!(sampler.snapshot(), frozen);
    assert_eq!(sampler.samples_taken(), 2);
}

#[tokio::test]
async fn test_dropping_sampler_stops_task() {
    let (provider, readings) = TestProvider::scripted();
    let provider = Arc::new(provider);
    let sampler = LoadAverageSampler::new(provider.clone(), fast_config()).unwrap();
    let _ = sampler.snapshot();

    readings.send(Ok(1.0)).unwrap();
    wait_for_samples(&sampler, 1).await;
    drop(sampler);
    tokio::time::sleep(fast_config().interval * 5).await;
    // Unblocks a read that may still be in flight; its result is discarded.
    let _ = readings.send(Ok(1.0));
    tokio::time::sleep(fast_config().interval * 5).await;

    // The task released its counter, so the script has no reader left.
    assert!(readings.send(Ok(1.0)).is_err());
    assert_eq!(provider.acquisitions(), 1);
}

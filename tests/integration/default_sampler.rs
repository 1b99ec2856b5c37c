use load_average::load;
use load_average::Error;
use tokio_util::sync::CancellationToken;

#[test]
fn test_default_sampler_reports_non_negative_load() {
    let sampler = load::default_sampler();
    assert!(sampler.config().dedicated_thread);

    // Either the counter works or sampling is silently disabled.
    if let Ok(stat) = load::avg() {
        assert!(stat.as_array().iter().all(|v| *v >= 0.0));
    }
    assert!(sampler.is_started());

    // A later token does not restart anything.
    let token = CancellationToken::new();
    assert!(!sampler.ensure_started(&token));
    let _ = load::avg_with_cancel(&token);
}

#[test]
fn test_default_misc_not_implemented() {
    assert!(matches!(load::misc(), Err(Error::NotImplemented(_))));
    assert!(matches!(load::misc_with_cancel(&CancellationToken::new()), Err(Error::NotImplemented(_))));
}

use crate::{WatchError, WatcherConfig};

fn config(look_behind_minutes: u32, ticker_interval_seconds: u32) -> WatcherConfig {
    WatcherConfig {
        look_behind_minutes,
        ticker_interval_seconds,
    }
}

#[test]
fn defaults_match_the_shipped_cli() {
    let config = WatcherConfig::default();
    assert_eq!(config.look_behind_minutes, 1);
    assert_eq!(config.ticker_interval_seconds, 5);
    config.validate().expect("defaults are valid");
}

#[test]
fn look_behind_bounds_are_inclusive() {
    config(1, 5).validate().expect("1 minute is valid");
    config(1440, 5).validate().expect("24 hours is valid");

    assert!(matches!(
        config(0, 5).validate(),
        Err(WatchError::InvalidConfig { .. })
    ));
    assert!(matches!(
        config(1441, 5).validate(),
        Err(WatchError::InvalidConfig { .. })
    ));
}

#[test]
fn ticker_bounds_are_inclusive() {
    config(60, 1).validate().expect("1 second is valid");
    config(60, 3600).validate().expect("1 hour is valid");

    assert!(matches!(
        config(60, 0).validate(),
        Err(WatchError::InvalidConfig { .. })
    ));
    assert!(matches!(
        config(60, 3601).validate(),
        Err(WatchError::InvalidConfig { .. })
    ));
}

#[test]
fn rejection_reasons_name_the_offending_knob() {
    match config(0, 5).validate() {
        Err(err @ WatchError::InvalidConfig { .. }) => {
            assert_eq!(err.as_label(), "watch_invalid_config");
            assert!(err.to_string().contains("lookBehindMinutes"));
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
    match config(60, 3601).validate() {
        Err(err) => assert!(err.to_string().contains("tickerIntervalSeconds")),
        Ok(()) => panic!("expected invalid config"),
    }
}

#[test]
fn config_deserializes_from_camel_case() {
    let config: WatcherConfig =
        serde_json::from_str(r#"{"lookBehindMinutes": 60, "tickerIntervalSeconds": 300}"#)
            .expect("valid config json");
    assert_eq!(config.look_behind_minutes, 60);
    assert_eq!(config.ticker_interval_seconds, 300);
}

use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = LoaderConfig::default();
    assert_eq!(cfg.max_cache_size, 50);
    assert_eq!(cfg.concurrency_limit, 6);
    assert_eq!(NavigatorConfig::default().debounce(), Duration::from_millis(300));
}

#[test]
fn json_uses_camel_case_and_fills_missing_fields() {
    let cfg = LoaderConfig::from_json_str(r#"{"maxCacheSize": 5}"#).unwrap();
    assert_eq!(cfg.max_cache_size, 5);
    assert_eq!(cfg.concurrency_limit, DEFAULT_CONCURRENCY_LIMIT);

    let cfg = LoaderConfig::from_json_str(r#"{"concurrencyLimit": 2}"#).unwrap();
    assert_eq!(cfg.max_cache_size, DEFAULT_MAX_CACHE_SIZE);
    assert_eq!(cfg.concurrency_limit, 2);

    assert_eq!(LoaderConfig::from_json_str("{}").unwrap(), LoaderConfig::default());
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = LoaderConfig::from_json_str(r#"{"maxCacheSize": "lots"}"#).unwrap_err();
    assert!(matches!(err, SlidecastError::Config(_)));
}

#[test]
fn zero_values_fall_back_to_defaults() {
    let cfg = LoaderConfig {
        max_cache_size: 0,
        concurrency_limit: 0,
    }
    .normalized();
    assert_eq!(cfg, LoaderConfig::default());

    let cfg = LoaderConfig {
        max_cache_size: 3,
        concurrency_limit: 1,
    }
    .normalized();
    assert_eq!(cfg.max_cache_size, 3);
    assert_eq!(cfg.concurrency_limit, 1);
}

//! Tests for persisted tracker configuration
//!
//! Round-trips go through TOML, the same serde path confy uses, so they
//! exercise what `load`/`store` actually do without touching the
//! platform config directory.

use crate::fields::FieldValue;

use super::TrackerConfig;

fn sample_config() -> TrackerConfig {
    let mut config = TrackerConfig {
        site_id: Some("shop".to_string()),
        session_id: Some("sess-7".to_string()),
        global_user_id: None,
        ..TrackerConfig::default()
    };
    config
        .global_fields
        .insert("release".to_string(), FieldValue::Str("3.1".to_string()));
    config
        .global_fields
        .insert("cart".to_string(), FieldValue::Double(99.99999999));
    config
        .global_fields
        .insert("retries".to_string(), FieldValue::Int(3));
    config
        .global_fields
        .insert("beta".to_string(), FieldValue::Bool(true));
    config
}

#[test]
fn test_config_round_trip_preserves_value_tags() {
    let config = sample_config();
    let encoded = toml::to_string(&config).unwrap();
    let decoded: TrackerConfig = toml::from_str(&encoded).unwrap();

    assert_eq!(decoded, config);
    // Floats always parse as f64 and must keep full precision
    assert_eq!(
        decoded.global_fields.get("cart"),
        Some(&FieldValue::Double(99.99999999))
    );
    assert_eq!(decoded.global_fields.get("retries"), Some(&FieldValue::Int(3)));
    assert_eq!(decoded.global_fields.get("beta"), Some(&FieldValue::Bool(true)));
    assert_eq!(
        decoded.global_fields.get("release"),
        Some(&FieldValue::Str("3.1".to_string()))
    );
}

#[test]
fn test_loaded_float_is_double_not_narrowed() {
    let decoded: TrackerConfig = toml::from_str(
        r#"
            [global_fields]
            cart = 99.99999999
        "#,
    )
    .unwrap();

    assert_eq!(
        decoded.global_fields.get("cart"),
        Some(&FieldValue::Double(99.99999999))
    );
}

#[test]
fn test_missing_sections_default() {
    let decoded: TrackerConfig = toml::from_str("").unwrap();

    assert_eq!(decoded, TrackerConfig::default());
    assert!(decoded.global_fields.is_empty());
}

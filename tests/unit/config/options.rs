use super::*;

#[test]
fn defaults_are_valid() {
    let opts = EngineOptions::default();
    opts.validate().unwrap();
    assert_eq!(opts.hi_res_cache_max, 4);
    assert!(opts.use_dom_snapshot_skin);
}

#[test]
fn partial_json_keeps_defaults() {
    let opts =
        EngineOptions::from_json_str(r#"{ "hiResCacheMax": 2, "destroyHiResOnPointerOut": true }"#)
            .unwrap();
    assert_eq!(opts.hi_res_cache_max, 2);
    assert!(opts.destroy_hi_res_on_pointer_out);
    assert_eq!(opts.card_width, 200.0);
    assert_eq!(opts.large_scale, 2.0);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = EngineOptions::from_json_str(r#"{ "hiResCacheMaxx": 2 }"#).unwrap_err();
    assert!(matches!(err, CardSkinError::Serde(_)));
}

#[test]
fn validation_rejects_bad_values() {
    let bad = [
        EngineOptions {
            card_width: 0.0,
            ..EngineOptions::default()
        },
        EngineOptions {
            large_scale: f64::NAN,
            ..EngineOptions::default()
        },
        EngineOptions {
            hover_scale: 0.9,
            ..EngineOptions::default()
        },
        EngineOptions {
            tilt_damping_rate: -1.0,
            ..EngineOptions::default()
        },
        EngineOptions {
            jobs_per_frame: 0,
            ..EngineOptions::default()
        },
        EngineOptions {
            corner_radius: 0.75,
            ..EngineOptions::default()
        },
    ];
    for opts in bad {
        assert!(
            matches!(opts.validate(), Err(CardSkinError::Validation(_))),
            "{opts:?}"
        );
    }
}

#[test]
fn overrides_apply_parseable_values_only() {
    let vars = |key: &str| match key {
        "CARDSKIN_HIRES_CACHE_MAX" => Some("9".to_string()),
        "CARDSKIN_DOM_SNAPSHOT" => Some("off".to_string()),
        "CARDSKIN_JOBS_PER_FRAME" => Some("zero".to_string()),
        _ => None,
    };
    let opts = EngineOptions::default().with_overrides_from(vars);
    assert_eq!(opts.hi_res_cache_max, 9);
    assert!(!opts.use_dom_snapshot_skin);
    assert_eq!(opts.jobs_per_frame, 4);
}

#[test]
fn from_path_reports_missing_file() {
    let err = EngineOptions::from_path(Path::new("definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read options"));
}

use super::*;

#[test]
fn defaults_are_valid() {
    ChartSettings::default().validate().unwrap();
}

#[test]
fn partial_json_fills_in_defaults() {
    let json = r##"{ "image_size_px": 800, "colors": { "male_fill": "#000000" } }"##;
    let s: ChartSettings = serde_json::from_str(json).unwrap();
    assert_eq!(s.image_size_px, 800);
    assert_eq!(s.colors.male_fill, "#000000");
    assert_eq!(s.colors.female_fill, ChartColors::default().female_fill);
    assert_eq!(s.animation, AnimationSettings::default());
    assert_eq!(s.column_width, 26.0);
    s.validate().unwrap();
}

#[test]
fn bad_values_fail_validation() {
    let mut s = ChartSettings::default();
    s.colors.wedge_edge = "white".to_string();
    assert!(s.validate().is_err());

    let mut s = ChartSettings::default();
    s.image_size_px = 10;
    assert!(s.validate().is_err());

    let mut s = ChartSettings::default();
    s.animation.fps = 0;
    assert!(s.validate().is_err());
}

#[test]
fn hex_colours_parse() {
    assert_eq!(parse_hex_rgb("#FF0000").unwrap(), 0xFF0000);
    assert_eq!(parse_hex_rgb("1f4e9e").unwrap(), 0x1F4E9E);
    assert!(parse_hex_rgb("#FFF").is_err());
}

#[test]
fn animation_budget_helpers() {
    let a = AnimationSettings::default();
    assert_eq!(a.max_bytes(), 15 * 1024 * 1024);
    assert_eq!(a.frame_delay_ms(), 41);
}

#[test]
fn load_reads_json_file() {
    let dir = std::path::PathBuf::from("target").join("settings_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    std::fs::write(&path, r#"{ "font_family": "Noto Sans" }"#).unwrap();
    let s = ChartSettings::load(&path).unwrap();
    assert_eq!(s.font_family, "Noto Sans");
}

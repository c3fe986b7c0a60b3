use pill::theme::{Color, TokenColors, TokenTheme, BUILTIN_THEMES, DEFAULT_YAML, OUTLINE_YAML};

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#157EFB").unwrap();
    assert_eq!(color, Color::rgb(0x15, 0x7E, 0xFB));
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#BBBBBB80").unwrap();
    assert_eq!(color.a, 0x80);
    assert_eq!(color.to_hex(), "#BBBBBB80");
}

#[test]
fn test_color_from_hex_rejects_garbage() {
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#GGGGGG").is_err());
    assert!(Color::from_hex("#ééé").is_err());
}

#[test]
fn test_default_yaml_matches_builtin_palette() {
    let theme = TokenTheme::from_yaml(DEFAULT_YAML).unwrap();
    assert_eq!(theme.name, "Default");
    assert_eq!(theme.colors, TokenColors::default());
}

#[test]
fn test_outline_yaml_has_border() {
    let theme = TokenTheme::from_yaml(OUTLINE_YAML).unwrap();
    assert_eq!(theme.name, "Outline");
    assert_eq!(theme.colors.border, Some(Color::rgb(0x5A, 0x5A, 0x5A)));
    assert_eq!(theme.colors.border_width, 1.5);
}

#[test]
fn test_all_builtin_themes_parse() {
    for builtin in BUILTIN_THEMES {
        assert!(
            TokenTheme::from_builtin(builtin.id).is_ok(),
            "builtin theme {} failed to parse",
            builtin.id
        );
    }
}

#[test]
fn test_unknown_builtin_is_error() {
    assert!(TokenTheme::from_builtin("nope").is_err());
}

#[test]
fn test_bad_color_in_yaml_is_error() {
    let yaml = "version: 1\nname: Bad\ntoken:\n  text: \"#FFF\"\n  background: \"#000000\"\n  highlight: \"#000000\"\n";
    assert!(TokenTheme::from_yaml(yaml).is_err());
}

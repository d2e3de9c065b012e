use video::{Resolution, ResolutionError};

#[test]
fn test_parse_valid() {
    assert_eq!("640x480".parse::<Resolution>(), Ok(Resolution::new(640, 480)));
    assert_eq!("1920x1080".parse::<Resolution>(), Ok(Resolution::new(1920, 1080)));
    assert_eq!("1x1".parse::<Resolution>(), Ok(Resolution::new(1, 1)));
}

#[test]
fn test_parse_roundtrips_display() {
    for (width, height) in [(160, 120), (1280, 720), (3840, 2160)] {
        let text = format!("{width}x{height}");
        let resolution: Resolution = text.parse().unwrap();
        assert_eq!(resolution.as_tuple(), (width, height));
        assert_eq!(resolution.to_string(), text);
    }
}

#[test]
fn test_missing_separator() {
    assert!(matches!(
        "640480".parse::<Resolution>(),
        Err(ResolutionError::MissingSeparator(_))
    ));
    assert!(matches!(
        "640*480".parse::<Resolution>(),
        Err(ResolutionError::MissingSeparator(_))
    ));
}

#[test]
fn test_non_numeric_components() {
    for text in ["x480", "640x", "abcx480", "640xabc", "640x480x2", "+640x480", " 640x480", "-1x480"] {
        assert!(
            matches!(text.parse::<Resolution>(), Err(ResolutionError::InvalidNumber(_))),
            "{text:?} should not parse"
        );
    }
}

#[test]
fn test_zero_dimension() {
    assert!(matches!(
        "0x480".parse::<Resolution>(),
        Err(ResolutionError::Empty(_))
    ));
}

#[test]
fn test_overflow() {
    assert!("99999999999x480".parse::<Resolution>().is_err());
}

#[test]
fn test_default_is_vga() {
    assert_eq!(Resolution::default(), Resolution::new(640, 480));
}

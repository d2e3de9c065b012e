use {
    std::{path::Path, time::Duration},
    video::{CaptureConfig, Resolution},
};

#[test]
fn test_default_config() {
    let config = CaptureConfig::default();
    assert_eq!(config.device(), Path::new("/dev/video0"));
    assert_eq!(config.resolution(), Resolution::new(640, 480));
    assert_eq!(config.buffer_count(), 32);
    assert_eq!(config.count(), 1);
    assert_eq!(config.skip(), 0);
    assert_eq!(config.pause(), Duration::ZERO);
    assert!(!config.loop_mode());
    assert!(!config.ignore_errors());
}

#[test]
fn test_builder_pattern() {
    let config = CaptureConfig::default()
        .with_device("/dev/video2")
        .with_resolution(Resolution::new(1280, 720))
        .with_buffer_count(8)
        .with_count(10)
        .with_skip(3)
        .with_pause(Duration::from_millis(500))
        .with_loop_mode(true)
        .with_ignore_errors(true);

    assert_eq!(config.device(), Path::new("/dev/video2"));
    assert_eq!(config.resolution(), Resolution::new(1280, 720));
    assert_eq!(config.buffer_count(), 8);
    assert_eq!(config.count(), 10);
    assert_eq!(config.skip(), 3);
    assert_eq!(config.pause(), Duration::from_millis(500));
    assert!(config.loop_mode());
    assert!(config.ignore_errors());
}

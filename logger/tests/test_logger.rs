use page_cursor_logger::{debug, init_global, test_logger, Config, Level};

#[tokio::test]
async fn test_logger_is_shared() {
    let first = test_logger();
    let second = test_logger();
    debug!("visible at the test level");

    second.reload_level(Level::TRACE).unwrap();
    first.reload_level(Level::DEBUG).unwrap();

    let error = init_global(&Config::default(), false).unwrap_err();
    assert_eq!(error.to_string(), "Global logger is already installed");
}

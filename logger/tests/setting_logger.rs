use page_cursor_logger::{info, init_global, Config, Level};

#[tokio::test]
async fn setting_logger_twice_fails() {
    let cfg = Config::default();

    let first = init_global(&cfg, false);
    assert!(first.is_ok());

    let second = init_global(&cfg, false);
    assert!(second.is_err());

    let handle = first.unwrap();
    handle.reload_level(Level::WARN).unwrap();
    info!("filtered out after reload");
}

#[test]
fn install_panic_hook_multiple_times_works() {
    page_cursor_logger::install_panic_hook().unwrap();
    page_cursor_logger::install_panic_hook().unwrap();
}

use sinklog::logging::{self, Destination};

#[test]
fn log_macros_flow_through_the_shared_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.log");

    let logger = logging::get_instance(Destination::File, path.to_str().unwrap(), "").unwrap();
    logger.init().unwrap();

    log::warn!("cache miss ratio {}%", 42);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "WARNING: cache miss ratio 42%\n"
    );

    log::debug!("filtered out at the default level");
    log::error!("giving up");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "ERROR: giving up\n");

    assert!(logger.init().is_err());
}

use cvsafe::{ErrorKind, Sequence, config};
use cvsafe::config::BridgeConfig;

// Installing is process-wide, so everything touching the installed configuration
// lives in a single test.
#[test]
fn test_install_once_and_enforce_limits() {
    assert_eq!(config::current(), &BridgeConfig::default());

    assert!(config::install(BridgeConfig {
        max_sequence_len: 0,
        ..BridgeConfig::default()
    })
    .is_err());

    let limited = BridgeConfig::with_all_parameters(4, true, true).unwrap();
    config::install(limited.clone()).unwrap();
    assert_eq!(config::current(), &limited);

    let err = config::install(BridgeConfig::default()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidOperation { .. }));
    assert_eq!(config::current().max_sequence_len, 4);

    assert_eq!(Sequence::from_slice(&[1i32, 2, 3, 4]).unwrap().len().unwrap(), 4);
    let err = Sequence::from_slice(&[1i32, 2, 3, 4, 5]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

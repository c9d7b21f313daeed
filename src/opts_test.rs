use crate::Opts;

#[test]
fn default_opts() {
    let opts = Opts::default();
    assert!(opts.reject_bookmarks);
    assert_eq!(opts.buffer_capacity, 16);
}

#[test]
fn override_opts() {
    let opts = Opts {
        reject_bookmarks: false,
        ..Default::default()
    };
    assert!(!opts.reject_bookmarks);
    assert_eq!(opts.buffer_capacity, 16);
}

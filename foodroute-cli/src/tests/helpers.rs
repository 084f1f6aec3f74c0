//! Test helpers for composing request files.

use camino::{Utf8Path, Utf8PathBuf};
use foodroute_core::{Category, Location};
use serde::Serialize;
use tempfile::TempDir;

/// Write `contents` to `path`, creating the file.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Serialise `value` as JSON into `path`.
pub(super) fn write_json<T: Serialize>(path: &Utf8Path, value: &T) {
    let payload = serde_json::to_string_pretty(value).expect("serialise request");
    write_utf8(path, payload.as_bytes());
}

/// Temporary directory with a UTF-8 root.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn volunteer() -> Location {
    Location::new(12.9716, 77.5946)
        .with_category(Category::Volunteer)
        .with_name("Volunteer")
}

/// Two donations north of the volunteer, listed farthest first.
pub(super) fn donations() -> Vec<Location> {
    vec![
        Location::new(12.9916, 77.5946)
            .with_id(2)
            .with_name("Bakery"),
        Location::new(12.9816, 77.5946)
            .with_id(1)
            .with_name("Canteen"),
    ]
}

/// Two camps, the second closer to the volunteer.
pub(super) fn camps() -> Vec<Location> {
    vec![
        Location::new(13.0716, 77.5946)
            .with_id(10)
            .with_category(Category::Camp)
            .with_name("Far camp"),
        Location::new(12.9716, 77.6146)
            .with_id(11)
            .with_category(Category::Camp)
            .with_name("Near camp"),
    ]
}

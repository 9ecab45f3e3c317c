use std::fs;
use std::path::Path;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    let version_path = Path::new(&manifest_dir).join("../../VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .expect("read workspace VERSION file")
        .trim()
        .to_string();

    let well_formed = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()));
    assert!(
        well_formed,
        "VERSION must be dotted numeric (for example 0.1.0), got '{version}'"
    );

    println!("cargo:rustc-env=PACT_CHECK_VERSION={version}");
}

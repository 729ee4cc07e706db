// Stamps MM_VERSION for `app::VERSION`. Release pipelines set MM_PATCH_VERSION
// to replace the patch number with their run number.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-env-changed=MM_PATCH_VERSION");

    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");
    let Some((major_minor, patch)) = version.rsplit_once('.') else {
        panic!("Cargo.toml version must be major.minor.patch, got {version}");
    };

    let patch = match env::var("MM_PATCH_VERSION") {
        Ok(run) if run.chars().all(|c| c.is_ascii_digit()) && !run.is_empty() => run,
        Ok(run) => panic!("MM_PATCH_VERSION must be a number, got {run:?}"),
        Err(_) => patch.to_string(),
    };

    println!("cargo:rustc-env=MM_VERSION={major_minor}.{patch}");
}

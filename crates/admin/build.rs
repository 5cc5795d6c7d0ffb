//! Build script for admin crate.
//!
//! Fingerprints the console stylesheet for cache busting.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:rustc-env=CSS_HASH=dev");
        return;
    };
    let css_path = Path::new(&manifest_dir).join("static/css/admin.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    let hash = fs::read(&css_path).map_or_else(
        |e| {
            println!("cargo:warning=Could not read admin.css: {e}");
            "dev".to_string()
        },
        |content| {
            format!("{:x}", Sha256::digest(&content))
                .chars()
                .take(8)
                .collect()
        },
    );

    println!("cargo:rustc-env=CSS_HASH={hash}");
}

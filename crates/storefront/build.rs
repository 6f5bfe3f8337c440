//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so its URL changes whenever its content does.
//! The hash is exposed to templates as `CSS_HASH`.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    if let Err(e) = hash_css() {
        println!("cargo:warning=Could not fingerprint main.css: {e}");
        println!("cargo:rustc-env=CSS_HASH=");
    }
}

fn hash_css() -> std::io::Result<()> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(std::io::Error::other)?;
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path)?;

    // First 8 hex chars of SHA-256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env=CSS_HASH={short_hash}");
    Ok(())
}

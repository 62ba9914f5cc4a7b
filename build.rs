// Copies the static site to `dist/` so it can be deployed as-is.
use std::path::Path;

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        if let Err(err) = fs_extra::dir::remove(out_dir) {
            println!("cargo:warning=could not clear dist/: {err}");
            return;
        }
    }

    let options = CopyOptions::new().content_only(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {err}");
    }
}

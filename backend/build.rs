use std::{env, fs, path::{Path, PathBuf}};

// Ship settings.json next to the built binary so `cargo run` picks it up.
fn main() {
    println!("cargo:rerun-if-changed=settings.json");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else { return };
    let Some(target_dir) = out_dir.ancestors().nth(3) else { return };

    if Path::new("settings.json").exists() {
        if let Err(e) = fs::copy("settings.json", target_dir.join("settings.json")) {
            println!("cargo:warning=could not copy settings.json: {e}");
        }
    }
}

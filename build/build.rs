use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SWE_SOURCES: [&str; 9] = [
    "swecl.c",
    "swedate.c",
    "swehel.c",
    "swehouse.c",
    "swejpl.c",
    "swemmoon.c",
    "swemplan.c",
    "sweph.c",
    "swephlib.c",
];

fn main() {
    println!("cargo:rerun-if-changed=build/build.rs");
    println!("cargo:rerun-if-env-changed=SWISSEPH_SRC");
    println!("cargo:rerun-if-env-changed=SWISSEPH_LIB_DIR");

    // Nothing to link unless the Swiss Ephemeris backend is enabled.
    if env::var_os("CARGO_FEATURE_SWISSEPH").is_none() {
        return;
    }

    match env::var_os("SWISSEPH_SRC").map(PathBuf::from) {
        Some(src) => compile_sources(&src),
        None => link_system_library(),
    }
}

fn compile_sources(src: &Path) {
    let mut build = cc::Build::new();

    if cfg!(target_os = "windows") {
        build.flag("/W4");
    } else {
        build.flag("-g").flag("-Wall").flag("-fPIC");
    }

    for file in SWE_SOURCES {
        let path = src.join(file);
        if !path.exists() {
            panic!("SWISSEPH_SRC is missing {}", path.display());
        }
        println!("cargo:rerun-if-changed={}", path.display());
        build.file(path);
    }

    build.include(src).warnings(false).compile("swe");
}

fn link_system_library() {
    if let Some(dir) = env::var_os("SWISSEPH_LIB_DIR") {
        let dir = PathBuf::from(dir);
        let found = fs::read_dir(&dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .any(|entry| entry.file_name().to_string_lossy().contains("swe"))
            })
            .unwrap_or(false);
        if !found {
            println!("cargo:warning=no swe library found in {}", dir.display());
        }
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    println!("cargo:rustc-link-lib=swe");
}

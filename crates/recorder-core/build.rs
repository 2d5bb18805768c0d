fn main() {
    println!("cargo:rerun-if-env-changed=APPLE_CAPTURE_LIB_DIR");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "macos" || std::env::var_os("CARGO_FEATURE_APPLE_CAPTURE").is_none() {
        return;
    }

    // libAppleCapture.dylib is built outside of cargo
    if let Some(lib_dir) = std::env::var_os("APPLE_CAPTURE_LIB_DIR") {
        let lib_dir = std::path::PathBuf::from(lib_dir);
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
        println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
    } else {
        println!("cargo:warning=APPLE_CAPTURE_LIB_DIR not set, relying on the default search path");
    }

    println!("cargo:rustc-link-lib=dylib=AppleCapture");
    println!("cargo:rustc-link-arg=-Wl,-rpath,@executable_path/../Frameworks");

    for framework in [
        "AVFoundation",
        "CoreMedia",
        "CoreVideo",
        "VideoToolbox",
        "CoreGraphics",
    ] {
        println!("cargo:rustc-link-lib=framework={framework}");
    }
}

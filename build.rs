fn main() {
    let is_nightly = version_check::is_feature_flaggable() == Some(true);
    let is_at_least_1_57 = version_check::is_min_version("1.57.0").unwrap_or(false);

    println!("cargo:rustc-check-cfg=cfg(nightly)");

    if !is_at_least_1_57 {
        println!("cargo:warning=idvec requires rustc => 1.57.0");
    }

    if is_nightly {
        println!("cargo:rustc-cfg=nightly");
    }
}

//! Generates `include/rest_ffi.h` for C hosts.

fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("REST_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            let include = format!("{crate_dir}/include");
            if let Err(err) = std::fs::create_dir_all(&include) {
                println!("cargo:warning=failed to create {include}: {err}");
                return;
            }
            bindings.write_to_file(format!("{include}/rest_ffi.h"));
        }
        // Header generation failures only warn.
        Err(err) => println!("cargo:warning=failed to generate C header: {err}"),
    }
}

//! Retrieves information about the version of the crate from Git and the build
//! environment. The generated `shadow.rs` is included by `src/lib.rs` and can
//! be accessed at runtime by the driver binary.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}

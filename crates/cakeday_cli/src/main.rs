//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cakeday_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("cakeday_core ping={}", cakeday_core::ping());
    println!("cakeday_core version={}", cakeday_core::core_version());
}

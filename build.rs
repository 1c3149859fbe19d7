fn main() {
    // Host builds (tests, --no-default-features) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

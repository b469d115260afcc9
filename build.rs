fn main() {
    // Exposes build metadata (git commit, profile) to `built_info`.
    built::write_built_file().expect("failed to acquire build-time information");
}

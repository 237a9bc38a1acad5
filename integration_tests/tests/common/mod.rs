use std::path::PathBuf;
use std::sync::Once;

static SANDBOX_ENV: Once = Once::new();

/// Lake layout on a 40 board with seed 1337.
#[allow(dead_code)]
pub fn fixture_path() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", "test_sandbox_config.json"]
        .iter()
        .collect()
}

/// Point `SANDBOX_CONFIG_PATH` at the fixture for every app built afterwards.
#[allow(dead_code)]
pub fn ensure_test_config() {
    SANDBOX_ENV.call_once(|| {
        let fixture = fixture_path();
        assert!(fixture.is_file(), "fixture {} not found", fixture.display());
        std::env::set_var("SANDBOX_CONFIG_PATH", fixture);
    });
}

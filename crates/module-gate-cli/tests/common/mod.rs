// crates/module-gate-cli/tests/common/mod.rs
// =============================================================================
// Module: CLI Test Helpers
// Description: Shared helpers for running the module-gate binary in tests.
// Purpose: Run the CLI in an isolated working directory with fixture files.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

/// Manifest whose base module targets Linux on `x86_64`.
pub const CLEAN_MANIFEST: &str = r#"{
  "modules": [
    {
      "name": "java.base",
      "packages": ["java.lang"],
      "exports": [{ "package": "java.lang" }],
      "target": { "os_name": "Linux", "os_arch": "x86_64" }
    },
    {
      "name": "app.core",
      "packages": ["app.core"],
      "requires": [{ "name": "java.base", "modifiers": ["mandated"] }]
    }
  ]
}"#;

/// Manifest with a non-base module that carries a platform target.
pub const TARGETED_MANIFEST: &str = r#"{
  "modules": [
    {
      "name": "java.base",
      "packages": ["java.lang"],
      "target": { "os_name": "Linux", "os_arch": "x86_64" }
    },
    {
      "name": "app.native",
      "packages": ["app.native"],
      "target": { "os_name": "Linux" }
    }
  ]
}"#;

/// Writes `contents` to `name` under `dir` and returns the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Builds a command for the CLI binary isolated from ambient configuration.
pub fn cli_command(cwd: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_module-gate"));
    command.current_dir(cwd).env_remove("MODULE_GATE_CONFIG");
    command
}

/// Runs the CLI with `args` in `cwd`.
pub fn run_cli(cwd: &Path, args: &[&str]) -> Result<Output, String> {
    cli_command(cwd).args(args).output().map_err(|err| err.to_string())
}

/// Returns stdout as UTF-8 text.
pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Returns stderr as UTF-8 text.
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

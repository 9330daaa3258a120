use crate::error::DebugError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Test frameworks that ship a debug launcher script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFramework {
    Unittest,
    Pytest,
}

impl TestFramework {
    pub fn as_str(self) -> &'static str {
        match self {
            TestFramework::Unittest => "unittest",
            TestFramework::Pytest => "pytest",
        }
    }

    /// Launcher script for this framework inside `launcher_root`.
    pub fn launcher_script(self, launcher_root: &Path) -> PathBuf {
        match self {
            TestFramework::Unittest => launcher_root.join("visualstudio_py_testlauncher.py"),
            TestFramework::Pytest => launcher_root.join("testlauncher.py"),
        }
    }

    /// Arguments handed to the launcher. The unittest launcher rejects `--debug`.
    pub fn launcher_args(self, args: &[String]) -> Vec<String> {
        match self {
            TestFramework::Unittest => args.iter().filter(|a| a.as_str() != "--debug").cloned().collect(),
            TestFramework::Pytest => args.to_vec(),
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestFramework {
    type Err = DebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unittest" => Ok(TestFramework::Unittest),
            "pytest" => Ok(TestFramework::Pytest),
            other => Err(DebugError::UnknownTestFramework(other.to_string())),
        }
    }
}

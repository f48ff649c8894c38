use std::str::FromStr;

use serde::Deserialize;

/// How a retained process is stopped before the next pipeline run.
///
/// - `Kill`: forceful termination (SIGKILL on Unix). Default.
/// - `Graceful`: ask the process to exit (SIGTERM on Unix).
///
/// Windows has no signal semantics; both modes kill the whole process tree
/// there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerminationMode {
    #[default]
    Kill,
    Graceful,
}

impl TerminationMode {
    pub fn from_graceful(graceful: bool) -> Self {
        if graceful {
            TerminationMode::Graceful
        } else {
            TerminationMode::Kill
        }
    }

    pub fn is_graceful(self) -> bool {
        matches!(self, TerminationMode::Graceful)
    }
}

impl FromStr for TerminationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kill" | "sigkill" => Ok(TerminationMode::Kill),
            "graceful" | "term" | "sigterm" => Ok(TerminationMode::Graceful),
            other => Err(format!(
                "invalid termination mode: {other} (expected \"kill\" or \"graceful\")"
            )),
        }
    }
}

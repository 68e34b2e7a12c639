//! Control actions on the monitoring core
//!
//! `POST /control?action=verify` runs the core's configuration check and
//! returns its output, structured when possible. `POST
//! /control?action=restart` asks the running core to restart through its
//! command file.
//!
//! Both commands block the request until they finish; there is no timeout.

pub mod verify_output;

pub use verify_output::{BucketValue, StructuredOutput, parse_verification_output};

use crate::core::AUDIT_TARGET;
use crate::core::auth::Principal;
use crate::core::error::{ApiError, ApiResult};
use crate::core::store::ObjectStore;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::process::Command;

/// Query parameter naming the action
pub const ACTION_PARAM: &str = "action";

/// Return code reported when the verification command cannot be run
pub const LAUNCH_FAILURE_RETURNCODE: i32 = 255;

pub const RESTART_RESULT: &str = "successfully sent command to command file";

/// A privileged, non-CRUD operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Verify,
    Restart,
}

impl FromStr for ControlAction {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s {
            "verify" => Ok(ControlAction::Verify),
            "restart" => Ok(ControlAction::Restart),
            other => Err(ApiError::bad_request(format!("invalid argument: {}", other))),
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Verify => f.write_str("verify"),
            ControlAction::Restart => f.write_str("restart"),
        }
    }
}

impl ControlAction {
    /// Extract the single action from the request's query pairs
    pub fn from_query(pairs: &[(String, String)]) -> ApiResult<Self> {
        let actions: Vec<&str> = pairs
            .iter()
            .filter(|(key, _)| key == ACTION_PARAM)
            .map(|(_, value)| value.as_str())
            .collect();

        match actions.as_slice() {
            [action] => action.parse(),
            _ => Err(ApiError::bad_request(
                "control endpoint accepts exactly ONE action argument",
            )),
        }
    }
}

/// Output of the verification command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlOutput {
    Structured(StructuredOutput),
    Raw(String),
}

/// Result of `verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlResult {
    pub output: ControlOutput,
    pub returncode: i32,
}

impl ControlResult {
    /// Structure captured text when any line matches a bucket
    pub fn from_captured(text: String, returncode: i32) -> Self {
        let output = match parse_verification_output(&text) {
            Some(structured) => ControlOutput::Structured(structured),
            None => ControlOutput::Raw(text),
        };
        Self { output, returncode }
    }

    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            output: ControlOutput::Raw(message.into()),
            returncode: LAUNCH_FAILURE_RETURNCODE,
        }
    }

    pub fn is_success(&self) -> bool {
        self.returncode == 0
    }
}

/// Response body of `/control`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Verify(ControlResult),
    Restart { result: String },
}

/// Runs control actions against the monitoring core
#[derive(Clone)]
pub struct ControlDispatcher {
    monitoring_bin: PathBuf,
    main_cfg: PathBuf,
    use_sudo: bool,
    store: Arc<dyn ObjectStore>,
}

impl fmt::Debug for ControlDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlDispatcher")
            .field("monitoring_bin", &self.monitoring_bin)
            .field("main_cfg", &self.main_cfg)
            .field("use_sudo", &self.use_sudo)
            .finish()
    }
}

impl ControlDispatcher {
    pub fn new(
        monitoring_bin: impl Into<PathBuf>,
        main_cfg: impl Into<PathBuf>,
        use_sudo: bool,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            monitoring_bin: monitoring_bin.into(),
            main_cfg: main_cfg.into(),
            use_sudo,
            store,
        }
    }

    /// Run one action on behalf of `principal`
    pub async fn dispatch(&self, action: ControlAction, principal: &Principal) -> ApiResult<ControlResponse> {
        tracing::info!(%action, %principal, "running control action");
        match action {
            ControlAction::Verify => Ok(ControlResponse::Verify(self.verify().await)),
            ControlAction::Restart => self.restart(principal).await,
        }
    }

    fn verify_command(&self) -> Command {
        let mut command = if self.use_sudo {
            let mut sudo = Command::new("sudo");
            sudo.arg("-n").arg(&self.monitoring_bin);
            sudo
        } else {
            Command::new(&self.monitoring_bin)
        };
        command.arg("-v").arg(&self.main_cfg);
        command
    }

    /// Check the configuration with the monitoring binary
    pub async fn verify(&self) -> ControlResult {
        match self.verify_command().output().await {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                let returncode = output.status.code().unwrap_or(LAUNCH_FAILURE_RETURNCODE);
                if returncode != 0 {
                    tracing::info!(returncode, "configuration verification failed");
                }
                ControlResult::from_captured(text, returncode)
            }
            Err(err) => {
                tracing::error!(
                    binary = %self.monitoring_bin.display(),
                    error = %err,
                    "unable to run verification command"
                );
                ControlResult::launch_failure(err.to_string())
            }
        }
    }

    /// Send a restart command to the running core
    pub async fn restart(&self, principal: &Principal) -> ApiResult<ControlResponse> {
        tracing::warn!(target: AUDIT_TARGET, %principal, "{} triggered the restart command", principal);

        let execution_failure = |err: anyhow::Error| ApiError::ExecutionFailure {
            action: ControlAction::Restart.to_string(),
            message: err.to_string(),
        };

        let command_file = self
            .store
            .find_command_file(&self.main_cfg)
            .await
            .map_err(execution_failure)?;

        self.store
            .restart_program(&command_file)
            .await
            .map_err(execution_failure)?;

        Ok(ControlResponse::Restart {
            result: RESTART_RESULT.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::Query;
    use crate::core::store::{ObjectDefinitions, StoredObject};
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;

    struct NoObjects;

    #[async_trait]
    impl ObjectStore for NoObjects {
        fn object_definitions(&self) -> ObjectDefinitions {
            ObjectDefinitions::new()
        }
        async fn filter(&self, _: &str, _: &Query) -> Result<Vec<StoredObject>> {
            Ok(vec![])
        }
        async fn save(&self, object: &StoredObject) -> Result<StoredObject> {
            Ok(object.clone())
        }
        async fn delete(&self, _: &StoredObject) -> Result<()> {
            Ok(())
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dispatcher(bin: &str, main_cfg: impl Into<PathBuf>) -> ControlDispatcher {
        ControlDispatcher::new(bin, main_cfg, false, Arc::new(NoObjects))
    }

    #[test]
    fn test_single_action_accepted() {
        assert_eq!(
            ControlAction::from_query(&pairs(&[("action", "verify")])).unwrap(),
            ControlAction::Verify
        );
        assert_eq!(
            ControlAction::from_query(&pairs(&[("action", "restart")])).unwrap(),
            ControlAction::Restart
        );
    }

    #[test]
    fn test_action_count_must_be_one() {
        assert!(ControlAction::from_query(&[]).is_err());
        let err = ControlAction::from_query(&pairs(&[("action", "verify"), ("action", "restart")]))
            .unwrap_err();
        assert!(err.to_string().contains("exactly ONE"));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = ControlAction::from_query(&pairs(&[("action", "reboot")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: reboot");
    }

    #[test]
    fn test_control_result_falls_back_to_raw() {
        let result = ControlResult::from_captured("Things look okay".to_string(), 0);
        assert!(result.is_success());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"output": "Things look okay", "returncode": 0})
        );
    }

    #[tokio::test]
    async fn test_verify_launch_failure() {
        let result = dispatcher("/nonexistent/monitoring-bin", "/etc/nagios/nagios.cfg")
            .verify()
            .await;
        assert_eq!(result.returncode, LAUNCH_FAILURE_RETURNCODE);
        assert!(matches!(result.output, ControlOutput::Raw(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_parses_command_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("check.sh");
        std::fs::write(
            &script,
            "echo 'Error: bad host'\necho 'Error: bad service'\necho 'Total Errors: 2'\nexit 2\n",
        )
        .unwrap();

        // `sh -v <script>` runs the script like `<bin> -v <main_cfg>` would
        let result = dispatcher("sh", &script).verify().await;

        assert_eq!(result.returncode, 2);
        assert!(!result.is_success());
        match result.output {
            ControlOutput::Structured(buckets) => {
                assert_eq!(
                    buckets.get("Error"),
                    Some(&BucketValue::Many(vec![
                        "bad host".to_string(),
                        "bad service".to_string()
                    ]))
                );
                assert_eq!(
                    buckets.get("Total Errors"),
                    Some(&BucketValue::Single("2".to_string()))
                );
            }
            other => panic!("Expected structured output, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_restart_without_command_file_is_execution_failure() {
        let principal = Principal("admin".to_string());
        let err = dispatcher("nagios", "/nonexistent/nagios.cfg")
            .restart(&principal)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ExecutionFailure { .. }));
        assert!(err.to_string().starts_with("unable to execute action restart"));
    }

    #[tokio::test]
    async fn test_restart_writes_command() {
        let dir = tempfile::tempdir().unwrap();
        let command_file = dir.path().join("nagios.cmd");
        std::fs::write(&command_file, "").unwrap();
        let main_cfg = dir.path().join("nagios.cfg");
        std::fs::write(&main_cfg, format!("command_file={}\n", command_file.display())).unwrap();

        let response = dispatcher("nagios", &main_cfg)
            .dispatch(ControlAction::Restart, &Principal("admin".to_string()))
            .await
            .unwrap();

        assert_eq!(
            response,
            ControlResponse::Restart {
                result: RESTART_RESULT.to_string()
            }
        );
        let written = std::fs::read_to_string(&command_file).unwrap();
        assert!(written.contains("RESTART_PROGRAM"));
    }
}

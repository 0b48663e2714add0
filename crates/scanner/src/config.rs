//! 스캔 도구 설정
//!
//! [`ScanToolConfig`]는 core의 [`CxflowConfig`](cxflow_core::config::CxflowConfig)에서
//! 스캐너 컴포넌트가 필요로 하는 값만 추려 해석된 경로 형태로 보관합니다.
//!
//! # 사용 예시
//! ```ignore
//! use cxflow_core::config::CxflowConfig;
//! use cxflow_scanner::ScanToolConfig;
//!
//! let core_config = CxflowConfig::default();
//! let config = ScanToolConfig::from_core(&core_config);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use cxflow_core::config::CxflowConfig;

use crate::error::ScannerError;
use crate::runner::CommandSpec;

/// 스캔 도구 설정
#[derive(Debug, Clone)]
pub struct ScanToolConfig {
    /// 스캔 CLI 바이너리 경로
    pub cli_path: PathBuf,
    /// git 바이너리 경로
    pub git_path: PathBuf,
    /// 모든 명령의 작업 디렉토리
    pub working_dir: PathBuf,
    /// clone 대상 경로 (명령 인자로 그대로 전달됨)
    pub source_path: PathBuf,
    /// 요청할 스캔 유형
    pub scan_types: Vec<String>,
    /// `scan create` 리포트 형식
    pub scan_report_format: String,
    /// `scan create` 출력 파일 이름
    pub scan_output_name: String,
    /// 결과 리포트 출력 디렉토리
    pub report_dir: PathBuf,
    /// JSON 리포트 이름 (확장자 제외)
    pub json_output_name: String,
    /// SARIF 리포트 이름 (확장자 제외)
    pub sarif_output_name: String,
    /// 외부 명령 타임아웃 (None = 무제한)
    pub command_timeout: Option<Duration>,
}

impl Default for ScanToolConfig {
    fn default() -> Self {
        Self::from_core(&CxflowConfig::default())
    }
}

impl ScanToolConfig {
    /// core 설정에서 스캔 도구 설정을 생성합니다.
    pub fn from_core(core: &CxflowConfig) -> Self {
        let working_dir = core.general.working_dir();
        let command_timeout = match core.scanner.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            cli_path: PathBuf::from(&core.scanner.cli_path),
            git_path: PathBuf::from(&core.scanner.git_path),
            source_path: PathBuf::from(&core.scanner.source_path),
            scan_types: core.scanner.scan_types.clone(),
            scan_report_format: core.scanner.scan_report_format.clone(),
            scan_output_name: core.scanner.scan_output_name.clone(),
            report_dir: core.reports.output_dir(&working_dir),
            json_output_name: core.reports.json_output_name.clone(),
            sarif_output_name: core.reports.sarif_output_name.clone(),
            command_timeout,
            working_dir,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.cli_path.as_os_str().is_empty() {
            return Err(ScannerError::Config {
                field: "cli_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.git_path.as_os_str().is_empty() {
            return Err(ScannerError::Config {
                field: "git_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.scan_types.is_empty() {
            return Err(ScannerError::Config {
                field: "scan_types".to_owned(),
                reason: "at least one scan type is required".to_owned(),
            });
        }

        if self.command_timeout == Some(Duration::ZERO) {
            return Err(ScannerError::Config {
                field: "command_timeout".to_owned(),
                reason: "use None to disable the timeout".to_owned(),
            });
        }

        Ok(())
    }

    /// 작업 디렉토리 기준으로 해석한 소스 체크아웃 경로
    pub fn source_dir(&self) -> PathBuf {
        if self.source_path.is_absolute() {
            self.source_path.clone()
        } else {
            self.working_dir.join(&self.source_path)
        }
    }

    /// 스캔 CLI 호출의 시작점 (작업 디렉토리 설정 포함)
    pub(crate) fn cli(&self) -> CommandSpec {
        CommandSpec::new(self.cli_path.display().to_string()).current_dir(&self.working_dir)
    }

    /// git 호출의 시작점 (작업 디렉토리 설정 포함)
    pub(crate) fn git(&self) -> CommandSpec {
        CommandSpec::new(self.git_path.display().to_string()).current_dir(&self.working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_core_copies_scanner_and_report_settings() {
        let mut core = CxflowConfig::default();
        core.general.working_dir = "/srv/scans".to_owned();
        core.scanner.cli_path = "/opt/cx/cx".to_owned();
        core.scanner.command_timeout_secs = 60;
        core.reports.output_dir = "reports".to_owned();

        let config = ScanToolConfig::from_core(&core);
        assert_eq!(config.cli_path, PathBuf::from("/opt/cx/cx"));
        assert_eq!(config.working_dir, PathBuf::from("/srv/scans"));
        assert_eq!(config.report_dir, PathBuf::from("/srv/scans/reports"));
        assert_eq!(config.command_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.json_output_name, "cx_result");
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let config = ScanToolConfig::from_core(&CxflowConfig::default());
        assert!(config.command_timeout.is_none());
    }

    #[test]
    fn default_config_is_valid() {
        ScanToolConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_scan_types() {
        let config = ScanToolConfig {
            scan_types: Vec::new(),
            ..ScanToolConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ScannerError::Config { ref field, .. } if field == "scan_types"));
    }

    #[test]
    fn source_dir_resolves_relative_path() {
        let config = ScanToolConfig {
            working_dir: PathBuf::from("/work"),
            source_path: PathBuf::from("checkout"),
            ..ScanToolConfig::default()
        };
        assert_eq!(config.source_dir(), PathBuf::from("/work/checkout"));

        let config = ScanToolConfig {
            source_path: PathBuf::from("/abs/checkout"),
            ..config
        };
        assert_eq!(config.source_dir(), PathBuf::from("/abs/checkout"));
    }

    #[test]
    fn cli_command_runs_in_working_dir() {
        let config = ScanToolConfig {
            working_dir: PathBuf::from("/work"),
            ..ScanToolConfig::default()
        };
        let spec = config.cli().arg("project").arg("list");
        assert_eq!(spec.program(), "/usr/local/bin/cx");
        assert_eq!(spec.cwd(), Some(std::path::Path::new("/work")));
        assert_eq!(spec.arg_values(), vec!["project", "list"]);
    }
}

//! 설정 관리: cxflow.toml 파싱 및 런타임 설정
//!
//! [`CxflowConfig`]는 워크플로의 모든 단계가 사용하는 설정을 담는 최상위 구조체입니다.
//! 각 컴포넌트는 생성 시 자기 섹션만 전달받습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CXFLOW_SCANNER_CLI_PATH=/opt/cx/cx` 형식)
//! 3. 설정 파일 (`cxflow.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 비밀 값(API 키, SMTP 비밀번호)은 설정 파일에 저장하지 않습니다.
//! SMTP 비밀번호는 `email.password_env`가 가리키는 환경변수에서 읽습니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), cxflow_core::error::CxflowError> {
//! use cxflow_core::config::CxflowConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = CxflowConfig::load("cxflow.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CxflowConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, CxflowError};

/// cxflow 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CxflowConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 외부 스캔 도구 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// 결과 리포트 설정
    #[serde(default)]
    pub reports: ReportsConfig,
    /// 이메일 알림 설정
    #[serde(default)]
    pub email: EmailConfig,
}

impl CxflowConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CxflowError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작해 환경변수 오버라이드를 적용합니다.
    ///
    /// `cxflow run` 은 설정 파일 없이 환경변수만으로도 동작해야 하므로
    /// 파일 부재를 에러로 취급하지 않습니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CxflowError> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await? {
            return Self::load(path).await;
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일을 읽어 파싱만 합니다.
    ///
    /// 검증은 환경변수 오버라이드 이후 [`load`](Self::load)에서 수행되므로,
    /// 파일에서 빠진 필수 값을 환경변수로 채울 수 있습니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CxflowError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CxflowError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CxflowError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CxflowError> {
        toml::from_str(toml_str).map_err(|e| {
            CxflowError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CXFLOW_{SECTION}_{FIELD}`
    /// 예: `CXFLOW_EMAIL_SMTP_HOST=smtp.example.com`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CXFLOW_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CXFLOW_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.working_dir, "CXFLOW_GENERAL_WORKING_DIR");

        // Scanner
        override_string(&mut self.scanner.cli_path, "CXFLOW_SCANNER_CLI_PATH");
        override_string(&mut self.scanner.git_path, "CXFLOW_SCANNER_GIT_PATH");
        override_string(&mut self.scanner.source_path, "CXFLOW_SCANNER_SOURCE_PATH");
        override_csv(&mut self.scanner.scan_types, "CXFLOW_SCANNER_SCAN_TYPES");
        override_string(
            &mut self.scanner.scan_report_format,
            "CXFLOW_SCANNER_SCAN_REPORT_FORMAT",
        );
        override_string(
            &mut self.scanner.scan_output_name,
            "CXFLOW_SCANNER_SCAN_OUTPUT_NAME",
        );
        override_u64(
            &mut self.scanner.command_timeout_secs,
            "CXFLOW_SCANNER_COMMAND_TIMEOUT_SECS",
        );

        // Reports
        override_string(&mut self.reports.output_dir, "CXFLOW_REPORTS_OUTPUT_DIR");
        override_string(
            &mut self.reports.json_output_name,
            "CXFLOW_REPORTS_JSON_OUTPUT_NAME",
        );
        override_string(
            &mut self.reports.sarif_output_name,
            "CXFLOW_REPORTS_SARIF_OUTPUT_NAME",
        );

        // Email
        override_bool(&mut self.email.enabled, "CXFLOW_EMAIL_ENABLED");
        override_string(&mut self.email.smtp_host, "CXFLOW_EMAIL_SMTP_HOST");
        override_u16(&mut self.email.smtp_port, "CXFLOW_EMAIL_SMTP_PORT");
        override_string(&mut self.email.sender, "CXFLOW_EMAIL_SENDER");
        override_string(&mut self.email.username, "CXFLOW_EMAIL_USERNAME");
        override_string(&mut self.email.password_env, "CXFLOW_EMAIL_PASSWORD_ENV");
        override_string(&mut self.email.recipient, "CXFLOW_EMAIL_RECIPIENT");
        override_string(&mut self.email.subject, "CXFLOW_EMAIL_SUBJECT");
        override_string(&mut self.email.body, "CXFLOW_EMAIL_BODY");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CxflowError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.general.working_dir.is_empty() {
            return Err(invalid("general.working_dir", "must not be empty"));
        }

        // 외부 바이너리 경로 검증
        if self.scanner.cli_path.is_empty() {
            return Err(invalid("scanner.cli_path", "must not be empty"));
        }
        if self.scanner.git_path.is_empty() {
            return Err(invalid("scanner.git_path", "must not be empty"));
        }
        if self.scanner.source_path.is_empty() {
            return Err(invalid("scanner.source_path", "must not be empty"));
        }
        if self.scanner.scan_types.is_empty()
            || self.scanner.scan_types.iter().any(|t| t.trim().is_empty())
        {
            return Err(invalid(
                "scanner.scan_types",
                "must contain at least one non-empty scan type",
            ));
        }

        // 리포트 이름 검증
        if self.reports.json_output_name.is_empty() {
            return Err(invalid("reports.json_output_name", "must not be empty"));
        }
        if self.reports.sarif_output_name.is_empty() {
            return Err(invalid("reports.sarif_output_name", "must not be empty"));
        }

        // 이메일 검증 (활성화된 경우에만)
        if self.email.enabled {
            if self.email.smtp_host.is_empty() {
                return Err(invalid(
                    "email.smtp_host",
                    "must not be empty when email is enabled",
                ));
            }
            if self.email.smtp_port == 0 {
                return Err(invalid("email.smtp_port", "must be greater than 0"));
            }
            if self.email.sender.is_empty() {
                return Err(invalid(
                    "email.sender",
                    "must not be empty when email is enabled",
                ));
            }
            if self.email.recipient.is_empty() {
                return Err(invalid(
                    "email.recipient",
                    "must not be empty when email is enabled",
                ));
            }
            if self.email.password_env.is_empty() {
                return Err(invalid(
                    "email.password_env",
                    "must name the environment variable holding the SMTP password",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> CxflowError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 모든 외부 명령이 실행되는 작업 디렉토리
    pub working_dir: String,
}

impl GeneralConfig {
    /// 작업 디렉토리 경로
    pub fn working_dir(&self) -> PathBuf {
        PathBuf::from(&self.working_dir)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            working_dir: ".".to_owned(),
        }
    }
}

/// 외부 스캔 도구 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 스캔 CLI 바이너리 경로
    pub cli_path: String,
    /// git 바이너리 경로
    pub git_path: String,
    /// 저장소를 clone 할 경로 (작업 디렉토리 기준 상대 경로 허용)
    pub source_path: String,
    /// 요청할 스캔 유형
    pub scan_types: Vec<String>,
    /// `scan create` 에 전달할 리포트 형식
    pub scan_report_format: String,
    /// `scan create` 에 전달할 출력 파일 이름
    pub scan_output_name: String,
    /// 외부 명령 타임아웃 (초, 0 = 무제한)
    pub command_timeout_secs: u64,
}

impl ScannerConfig {
    /// 작업 디렉토리 기준으로 소스 경로를 해석합니다.
    pub fn source_dir(&self, working_dir: &Path) -> PathBuf {
        resolve(working_dir, &self.source_path)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cli_path: "/usr/local/bin/cx".to_owned(),
            git_path: "git".to_owned(),
            source_path: "./vulnerable-project".to_owned(),
            scan_types: vec!["sast".to_owned()],
            scan_report_format: "json".to_owned(),
            scan_output_name: "scan-report.json".to_owned(),
            command_timeout_secs: 0,
        }
    }
}

/// 결과 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// 리포트 출력 디렉토리 (비어 있으면 작업 디렉토리)
    pub output_dir: String,
    /// JSON 리포트 파일 이름 (확장자 제외)
    pub json_output_name: String,
    /// SARIF 리포트 파일 이름 (확장자 제외)
    pub sarif_output_name: String,
}

impl ReportsConfig {
    /// 작업 디렉토리 기준으로 리포트 디렉토리를 해석합니다.
    pub fn output_dir(&self, working_dir: &Path) -> PathBuf {
        if self.output_dir.is_empty() {
            working_dir.to_path_buf()
        } else {
            resolve(working_dir, &self.output_dir)
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: String::new(),
            json_output_name: "cx_result".to_owned(),
            sarif_output_name: "Demo".to_owned(),
        }
    }
}

/// 이메일 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// SMTP 서버 호스트
    pub smtp_host: String,
    /// SMTP 서버 포트 (STARTTLS)
    pub smtp_port: u16,
    /// 발신자 주소
    pub sender: String,
    /// SMTP 로그인 사용자 (비어 있으면 발신자 주소)
    pub username: String,
    /// SMTP 비밀번호를 담은 환경변수 이름
    pub password_env: String,
    /// 수신자 주소
    pub recipient: String,
    /// 제목 템플릿 (`{project}` 치환)
    pub subject: String,
    /// 본문
    pub body: String,
}

impl EmailConfig {
    /// SMTP 로그인에 사용할 사용자 이름
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.sender
        } else {
            &self.username
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_owned(),
            smtp_port: 587,
            sender: String::new(),
            username: String::new(),
            password_env: "CXFLOW_EMAIL_PASSWORD".to_owned(),
            recipient: String::new(),
            subject: "Checkmarx Scan Report for {project}".to_owned(),
            body: "Attached are the scan reports in JSON and SARIF formats.".to_owned(),
        }
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

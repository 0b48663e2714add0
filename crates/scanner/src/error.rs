//! 스캐너 에러 타입
//!
//! [`ScannerError`]는 외부 명령 실행과 스캔 ID 조회에서 발생하는 에러를 표현합니다.
//! 명령 실패와 조회 실패는 CLI 에서 서로 다른 종료 코드로 매핑됩니다.

/// 외부 도구 호출 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// 외부 명령이 0이 아닌 종료 코드로 끝남
    #[error("command failed: {command}: {stderr}")]
    CommandFailed {
        /// 렌더링된 명령 (비밀 인자는 마스킹됨)
        command: String,
        /// 종료 코드 (시그널로 종료된 경우 None)
        status: Option<i32>,
        /// 캡처된 표준 에러 출력
        stderr: String,
    },

    /// 외부 명령을 시작하지 못함 (바이너리 없음, 권한 등)
    #[error("failed to start command: {command}: {reason}")]
    Spawn {
        /// 렌더링된 명령
        command: String,
        /// 실패 사유
        reason: String,
    },

    /// 외부 명령이 제한 시간을 초과함
    #[error("command timed out after {secs}s: {command}")]
    Timeout {
        /// 렌더링된 명령
        command: String,
        /// 제한 시간 (초)
        secs: u64,
    },

    /// 프로젝트 이름과 일치하는 스캔이 없음
    #[error("no scan found for project '{project}'")]
    ScanNotFound {
        /// 조회한 프로젝트 이름
        project: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 시스템 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScannerError {
    /// 명령 실패의 표준 에러 출력에 `needle`이 포함되어 있는지 확인합니다.
    ///
    /// 명령 실패가 아닌 에러는 항상 `false`입니다.
    pub fn stderr_contains(&self, needle: &str) -> bool {
        match self {
            Self::CommandFailed { stderr, .. } => stderr.contains(needle),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_display_includes_command_and_stderr() {
        let err = ScannerError::CommandFailed {
            command: "/usr/local/bin/cx project list".to_owned(),
            status: Some(1),
            stderr: "unauthorized".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/usr/local/bin/cx project list"));
        assert!(msg.contains("unauthorized"));
    }

    #[test]
    fn scan_not_found_display_names_project() {
        let err = ScannerError::ScanNotFound {
            project: "proj-z".to_owned(),
        };
        assert!(err.to_string().contains("proj-z"));
    }

    #[test]
    fn timeout_display_includes_duration() {
        let err = ScannerError::Timeout {
            command: "git clone".to_owned(),
            secs: 30,
        };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn stderr_contains_only_matches_command_failures() {
        let failed = ScannerError::CommandFailed {
            command: "cx project create".to_owned(),
            status: Some(1),
            stderr: "project already exists".to_owned(),
        };
        assert!(failed.stderr_contains("already exists"));

        let spawn = ScannerError::Spawn {
            command: "cx".to_owned(),
            reason: "already exists".to_owned(),
        };
        assert!(!spawn.stderr_contains("already exists"));
    }
}

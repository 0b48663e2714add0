//! 에러 타입: 설정 로딩 및 공통 I/O 에러 정의
//!
//! 스캐너/알림 모듈은 각자의 도메인 에러를 가지며,
//! 최상위 CLI 에서 종료 코드로 변환됩니다.

/// cxflow 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CxflowError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

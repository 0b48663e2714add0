#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, CxflowError};

// 설정
pub use config::CxflowConfig;

// 도메인 타입
pub use types::{ReportFile, ReportFormat, ScanId};

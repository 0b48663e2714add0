//! 도메인 타입: 워크플로 단계 사이에서 전달되는 값
//!
//! 모든 값은 한 번의 실행 동안만 메모리에 존재합니다.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 외부 스캔 도구가 부여한 스캔 식별자
///
/// 형식 검증 없이 불투명한 토큰으로 취급합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(String);

impl ScanId {
    /// 문자열로부터 스캔 ID를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 원본 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 결과 리포트 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// 스캔 도구 고유 JSON
    Json,
    /// SARIF (Static Analysis Results Interchange Format)
    Sarif,
}

impl ReportFormat {
    /// `--report-format` 인자로 전달되는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sarif => "sarif",
        }
    }

    /// 외부 도구가 출력 파일에 붙이는 확장자
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sarif" => Ok(Self::Sarif),
            other => Err(format!("unknown report format: {other} (expected: json, sarif)")),
        }
    }
}

/// 외부 도구가 생성한(것으로 기대되는) 리포트 파일
///
/// 경로는 도구 호출 결과로부터 계산될 뿐, 실제 존재 여부는 확인하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    /// 리포트 형식
    pub format: ReportFormat,
    /// 파일 경로
    pub path: PathBuf,
}

impl ReportFile {
    /// `<dir>/<output_name>.<ext>` 경로의 리포트 파일을 만듭니다.
    pub fn in_dir(dir: &Path, output_name: &str, format: ReportFormat) -> Self {
        Self {
            format,
            path: dir.join(format!("{output_name}.{}", format.extension())),
        }
    }

    /// 첨부 파일 이름으로 쓰이는 파일명
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for ReportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.format)
    }
}

//! 에러 타입 정의 모듈
//!
//! snippet-converter에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// snippet-converter에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum SnippetConverterError {
    /// 입력 폴더가 존재하지 않음
    #[error("입력 폴더를 찾을 수 없습니다: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// .alfredsnippets 파일이 존재하지 않음
    #[error("스니펫 아카이브 파일을 찾을 수 없습니다: {path}")]
    ZipFileNotFound { path: PathBuf },

    /// 확장자 또는 ZIP 시그니처가 올바르지 않음
    #[error("유효한 ZIP 아카이브가 아닙니다: {path}")]
    InvalidZipFile { path: PathBuf },

    /// 폴더도 .alfredsnippets 파일도 아님
    #[error("지원하지 않는 입력 형식입니다: {path}")]
    UnsupportedInputFormat { path: PathBuf },

    /// 입력 경로가 하나도 없음
    #[error("입력 경로가 지정되지 않았습니다")]
    NoInputPathsProvided,

    /// 같은 입력 경로가 두 번 이상 지정됨
    #[error("중복된 입력 경로가 있습니다")]
    DuplicateInputPaths,

    /// 임시 폴더 생성 실패
    #[error("임시 폴더를 만들 수 없습니다: {reason}")]
    TemporaryDirectoryCreationFailed { reason: String },

    /// 아카이브 추출 자체가 실패
    #[error("아카이브 추출 실패 ({path}): {reason}")]
    ArchiveExtraction { path: PathBuf, reason: String },

    /// 추출 또는 추출 결과 검증 단계의 실패 (원인 포함)
    #[error("스니펫 아카이브를 풀 수 없습니다: {source}")]
    ZipExtractionFailed {
        #[source]
        source: Box<SnippetConverterError>,
    },

    /// 추출된 아카이브의 구성이 올바르지 않음
    #[error("아카이브 내용이 올바르지 않습니다: {reason}")]
    InvalidArchiveContent { reason: String },

    /// 임시 폴더 삭제 실패
    #[error("임시 폴더 정리 실패 ({path}): {reason}")]
    CleanupFailed { path: PathBuf, reason: String },

    /// 출력 파일 확장자가 .plist가 아님
    #[error("출력 파일은 `.plist` 형식이어야 합니다: {file_name}")]
    InvalidOutputFileType { file_name: String },

    /// 출력 파일이 이미 존재
    #[error("출력 파일이 이미 존재합니다: {path}")]
    FileAlreadyExists { path: PathBuf },

    /// 파일 또는 폴더 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// JSON 파싱 실패 (문법 오류, 필드 누락, 타입 불일치)
    #[error("JSON 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// 파일 쓰기 실패
    #[error("파일 쓰기 실패 ({file}): {reason}")]
    WriteError { file: PathBuf, reason: String },
}

/// snippet-converter 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SnippetConverterError>;

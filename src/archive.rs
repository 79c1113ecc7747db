//! 아카이브 처리 모듈
//!
//! `.alfredsnippets` (ZIP) 파일의 시그니처 검사, 임시 폴더 생성,
//! 추출 및 추출 결과 검증을 담당합니다.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Result, SnippetConverterError};
use crate::snippet::SNIPPET_FILE_SUFFIX;

/// 아카이브로 인정하는 확장자 (소문자)
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["alfredsnippets", "zip"];

/// 추출된 아카이브에 반드시 있어야 하는 매니페스트 파일 이름
pub const MANIFEST_FILE_NAME: &str = "info.plist";

/// ZIP 계열 매직 넘버 (local file header, end of central directory, data descriptor)
const ZIP_SIGNATURES: [[u8; 4]; 3] = [
    [0x50, 0x4B, 0x03, 0x04],
    [0x50, 0x4B, 0x05, 0x06],
    [0x50, 0x4B, 0x07, 0x08],
];

const TEMP_DIR_PREFIX: &str = "snippet-converter-";

/// 확장자와 앞 4바이트 시그니처로 ZIP 아카이브 여부 판단
///
/// 최대 4바이트만 읽으며, 읽기 실패나 길이 부족은 `false`입니다.
///
/// # Examples
/// ```
/// use snippet_converter::archive::is_archive;
///
/// assert!(!is_archive(std::path::Path::new("/nonexistent/file.alfredsnippets")));
/// ```
pub fn is_archive(path: &Path) -> bool {
    let has_archive_extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    if !has_archive_extension {
        return false;
    }

    let mut header = [0u8; 4];
    let read = File::open(path).and_then(|mut file| file.read_exact(&mut header));
    if read.is_err() {
        return false;
    }

    ZIP_SIGNATURES.contains(&header)
}

/// 아카이브를 지정된 폴더에 추출
///
/// # Arguments
/// * `source` - 추출할 아카이브 경로
/// * `destination` - 이미 존재하는 대상 폴더
pub fn extract(source: &Path, destination: &Path) -> Result<()> {
    let extraction_error = |reason: String| SnippetConverterError::ArchiveExtraction {
        path: source.to_path_buf(),
        reason,
    };

    if !destination.is_dir() {
        return Err(extraction_error(format!(
            "대상 폴더가 존재하지 않습니다: {}",
            destination.display()
        )));
    }

    let file = File::open(source).map_err(|e| extraction_error(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| extraction_error(e.to_string()))?;

    debug!(
        "{} 개 항목 추출: {} -> {}",
        archive.len(),
        source.display(),
        destination.display()
    );

    archive
        .extract(destination)
        .map_err(|e| extraction_error(e.to_string()))
}

/// 고유한 이름의 임시 폴더 생성
///
/// # Arguments
/// * `root` - 상위 폴더 (None이면 시스템 임시 폴더)
pub fn create_temporary_directory(root: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_DIR_PREFIX);

    let created = match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    };

    let temp_dir = created.map_err(|e| SnippetConverterError::TemporaryDirectoryCreationFailed {
        reason: e.to_string(),
    })?;

    debug!("임시 폴더 생성: {}", temp_dir.path().display());
    Ok(temp_dir)
}

/// 추출 결과에 JSON 스니펫 파일과 info.plist가 모두 있는지 검사
///
/// JSON 파일 검사를 먼저 수행하므로 둘 다 없으면 JSON 쪽 사유가 보고됩니다.
pub fn validate_extracted_content(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| SnippetConverterError::FileOpenError {
        file: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    if !names.iter().any(|name| name.ends_with(SNIPPET_FILE_SUFFIX)) {
        return Err(SnippetConverterError::InvalidArchiveContent {
            reason: "JSON 스니펫 파일이 없습니다".to_string(),
        });
    }

    if !names.iter().any(|name| name == MANIFEST_FILE_NAME) {
        return Err(SnippetConverterError::InvalidArchiveContent {
            reason: "info.plist 파일이 없습니다".to_string(),
        });
    }

    Ok(())
}

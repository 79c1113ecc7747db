//! 입력 처리 모듈
//!
//! 입력 경로 분류, 폴더/아카이브 입력 핸들러, 핸들러 생성을 담당합니다.
//! 모든 핸들러는 `prepare_input`으로 읽을 수 있는 폴더를 돌려주고
//! `cleanup`으로 자신이 만든 임시 자원을 정리합니다.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::archive;
use crate::error::{Result, SnippetConverterError};

/// 분류 단계에서 아카이브로 보는 확장자
pub const SNIPPET_ARCHIVE_EXTENSION: &str = "alfredsnippets";

/// 입력 경로 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// 스니펫 JSON 파일이 들어 있는 폴더
    Directory,
    /// `.alfredsnippets` 아카이브
    Archive,
    /// 지원하지 않는 입력
    Unsupported,
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputType::Directory => write!(f, "Directory"),
            InputType::Archive => write!(f, "Archive"),
            InputType::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// `~`, `~/...` 형태의 경로를 홈 디렉토리 기준으로 확장
///
/// 홈 디렉토리를 알 수 없으면 경로를 그대로 돌려줍니다.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// 입력 경로 분류
///
/// 확장자가 `alfredsnippets`이면 존재 여부와 관계없이 `Archive`입니다.
/// 그 외에는 존재하는 폴더일 때만 `Directory`입니다.
pub fn determine_input_type(path: &Path) -> InputType {
    let expanded = expand_tilde(path);

    let is_archive_extension = expanded
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(SNIPPET_ARCHIVE_EXTENSION))
        .unwrap_or(false);

    if is_archive_extension {
        InputType::Archive
    } else if expanded.is_dir() {
        InputType::Directory
    } else {
        InputType::Unsupported
    }
}

/// 폴더 입력 핸들러 (정리할 자원 없음)
#[derive(Debug, Clone)]
pub struct DirectoryInputHandler {
    directory_path: PathBuf,
}

impl DirectoryInputHandler {
    pub fn new(directory_path: impl Into<PathBuf>) -> Self {
        Self {
            directory_path: directory_path.into(),
        }
    }

    pub fn prepare_input(&self) -> Result<PathBuf> {
        let expanded = expand_tilde(&self.directory_path);

        if !expanded.exists() {
            return Err(SnippetConverterError::DirectoryNotFound { path: expanded });
        }

        if !expanded.is_dir() {
            return Err(SnippetConverterError::UnsupportedInputFormat { path: expanded });
        }

        Ok(expanded)
    }
}

/// 아카이브 입력 핸들러
///
/// 추출을 시도하는 순간 임시 폴더 하나를 소유하며, `cleanup` 또는
/// drop 시점에 삭제합니다. 추출된 폴더는 캐시되어 두 번째
/// `prepare_input` 호출은 다시 추출하지 않습니다.
#[derive(Debug)]
pub struct ArchiveInputHandler {
    archive_path: PathBuf,
    temp_root: Option<PathBuf>,
    temporary_directory: Option<TempDir>,
    /// 추출과 검증까지 끝났는지 여부
    extracted: bool,
}

impl ArchiveInputHandler {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
            temp_root: None,
            temporary_directory: None,
            extracted: false,
        }
    }

    /// 임시 폴더를 만들 상위 폴더 지정
    pub fn with_temp_root(mut self, temp_root: Option<PathBuf>) -> Self {
        self.temp_root = temp_root;
        self
    }

    /// 현재 소유 중인 임시 폴더
    pub fn temporary_directory(&self) -> Option<&Path> {
        self.temporary_directory.as_ref().map(|dir| dir.path())
    }

    pub fn prepare_input(&mut self) -> Result<PathBuf> {
        if let (true, Some(dir)) = (self.extracted, &self.temporary_directory) {
            return Ok(dir.path().to_path_buf());
        }

        let expanded = expand_tilde(&self.archive_path);

        if !expanded.exists() {
            return Err(SnippetConverterError::ZipFileNotFound { path: expanded });
        }

        if !archive::is_archive(&expanded) {
            return Err(SnippetConverterError::InvalidZipFile { path: expanded });
        }

        // 이전 실패에서 남은 임시 폴더 정리
        self.cleanup()?;

        let temp_dir = archive::create_temporary_directory(self.temp_root.as_deref())?;
        let extracted = temp_dir.path().to_path_buf();
        self.temporary_directory = Some(temp_dir);

        let outcome = archive::extract(&expanded, &extracted)
            .and_then(|_| archive::validate_extracted_content(&extracted));

        match outcome {
            Ok(()) => {
                self.extracted = true;
                debug!("아카이브 준비 완료: {}", expanded.display());
                Ok(extracted)
            }
            Err(e) => {
                if let Err(cleanup_error) = self.cleanup() {
                    warn!("임시 폴더 정리 실패: {}", cleanup_error);
                }
                Err(SnippetConverterError::ZipExtractionFailed {
                    source: Box::new(e),
                })
            }
        }
    }

    /// 임시 폴더 삭제 (실패하면 계속 소유하므로 다시 시도할 수 있음)
    pub fn cleanup(&mut self) -> Result<()> {
        let Some(temp_dir) = &self.temporary_directory else {
            return Ok(());
        };

        let path = temp_dir.path().to_path_buf();
        fs::remove_dir_all(&path).map_err(|e| SnippetConverterError::CleanupFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        // 이미 삭제됨 (drop 시 재삭제 오류는 무시됨)
        self.temporary_directory = None;
        self.extracted = false;
        debug!("임시 폴더 삭제: {}", path.display());
        Ok(())
    }
}

/// 입력 핸들러 (폴더 / 아카이브)
#[derive(Debug)]
pub enum InputHandler {
    Directory(DirectoryInputHandler),
    Archive(ArchiveInputHandler),
}

impl InputHandler {
    /// 읽을 수 있는 스니펫 폴더 경로 반환
    pub fn prepare_input(&mut self) -> Result<PathBuf> {
        match self {
            InputHandler::Directory(handler) => handler.prepare_input(),
            InputHandler::Archive(handler) => handler.prepare_input(),
        }
    }

    /// 임시 자원 정리 (여러 번 호출해도 안전)
    pub fn cleanup(&mut self) -> Result<()> {
        match self {
            InputHandler::Directory(_) => Ok(()),
            InputHandler::Archive(handler) => handler.cleanup(),
        }
    }

    pub fn input_type(&self) -> InputType {
        match self {
            InputHandler::Directory(_) => InputType::Directory,
            InputHandler::Archive(_) => InputType::Archive,
        }
    }
}

/// 경로 분류에 맞는 핸들러 생성
///
/// # Arguments
/// * `path` - 입력 경로
/// * `temp_root` - 아카이브 추출용 임시 폴더의 상위 폴더
pub fn create_handler(path: &Path, temp_root: Option<&Path>) -> Result<InputHandler> {
    match determine_input_type(path) {
        InputType::Directory => Ok(InputHandler::Directory(DirectoryInputHandler::new(path))),
        InputType::Archive => Ok(InputHandler::Archive(
            ArchiveInputHandler::new(path).with_temp_root(temp_root.map(Path::to_path_buf)),
        )),
        InputType::Unsupported => Err(SnippetConverterError::UnsupportedInputFormat {
            path: expand_tilde(path),
        }),
    }
}

/// 여러 입력 경로 사전 검증
///
/// 빈 목록과 중복 경로는 파일 시스템에 접근하기 전에 걸러냅니다.
/// 중복 판단은 `~` 확장 후의 경로로 합니다.
pub fn validate_inputs(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Err(SnippetConverterError::NoInputPathsProvided);
    }

    let unique: HashSet<PathBuf> = paths.iter().map(|p| expand_tilde(p)).collect();
    if unique.len() != paths.len() {
        return Err(SnippetConverterError::DuplicateInputPaths);
    }

    for path in paths {
        let expanded = expand_tilde(path);
        match determine_input_type(path) {
            InputType::Directory => {
                DirectoryInputHandler::new(path).prepare_input()?;
            }
            InputType::Archive => {
                if !expanded.exists() {
                    return Err(SnippetConverterError::ZipFileNotFound { path: expanded });
                }
                if !archive::is_archive(&expanded) {
                    return Err(SnippetConverterError::InvalidZipFile { path: expanded });
                }
            }
            InputType::Unsupported => {
                return Err(SnippetConverterError::UnsupportedInputFormat { path: expanded });
            }
        }
    }

    Ok(())
}

/// 입력 경로 검증 후 경로마다 핸들러 생성
pub fn create_handlers(paths: &[PathBuf], temp_root: Option<&Path>) -> Result<Vec<InputHandler>> {
    validate_inputs(paths)?;

    paths
        .iter()
        .map(|path| create_handler(path, temp_root))
        .collect()
}

//! 스니펫 레코드 모듈
//!
//! Alfred 스니펫 JSON 파일의 탐색, 읽기, 디코딩을 담당합니다.

use memmap2::Mmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SnippetConverterError};

/// 스니펫 레코드 파일 접미사 (대소문자 구분)
pub const SNIPPET_FILE_SUFFIX: &str = ".json";

/// 대용량 파일 기본 임계값 (이상이면 메모리 매핑 사용)
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 내보내기 JSON 파일의 최상위 구조
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub alfredsnippet: AlfredSnippet,
}

/// 스니펫 본문 (네 필드 모두 필수)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlfredSnippet {
    /// 확장될 텍스트
    pub snippet: String,
    /// 고유 ID
    pub uid: String,
    /// 표시 이름
    pub name: String,
    /// 트리거 키워드
    pub keyword: String,
}

/// 폴더 바로 아래의 `.json` 항목 목록 (하위 폴더는 탐색하지 않음)
///
/// 이름 접미사만으로 거르며 결과는 파일 이름 순입니다.
pub fn list_snippet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| SnippetConverterError::FileOpenError {
            file: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_snippet_file = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(SNIPPET_FILE_SUFFIX))
            .unwrap_or(false);

        if is_snippet_file {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// 단일 스니펫 JSON 파일 디코딩
///
/// # Arguments
/// * `path` - 스니펫 JSON 파일 경로
/// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑으로 읽음
pub fn decode_snippet(path: &Path, mmap_threshold: u64) -> Result<AlfredSnippet> {
    let file = File::open(path).map_err(|e| SnippetConverterError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

    let snippet: Snippet = if file_size >= mmap_threshold && file_size > 0 {
        parse_with_mmap(path, &file)?
    } else {
        parse_with_reader(path, file)?
    };

    Ok(snippet.alfredsnippet)
}

/// 여러 파일을 병렬로 디코딩
///
/// 결과 순서는 입력 순서와 같고, 실패 시 입력 순서상 첫 번째 에러를 돌려줍니다.
pub fn decode_snippets(paths: &[PathBuf], mmap_threshold: u64) -> Result<Vec<AlfredSnippet>> {
    let decoded: Vec<Result<AlfredSnippet>> = paths
        .par_iter()
        .map(|path| decode_snippet(path, mmap_threshold))
        .collect();

    debug!("{} 개 스니펫 파일 디코딩", decoded.len());
    decoded.into_iter().collect()
}

/// 버퍼 리더를 사용한 JSON 파싱
fn parse_with_reader(path: &Path, file: File) -> Result<Snippet> {
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| SnippetConverterError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path, file: &File) -> Result<Snippet> {
    let mmap = unsafe {
        Mmap::map(file).map_err(|e| SnippetConverterError::FileOpenError {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| SnippetConverterError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"{"alfredsnippet":{"snippet":"Hello World!","uid":"1","name":"Greeting","keyword":"hello"}}"#;

    #[test]
    fn test_decode_valid_snippet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        fs::write(&path, VALID).unwrap();

        let snippet = decode_snippet(&path, DEFAULT_MMAP_THRESHOLD).unwrap();
        assert_eq!(snippet.snippet, "Hello World!");
        assert_eq!(snippet.uid, "1");
        assert_eq!(snippet.name, "Greeting");
        assert_eq!(snippet.keyword, "hello");
    }

    #[test]
    fn test_decode_with_mmap() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        fs::write(&path, VALID).unwrap();

        let snippet = decode_snippet(&path, 1).unwrap();
        assert_eq!(snippet.keyword, "hello");
    }

    #[test]
    fn test_decode_missing_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        fs::write(
            &path,
            r#"{"alfredsnippet":{"snippet":"x","uid":"1","name":"n"}}"#,
        )
        .unwrap();

        assert!(matches!(
            decode_snippet(&path, DEFAULT_MMAP_THRESHOLD),
            Err(SnippetConverterError::ParseError { .. })
        ));
    }

    #[test]
    fn test_decode_type_mismatch_and_wrapper() {
        let temp_dir = TempDir::new().unwrap();
        let mismatch = temp_dir.path().join("mismatch.json");
        fs::write(
            &mismatch,
            r#"{"alfredsnippet":{"snippet":1,"uid":"1","name":"n","keyword":"k"}}"#,
        )
        .unwrap();
        let unwrapped = temp_dir.path().join("unwrapped.json");
        fs::write(
            &unwrapped,
            r#"{"snippet":"x","uid":"1","name":"n","keyword":"k"}"#,
        )
        .unwrap();

        assert!(decode_snippet(&mismatch, DEFAULT_MMAP_THRESHOLD).is_err());
        assert!(decode_snippet(&unwrapped, DEFAULT_MMAP_THRESHOLD).is_err());
    }

    #[test]
    fn test_decode_preserves_special_text() {
        let snippet = AlfredSnippet {
            snippet: "줄1\n\t탭 🎉 \u{0007}".to_string(),
            uid: String::new(),
            name: "이름".to_string(),
            keyword: String::new(),
        };
        let json = serde_json::to_string(&Snippet {
            alfredsnippet: snippet.clone(),
        })
        .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("special.json");
        fs::write(&path, json).unwrap();

        assert_eq!(decode_snippet(&path, DEFAULT_MMAP_THRESHOLD).unwrap(), snippet);
    }

    #[test]
    fn test_list_snippet_files_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.json"), VALID).unwrap();
        fs::write(temp_dir.path().join("a.json"), VALID).unwrap();
        fs::write(temp_dir.path().join("info.plist"), "").unwrap();
        fs::write(temp_dir.path().join("upper.JSON"), VALID).unwrap();
        let sub = temp_dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("c.json"), VALID).unwrap();

        let files = list_snippet_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_decode_snippets_reports_first_error() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("a.json");
        let bad1 = temp_dir.path().join("b.json");
        let bad2 = temp_dir.path().join("c.json");
        fs::write(&good, VALID).unwrap();
        fs::write(&bad1, "{broken").unwrap();
        fs::write(&bad2, "{}").unwrap();

        match decode_snippets(&[good, bad1.clone(), bad2], DEFAULT_MMAP_THRESHOLD) {
            Err(SnippetConverterError::ParseError { file, .. }) => assert_eq!(file, bad1),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

//! 컬렉션 메타데이터 모듈

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::input::{determine_input_type, expand_tilde, InputHandler, InputType};
use crate::snippet::list_snippet_files;

/// 파일 이름에 쓸 수 없는 문자
const INVALID_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// 입력 하나에 대한 컬렉션 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMetadata {
    /// 사용자가 지정한 원래 경로
    pub source_path: PathBuf,
    /// 정리된 컬렉션 이름 (접두사/파일 이름에 사용)
    pub collection_name: String,
    /// `.json` 스니펫 파일 수
    pub snippet_count: usize,
}

impl CollectionMetadata {
    /// 핸들러로 입력을 준비한 뒤 메타데이터 생성
    ///
    /// 아카이브 핸들러는 추출 결과를 캐시하므로 이후 변환 단계에서 다시 풀지 않습니다.
    pub fn create(original_path: &Path, handler: &mut InputHandler) -> Result<Self> {
        let directory = handler.prepare_input()?;
        let snippet_count = list_snippet_files(&directory)?.len();

        Ok(Self {
            source_path: original_path.to_path_buf(),
            collection_name: sanitize_collection_name(&collection_name_for(original_path)),
            snippet_count,
        })
    }
}

/// 원래 경로에서 컬렉션 이름 추출 (폴더 이름 또는 확장자를 뺀 아카이브 이름)
pub fn collection_name_for(original_path: &Path) -> String {
    let expanded = expand_tilde(original_path);

    let name = match determine_input_type(original_path) {
        InputType::Directory => expanded.file_name(),
        InputType::Archive => expanded.file_stem(),
        InputType::Unsupported => None,
    };

    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Collection".to_string())
}

/// 금지 문자(`\ / : * ? " < > |`)를 `_`로 바꿈
///
/// # Examples
/// ```
/// use snippet_converter::metadata::sanitize_collection_name;
///
/// assert_eq!(sanitize_collection_name("a/b:c"), "a_b_c");
/// ```
pub fn sanitize_collection_name(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

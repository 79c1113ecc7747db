//! 다중 입력 변환 모듈
//!
//! 여러 컬렉션을 하나의 plist로 병합하거나 컬렉션마다 별도 plist로 변환합니다.
//! 컬렉션은 순서대로 하나씩 처리하며, 첫 실패에서 중단합니다.
//! 이미 완성된 출력 파일은 되돌리지 않습니다.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::converter::{read_collection, ConvertOptions, SnippetConverter};
use crate::error::{Result, SnippetConverterError};
use crate::input::{create_handlers, expand_tilde, InputHandler};
use crate::metadata::CollectionMetadata;
use crate::stats::ConversionSummary;
use crate::writer::PlistWriter;

/// 기본 출력 확장자 (분리 모드에서 기본 이름에 확장자가 없을 때)
const DEFAULT_OUTPUT_EXTENSION: &str = "plist";

/// 출력 전략
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStrategy {
    /// 하나의 파일로 병합 (키워드에 `<컬렉션>_` 접두사)
    Merge { file_name: String },
    /// 컬렉션마다 `<기본이름>-<컬렉션>.<확장자>` 파일 생성
    Separate { base_file_name: String },
}

/// 분리 모드의 컬렉션별 출력 파일 이름
///
/// # Examples
/// ```
/// use snippet_converter::multi::separate_file_name;
///
/// assert_eq!(separate_file_name("out.plist", "Work"), "out-Work.plist");
/// assert_eq!(separate_file_name("out", "Work"), "out-Work.plist");
/// ```
pub fn separate_file_name(base_file_name: &str, collection_name: &str) -> String {
    let base = Path::new(base_file_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = base
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string());

    format!("{}-{}.{}", stem, collection_name, extension)
}

/// 소유한 핸들러를 drop 시점에 모두 정리하는 묶음
///
/// 정리 실패는 로그만 남기고 삼킵니다.
struct HandlerSet(Vec<InputHandler>);

impl Deref for HandlerSet {
    type Target = Vec<InputHandler>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HandlerSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for HandlerSet {
    fn drop(&mut self) {
        for handler in self.0.iter_mut() {
            if let Err(e) = handler.cleanup() {
                warn!("입력 정리 실패: {}", e);
            }
        }
    }
}

/// 다중 입력 변환기
#[derive(Debug, Clone)]
pub struct MultiSnippetConverter {
    input_paths: Vec<PathBuf>,
    output_strategy: OutputStrategy,
    output_destination: PathBuf,
    options: ConvertOptions,
}

impl MultiSnippetConverter {
    pub fn new(
        input_paths: Vec<PathBuf>,
        output_strategy: OutputStrategy,
        output_destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_paths,
            output_strategy,
            output_destination: output_destination.into(),
            options: ConvertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    fn run_merge_strategy(
        &self,
        handlers: &mut [InputHandler],
        collections: &[CollectionMetadata],
        file_name: &str,
    ) -> Result<ConversionSummary> {
        let destination = expand_tilde(&self.output_destination);
        let mut writer = PlistWriter::create(&destination, file_name, self.options.escape_xml)?;

        writer.write_header()?;

        let mut snippet_count = 0;
        for (handler, metadata) in handlers.iter_mut().zip(collections) {
            let directory = handler.prepare_input()?;
            let snippets = read_collection(&directory, &self.options)?;

            for snippet in &snippets {
                writer.write_entry(snippet, Some(&metadata.collection_name))?;
            }

            info!(
                "컬렉션 병합: {} ({} 개)",
                metadata.collection_name,
                snippets.len()
            );
            snippet_count += snippets.len();
        }

        writer.write_footer()?;

        Ok(ConversionSummary {
            collections: collections.len(),
            snippets: snippet_count,
            outputs: vec![writer.path().to_path_buf()],
            bytes_written: writer.bytes_written(),
        })
    }

    fn run_separate_strategy(
        &self,
        handlers: &mut [InputHandler],
        collections: &[CollectionMetadata],
        base_file_name: &str,
    ) -> Result<ConversionSummary> {
        let destination = expand_tilde(&self.output_destination);
        let mut summary = ConversionSummary::default();

        for (handler, metadata) in handlers.iter_mut().zip(collections) {
            let file_name = separate_file_name(base_file_name, &metadata.collection_name);
            let mut writer =
                PlistWriter::create(&destination, &file_name, self.options.escape_xml)?;

            let directory = handler.prepare_input()?;
            let snippets = read_collection(&directory, &self.options)?;

            writer.write_header()?;
            for snippet in &snippets {
                writer.write_entry(snippet, None)?;
            }
            writer.write_footer()?;

            info!(
                "컬렉션 저장: {} -> {}",
                metadata.collection_name,
                writer.path().display()
            );

            summary.absorb(ConversionSummary {
                collections: 1,
                snippets: snippets.len(),
                outputs: vec![writer.path().to_path_buf()],
                bytes_written: writer.bytes_written(),
            });
        }

        Ok(summary)
    }
}

impl SnippetConverter for MultiSnippetConverter {
    fn run(&mut self) -> Result<ConversionSummary> {
        if self.input_paths.is_empty() {
            return Err(SnippetConverterError::NoInputPathsProvided);
        }

        let mut handlers = HandlerSet(create_handlers(
            &self.input_paths,
            self.options.temp_root.as_deref(),
        )?);

        let collections = self
            .input_paths
            .iter()
            .zip(handlers.iter_mut())
            .map(|(path, handler)| CollectionMetadata::create(path, handler))
            .collect::<Result<Vec<_>>>()?;

        match &self.output_strategy {
            OutputStrategy::Merge { file_name } => {
                self.run_merge_strategy(&mut handlers, &collections, file_name)
            }
            OutputStrategy::Separate { base_file_name } => {
                self.run_separate_strategy(&mut handlers, &collections, base_file_name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_collection(root: &Path, name: &str, keyword: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        let json = serde_json::json!({
            "alfredsnippet": {
                "snippet": format!("{} phrase", name),
                "uid": keyword,
                "name": keyword,
                "keyword": keyword,
            }
        });
        fs::write(dir.join(format!("{}.json", keyword)), json.to_string()).unwrap();
        dir
    }

    #[test]
    fn test_separate_file_name() {
        assert_eq!(separate_file_name("out.plist", "A"), "out-A.plist");
        assert_eq!(separate_file_name("out", "A"), "out-A.plist");
        assert_eq!(separate_file_name("out.txt", "A"), "out-A.txt");
        assert_eq!(separate_file_name("a.b.plist", "A"), "a.b-A.plist");
    }

    #[test]
    fn test_run_empty_inputs() {
        let output = TempDir::new().unwrap();
        let mut converter = MultiSnippetConverter::new(
            vec![],
            OutputStrategy::Merge {
                file_name: "out.plist".to_string(),
            },
            output.path(),
        );

        assert!(matches!(
            converter.run(),
            Err(SnippetConverterError::NoInputPathsProvided)
        ));
    }

    #[test]
    fn test_merge_single_collection_still_prefixes() {
        let root = TempDir::new().unwrap();
        let a = write_collection(root.path(), "Solo", "k");

        let mut converter = MultiSnippetConverter::new(
            vec![a],
            OutputStrategy::Merge {
                file_name: "out.plist".to_string(),
            },
            root.path(),
        );
        let summary = converter.run().unwrap();

        assert_eq!(summary.collections, 1);
        let content = fs::read_to_string(root.path().join("out.plist")).unwrap();
        assert!(content.contains("<string>:Solo_k</string>"));
    }

    #[test]
    fn test_separate_invalid_extension() {
        let root = TempDir::new().unwrap();
        let a = write_collection(root.path(), "A", "k1");

        let mut converter = MultiSnippetConverter::new(
            vec![a],
            OutputStrategy::Separate {
                base_file_name: "out.txt".to_string(),
            },
            root.path(),
        );

        assert!(matches!(
            converter.run(),
            Err(SnippetConverterError::InvalidOutputFileType { .. })
        ));
        assert!(!root.path().join("out-A.txt").exists());
    }
}

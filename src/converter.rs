//! 단일 입력 변환 모듈
//!
//! 폴더 또는 아카이브 하나를 plist 파일 하나로 변환합니다.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::input::{create_handler, expand_tilde, InputHandler};
use crate::snippet::{decode_snippets, list_snippet_files, AlfredSnippet, DEFAULT_MMAP_THRESHOLD};
use crate::stats::ConversionSummary;
use crate::writer::PlistWriter;

/// 변환 실행 트레잇
pub trait SnippetConverter {
    /// 변환 실행 후 결과 요약 반환
    fn run(&mut self) -> Result<ConversionSummary>;
}

/// 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 본문/키워드의 XML 특수 문자 이스케이프 여부
    pub escape_xml: bool,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
    /// 아카이브 추출용 임시 폴더의 상위 폴더 (None이면 시스템 임시 폴더)
    pub temp_root: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            escape_xml: false,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            temp_root: None,
        }
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// XML 이스케이프 설정
    pub fn with_escape_xml(mut self, escape_xml: bool) -> Self {
        self.escape_xml = escape_xml;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    /// 임시 폴더 위치 설정
    pub fn with_temp_root(mut self, temp_root: Option<PathBuf>) -> Self {
        self.temp_root = temp_root;
        self
    }
}

/// 입력 출처 (경로 또는 미리 만든 핸들러)
#[derive(Debug)]
enum InputSource {
    Path(PathBuf),
    Handler(InputHandler),
}

/// 단일 입력 변환기
///
/// 키워드에 컬렉션 접두사를 붙이지 않습니다.
#[derive(Debug)]
pub struct DefaultSnippetConverter {
    source: InputSource,
    output_destination: PathBuf,
    output_file_name: String,
    options: ConvertOptions,
}

impl DefaultSnippetConverter {
    pub fn new(
        snippet_export_path: impl Into<PathBuf>,
        output_destination: impl Into<PathBuf>,
        output_file_name: impl Into<String>,
    ) -> Self {
        Self {
            source: InputSource::Path(snippet_export_path.into()),
            output_destination: output_destination.into(),
            output_file_name: output_file_name.into(),
            options: ConvertOptions::default(),
        }
    }

    pub fn with_handler(
        handler: InputHandler,
        output_destination: impl Into<PathBuf>,
        output_file_name: impl Into<String>,
    ) -> Self {
        Self {
            source: InputSource::Handler(handler),
            output_destination: output_destination.into(),
            output_file_name: output_file_name.into(),
            options: ConvertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// `~`를 확장한 최종 출력 경로
    pub fn output_path(&self) -> PathBuf {
        expand_tilde(&self.output_destination).join(&self.output_file_name)
    }
}

impl SnippetConverter for DefaultSnippetConverter {
    fn run(&mut self) -> Result<ConversionSummary> {
        let destination = expand_tilde(&self.output_destination);
        let mut writer =
            PlistWriter::create(&destination, &self.output_file_name, self.options.escape_xml)?;

        let mut created;
        let handler = match &mut self.source {
            InputSource::Handler(handler) => handler,
            InputSource::Path(path) => {
                created = create_handler(path, self.options.temp_root.as_deref())?;
                &mut created
            }
        };

        let result = convert_collection(handler, &mut writer, &self.options);

        if let Err(e) = handler.cleanup() {
            warn!("입력 정리 실패: {}", e);
        }

        let snippets = result?;
        info!("{} 개 스니펫 저장: {}", snippets, writer.path().display());

        Ok(ConversionSummary {
            collections: 1,
            snippets,
            outputs: vec![writer.path().to_path_buf()],
            bytes_written: writer.bytes_written(),
        })
    }
}

fn convert_collection(
    handler: &mut InputHandler,
    writer: &mut PlistWriter,
    options: &ConvertOptions,
) -> Result<usize> {
    let directory = handler.prepare_input()?;
    let snippets = read_collection(&directory, options)?;

    writer.write_header()?;
    for snippet in &snippets {
        writer.write_entry(snippet, None)?;
    }
    writer.write_footer()?;

    Ok(snippets.len())
}

/// 준비된 폴더의 스니펫 전체 디코딩
pub(crate) fn read_collection(
    directory: &Path,
    options: &ConvertOptions,
) -> Result<Vec<AlfredSnippet>> {
    let files = list_snippet_files(directory)?;
    decode_snippets(&files, options.mmap_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnippetConverterError;
    use crate::input::DirectoryInputHandler;
    use std::fs;
    use tempfile::TempDir;

    fn write_snippet(dir: &Path, file: &str, phrase: &str, keyword: &str) {
        let json = serde_json::json!({
            "alfredsnippet": {
                "snippet": phrase,
                "uid": file,
                "name": file,
                "keyword": keyword,
            }
        });
        fs::write(dir.join(file), json.to_string()).unwrap();
    }

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new()
            .with_escape_xml(true)
            .with_mmap_threshold(42)
            .with_temp_root(Some(PathBuf::from("/tmp")));

        assert!(options.escape_xml);
        assert_eq!(options.mmap_threshold, 42);
        assert_eq!(options.temp_root, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_run_with_handler() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_snippet(input.path(), "a.json", "Hello World!", "hello");

        let handler = InputHandler::Directory(DirectoryInputHandler::new(input.path()));
        let mut converter = DefaultSnippetConverter::with_handler(handler, output.path(), "out.plist");
        let summary = converter.run().unwrap();

        assert_eq!(summary.snippets, 1);
        let content = fs::read_to_string(output.path().join("out.plist")).unwrap();
        assert!(content.contains("<string>Hello World!</string>"));
        assert!(content.contains("<string>:hello</string>"));
        assert_eq!(summary.bytes_written, content.len() as u64);
    }

    #[test]
    fn test_run_unsupported_input_leaves_empty_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let file = input.path().join("notes.txt");
        fs::write(&file, "x").unwrap();

        let mut converter = DefaultSnippetConverter::new(&file, output.path(), "out.plist");
        assert!(matches!(
            converter.run(),
            Err(SnippetConverterError::UnsupportedInputFormat { .. })
        ));
        assert_eq!(fs::read(output.path().join("out.plist")).unwrap().len(), 0);
    }

    #[test]
    fn test_output_path_joins_destination() {
        let converter = DefaultSnippetConverter::new("/in", "/out", "x.plist");
        assert_eq!(converter.output_path(), PathBuf::from("/out/x.plist"));
    }
}

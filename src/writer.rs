//! plist 출력 모듈
//!
//! 출력 파일 이름 검증, 생성, 그리고 헤더/항목/푸터의 추가 쓰기를 담당합니다.

use quick_xml::escape::escape;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SnippetConverterError};
use crate::snippet::AlfredSnippet;

/// 출력 파일 확장자
pub const OUTPUT_EXTENSION: &str = ".plist";

/// 문서 헤더
///
/// `<array>` 뒤에 줄바꿈이 붙으므로 첫 `<dict>`는 새 줄에서 시작합니다.
pub const PLIST_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<array>
"#;

/// 문서 푸터 (`</plist>` 뒤 줄바꿈 포함, 파일은 개행으로 끝남)
pub const PLIST_FOOTER: &str = "</array>\n</plist>\n";

/// 출력 파일 이름이 `.plist`로 끝나는지 검사
pub fn validate_output_file_name(file_name: &str) -> Result<()> {
    if file_name.ends_with(OUTPUT_EXTENSION) {
        Ok(())
    } else {
        Err(SnippetConverterError::InvalidOutputFileType {
            file_name: file_name.to_string(),
        })
    }
}

/// 출력 경로가 아직 존재하지 않는지 검사
pub fn ensure_not_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Err(SnippetConverterError::FileAlreadyExists {
            path: path.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// 스니펫 하나를 plist `<dict>` 항목으로 변환
///
/// 키워드 앞에는 항상 `:`가 붙습니다. `escape_xml`이 꺼져 있으면 텍스트를 그대로 넣습니다.
pub fn format_entry(snippet: &AlfredSnippet, keyword_prefix: Option<&str>, escape_xml: bool) -> String {
    let keyword = match keyword_prefix {
        Some(prefix) => format!("{}_{}", prefix, snippet.keyword),
        None => snippet.keyword.clone(),
    };

    let (phrase, shortcut) = if escape_xml {
        (escape(snippet.snippet.as_str()).into_owned(), escape(keyword.as_str()).into_owned())
    } else {
        (snippet.snippet.clone(), keyword)
    };

    format!(
        "<dict>\n    <key>phrase</key>\n    <string>{}</string>\n    <key>shortcut</key>\n    <string>:{}</string>\n</dict>\n",
        phrase, shortcut
    )
}

/// 추가 쓰기 방식의 plist 작성기
///
/// 조각마다 파일을 append 모드로 열고 쓰고 닫습니다.
#[derive(Debug)]
pub struct PlistWriter {
    path: PathBuf,
    escape_xml: bool,
    bytes_written: u64,
}

impl PlistWriter {
    /// 이름/존재 여부를 검사하고 빈 출력 파일을 만든 뒤 작성기 반환
    ///
    /// # Arguments
    /// * `destination` - 출력 폴더 (`~` 확장이 끝난 경로)
    /// * `file_name` - `.plist`로 끝나는 파일 이름
    pub fn create(destination: &Path, file_name: &str, escape_xml: bool) -> Result<Self> {
        validate_output_file_name(file_name)?;

        let path = destination.join(file_name);
        ensure_not_exists(&path)?;

        File::create(&path).map_err(|e| SnippetConverterError::WriteError {
            file: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path,
            escape_xml,
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.append(PLIST_HEADER)
    }

    pub fn write_entry(&mut self, snippet: &AlfredSnippet, keyword_prefix: Option<&str>) -> Result<()> {
        let entry = format_entry(snippet, keyword_prefix, self.escape_xml);
        self.append(&entry)
    }

    pub fn write_footer(&mut self) -> Result<()> {
        self.append(PLIST_FOOTER)
    }

    fn append(&mut self, text: &str) -> Result<()> {
        let write_error = |e: std::io::Error| SnippetConverterError::WriteError {
            file: self.path.clone(),
            reason: e.to_string(),
        };

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;
        file.write_all(text.as_bytes()).map_err(write_error)?;

        self.bytes_written += text.len() as u64;
        Ok(())
    }
}

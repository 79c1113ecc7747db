//! snippet-converter - Alfred 스니펫 → plist 변환기
//!
//! Alfred에서 내보낸 스니펫 컬렉션(JSON 파일 폴더 또는 `.alfredsnippets` 아카이브)을
//! macOS 텍스트 대치용 plist 문서로 변환하는 라이브러리 및 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 📂 **폴더/아카이브 입력**: JSON 폴더와 `.alfredsnippets`(ZIP) 파일 모두 지원
//! - 🧹 **자동 정리**: 아카이브 추출용 임시 폴더는 성공/실패와 관계없이 삭제
//! - 🔀 **병합/분리 출력**: 여러 컬렉션을 하나로 병합하거나 컬렉션별 파일로 저장
//! - 🛡️ **덮어쓰기 방지**: 이미 존재하는 출력 파일은 절대 수정하지 않음
//! - 🚀 **병렬 디코딩**: Rayon으로 컬렉션 내 JSON 파일을 병렬 디코딩
//!
//! # 예제
//!
//! ```bash
//! # 단일 폴더 변환
//! snippet-converter ./Snippets -o snippets.plist
//!
//! # 여러 컬렉션 병합
//! snippet-converter ./Work ./Emoji.alfredsnippets --strategy merge -o all.plist
//! ```

pub mod archive;
pub mod cli;
pub mod converter;
pub mod error;
pub mod input;
pub mod metadata;
pub mod multi;
pub mod snippet;
pub mod stats;
pub mod writer;

// Re-exports for convenient access
pub use cli::{Args, StrategyMode};
pub use converter::{ConvertOptions, DefaultSnippetConverter, SnippetConverter};
pub use error::{Result, SnippetConverterError};
pub use input::{determine_input_type, InputHandler, InputType};
pub use metadata::CollectionMetadata;
pub use multi::{MultiSnippetConverter, OutputStrategy};
pub use snippet::{AlfredSnippet, Snippet};
pub use stats::{format_bytes, ConversionSummary};

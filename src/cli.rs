//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::multi::OutputStrategy;

/// 여러 입력을 받았을 때의 출력 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum StrategyMode {
    /// 하나의 plist로 병합 (키워드에 컬렉션 이름 접두사)
    #[default]
    Merge,
    /// 컬렉션마다 별도의 plist 생성
    Separate,
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyMode::Merge => write!(f, "Merge"),
            StrategyMode::Separate => write!(f, "Separate"),
        }
    }
}

/// snippet-converter CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "snippet-converter",
    author = "YourName <your@email.com>",
    version,
    about = "SNIPPET CONVERTER - Alfred 스니펫을 macOS 텍스트 대치 plist로 변환하는 CLI 도구",
    long_about = r#"
SNIPPET CONVERTER
=================

Alfred에서 내보낸 스니펫 폴더(JSON 파일들) 또는 .alfredsnippets 파일을
macOS 텍스트 대치용 plist 파일로 변환합니다.

특징:
  • 폴더와 .alfredsnippets 아카이브 모두 지원
  • 여러 컬렉션을 하나로 병합하거나 컬렉션별로 분리 저장
  • 기존 파일은 절대 덮어쓰지 않음

예제:
  snippet-converter ./Snippets
  snippet-converter ./Emoji.alfredsnippets -d ~/Documents -o emoji.plist
  snippet-converter ./Work ./Personal --strategy merge -o all.plist
  snippet-converter ./Work ./Personal --strategy separate -o snippets.plist
"#
)]
pub struct Args {
    /// 스니펫 JSON 파일이 있는 폴더 또는 .alfredsnippets 파일 (여러 개 가능)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// plist 파일을 저장할 폴더
    #[arg(short = 'd', long, default_value = "~/Desktop/")]
    pub output_destination: PathBuf,

    /// 출력 파일 이름 (분리 모드에서는 기본 이름)
    #[arg(short = 'o', long, default_value = "snippet-converter-output.plist")]
    pub output_file_name: String,

    /// 여러 입력의 출력 방식
    #[arg(short, long, value_enum, default_value_t = StrategyMode::Merge)]
    pub strategy: StrategyMode,

    /// 본문/키워드의 XML 특수 문자 이스케이프
    #[arg(long)]
    pub escape_xml: bool,

    /// 병렬 디코딩 스레드 수 (기본값: CPU 코어 수)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 입력 정보만 표시
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// 선택한 방식에 맞는 출력 전략 생성
    pub fn output_strategy(&self) -> OutputStrategy {
        match self.strategy {
            StrategyMode::Merge => OutputStrategy::Merge {
                file_name: self.output_file_name.clone(),
            },
            StrategyMode::Separate => OutputStrategy::Separate {
                base_file_name: self.output_file_name.clone(),
            },
        }
    }

    /// 입력이 여러 개인지 여부
    pub fn is_multi_input(&self) -> bool {
        self.inputs.len() > 1
    }
}

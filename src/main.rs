//! snippet-converter - Alfred 스니펫 → plist 변환기
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use snippet_converter::{
    cli::Args,
    converter::{ConvertOptions, DefaultSnippetConverter, SnippetConverter},
    input::{self, create_handler, determine_input_type, InputType},
    metadata::CollectionMetadata,
    multi::MultiSnippetConverter,
    stats::{print_summary, Stopwatch},
};

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    // 스레드 풀 설정
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("스레드 풀 초기화 실패")?;
    }

    // 입력 경로 확인
    validate_inputs(&args)?;

    // 헤더 출력
    print_header(&args);

    // 드라이런 모드
    if args.dry_run {
        return print_dry_run(&args);
    }

    run_conversion(&args)
}

/// 로그 초기화 (RUST_LOG 우선, 없으면 verbose 여부로 결정)
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,snippet_converter=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 입력 경로 유효성 검사
fn validate_inputs(args: &Args) -> Result<()> {
    for input in &args.inputs {
        if determine_input_type(input) == InputType::Unsupported {
            anyhow::bail!(
                "잘못된 입력입니다: {:?}. JSON 파일이 있는 폴더 또는 .alfredsnippets 파일을 지정하세요.",
                input
            );
        }
    }

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 SNIPPET CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());

    for input in &args.inputs {
        println!("  {} 입력: {:?}", "📂".bright_cyan(), input);
    }

    println!(
        "  {} 출력 폴더: {:?}",
        "📁".bright_green(),
        args.output_destination
    );
    println!(
        "  {} 출력 파일: {}",
        "📄".bright_green(),
        args.output_file_name
    );

    if args.is_multi_input() {
        println!("  {} 모드: {}", "⚙️".bright_yellow(), args.strategy);
    }

    if args.escape_xml {
        println!(
            "  {} {}",
            "✨".bright_magenta(),
            "XML 이스케이프 사용".magenta()
        );
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 드라이런 출력
fn print_dry_run(args: &Args) -> Result<()> {
    // 실제 다중 변환과 같은 입력 검사 (중복 경로 등)
    if args.is_multi_input() {
        input::validate_inputs(&args.inputs).context("입력 경로 검사 실패")?;
    }

    println!("\n{}", "📋 변환 예정 컬렉션:".bright_cyan());

    for (i, input) in args.inputs.iter().enumerate() {
        let metadata = describe_input(input)?;
        println!(
            "  {}. {} [{}] - 스니펫 {} 개",
            i + 1,
            metadata.collection_name.bright_white(),
            determine_input_type(input),
            metadata.snippet_count.to_string().bright_green()
        );
    }

    Ok(())
}

/// 입력 하나의 메타데이터 (아카이브는 임시로 풀었다가 정리)
fn describe_input(input: &Path) -> Result<CollectionMetadata> {
    let mut handler = create_handler(input, None)?;
    let metadata = CollectionMetadata::create(input, &mut handler);
    handler.cleanup()?;

    metadata.with_context(|| format!("입력을 읽을 수 없습니다: {:?}", input))
}

/// 변환 실행 (입력이 하나면 단일 변환기, 여러 개면 다중 변환기)
fn run_conversion(args: &Args) -> Result<()> {
    let options = ConvertOptions::new().with_escape_xml(args.escape_xml);
    let stopwatch = Stopwatch::start();
    let spinner = create_spinner();

    let result = if args.is_multi_input() {
        MultiSnippetConverter::new(
            args.inputs.clone(),
            args.output_strategy(),
            &args.output_destination,
        )
        .with_options(options)
        .run()
    } else {
        DefaultSnippetConverter::new(
            &args.inputs[0],
            &args.output_destination,
            args.output_file_name.as_str(),
        )
        .with_options(options)
        .run()
    };

    match result {
        Ok(summary) => {
            spinner.finish_with_message("완료!");
            print_summary(&summary, stopwatch.elapsed());
            println!("\n{} 변환 완료\n", "✅".bright_green());
            Ok(())
        }
        Err(e) => {
            spinner.abandon_with_message("실패");
            Err(e).context("스니펫 변환 실패")
        }
    }
}

/// 진행 스피너 생성
fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("스니펫 변환 중...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use snippet_converter::cli::StrategyMode;
    use snippet_converter::SnippetConverterError;
    use tempfile::TempDir;

    fn args_for(inputs: Vec<PathBuf>, destination: &Path) -> Args {
        Args {
            inputs,
            output_destination: destination.to_path_buf(),
            output_file_name: "out.plist".to_string(),
            strategy: StrategyMode::Merge,
            escape_xml: false,
            threads: None,
            verbose: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_validate_inputs_rejects_plain_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("notes.txt");
        fs::write(&file, "x").unwrap();

        let args = args_for(vec![file], temp_dir.path());
        assert!(validate_inputs(&args).is_err());
    }

    #[test]
    fn test_describe_input_counts_snippets() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("Work");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.json"), "{}").unwrap();
        fs::write(dir.join("b.txt"), "").unwrap();

        let metadata = describe_input(&dir).unwrap();
        assert_eq!(metadata.collection_name, "Work");
        assert_eq!(metadata.snippet_count, 1);
    }

    #[test]
    fn test_dry_run_rejects_duplicate_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("Work");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.json"), "{}").unwrap();

        let mut args = args_for(vec![dir.clone(), dir], temp_dir.path());
        args.dry_run = true;

        let err = print_dry_run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SnippetConverterError>(),
            Some(SnippetConverterError::DuplicateInputPaths)
        ));
    }

    #[test]
    fn test_run_conversion_single_input() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("Work");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("a.json"),
            r#"{"alfredsnippet":{"snippet":"hi","uid":"1","name":"n","keyword":"k"}}"#,
        )
        .unwrap();

        let args = args_for(vec![dir], temp_dir.path());
        run_conversion(&args).unwrap();

        let content = fs::read_to_string(temp_dir.path().join("out.plist")).unwrap();
        assert!(content.contains("<string>:k</string>"));
    }
}

//! 통계 및 유틸리티 모듈
//!
//! 변환 결과 요약 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// 변환 실행 결과 요약
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// 처리한 컬렉션 수
    pub collections: usize,
    /// 출력한 스니펫 수
    pub snippets: usize,
    /// 생성된 출력 파일
    pub outputs: Vec<PathBuf>,
    /// 쓴 총 바이트
    pub bytes_written: u64,
}

impl ConversionSummary {
    /// 다른 요약을 합침
    pub fn absorb(&mut self, other: ConversionSummary) {
        self.collections += other.collections;
        self.snippets += other.snippets;
        self.outputs.extend(other.outputs);
        self.bytes_written += other.bytes_written;
    }
}

/// 경과 시간 측정기
#[derive(Debug)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// 변환 통계 요약 출력
pub fn print_summary(summary: &ConversionSummary, elapsed: Duration) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 📊 변환 통계".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());

    println!(
        "  {} 컬렉션:      {}",
        "📁".bright_cyan(),
        summary.collections
    );
    println!(
        "  {} 스니펫:      {}",
        "✅".bright_green(),
        summary.snippets.to_string().green()
    );
    println!(
        "  {} 출력 파일:   {}",
        "📄".bright_yellow(),
        summary.outputs.len()
    );
    for output in &summary.outputs {
        println!("      {} {:?}", "•".bright_white(), output);
    }
    println!(
        "  {} 출력 용량:   {}",
        "📤".bright_magenta(),
        format_bytes(summary.bytes_written)
    );
    println!(
        "  {} 처리 시간:   {}",
        "⏱️".bright_cyan(),
        format_duration(elapsed)
    );

    println!("{}", "═".repeat(50).bright_blue());
}

/// 출력 파일 크기를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use snippet_converter::stats::format_bytes;
///
/// // 스니펫 몇 개짜리 plist
/// assert_eq!(format_bytes(812), "812 B");
/// // 큰 컬렉션 병합 결과
/// assert_eq!(format_bytes(3 * 1024 * 1024 / 2), "1.50 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

/// 변환 소요 시간 표시 (1초 미만은 ms, 1분 미만은 소수점 초)
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    match secs {
        0 => format!("{}ms", duration.subsec_millis()),
        1..=59 => format!("{:.3}초", duration.as_secs_f64()),
        60..=3599 => format!("{}분 {}초", secs / 60, secs % 60),
        _ => format!("{}시간 {}분", secs / 3600, (secs % 3600) / 60),
    }
}

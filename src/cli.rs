//! 명령행 인자 정의.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, Parser)]
#[command(
    name = "soil_density_lab",
    version,
    about = "Cálculos de laboratório de densidade de solos"
)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// 언어 (auto, pt-br, en-us)
    #[arg(short = 'L', long, global = true, default_value = "auto")]
    pub lang: String,

    /// 결과를 JSON으로 출력
    #[arg(long, global = true)]
    pub json: bool,

    /// 로그 레벨 (설정 파일보다 우선, RUST_LOG보다 후순위)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 캡슐별 함수비와 평균
    Moisture { input: PathBuf },
    /// 실린더법 현장 건조밀도
    InSitu { input: PathBuf },
    /// 피크노미터법 흙입자 밀도
    RealDensity { input: PathBuf },
    /// 최대/최소 건조밀도와 상대다짐도
    MaxMin { input: PathBuf },
    /// INMETRO 표 5 기준 저울 검정
    Scale { input: PathBuf },
    /// 온도별 물의 밀도
    WaterDensity {
        /// 온도 값. 생략하면 기본값(0.9982)을 쓴다.
        temperature: Option<f64>,
        /// 온도 단위 (C, K, F)
        #[arg(long, default_value = "C")]
        unit: String,
    },
    /// 메뉴 방식 대화형 입력
    Interactive,
}

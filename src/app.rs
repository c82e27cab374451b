use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::balance::{verify_scale, verify_scale_series, ScaleError};
use crate::cli::Command;
use crate::config::{Config, ConfigError, OutputFormat};
use crate::conversion::{self, ConversionError};
use crate::density::{
    compute_compaction, compute_in_situ, compute_max_min, compute_moisture, compute_real_density,
    CompactionInput, DensityError, InSituInput,
};
use crate::i18n::{self, Translator};
use crate::input::{
    load_input, InputFileError, MaxMinFile, MoistureFile, RealDensityFile, ScaleFile,
};
use crate::output::{self, MaxMinReport, TextReport, WaterDensityReport};
use crate::ui_cli::{self, MenuChoice};
use crate::units::water_density;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 입력 파일 오류
    #[error("입력 파일 오류: {0}")]
    InputFile(#[from] InputFileError),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    /// 밀도 계산 오류
    #[error("밀도 계산 오류: {0}")]
    Density(#[from] DensityError),
    /// 저울 검정 오류
    #[error("저울 검정 오류: {0}")]
    Scale(#[from] ScaleError),
    /// JSON 출력 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 대화형 입력 도중 표준 입력이 닫힘
    #[error("표준 입력이 닫혔습니다")]
    InputClosed,
}

/// 실행 문맥. 설정, 번역기, 출력 형식을 묶는다.
pub struct Session<'a> {
    pub config: &'a mut Config,
    pub config_path: &'a Path,
    pub tr: Translator,
    pub format: OutputFormat,
}

impl Session<'_> {
    pub(crate) fn emit<T: Serialize + TextReport>(&self, value: &T) -> Result<(), AppError> {
        println!("{}", output::render(self.format, &self.tr, value)?);
        Ok(())
    }
}

/// 하위 명령 하나를 실행한다.
pub fn execute(command: Command, session: &mut Session<'_>) -> Result<(), AppError> {
    info!(?command, "명령 실행");
    match command {
        Command::Moisture { input } => {
            let file: MoistureFile = load_input(&input)?;
            session.emit(&compute_moisture(&file.determinations)?)
        }
        Command::InSitu { input } => {
            let input: InSituInput = load_input(&input)?;
            session.emit(&compute_in_situ(&input)?)
        }
        Command::RealDensity { input } => {
            let file: RealDensityFile = load_input(&input)?;
            session.emit(&compute_real_density(&file.into_input()?)?)
        }
        Command::MaxMin { input } => {
            let file: MaxMinFile = load_input(&input)?;
            let report = max_min_report(&file, session.config)?;
            session.emit(&report)
        }
        Command::Scale { input } => match load_input::<ScaleFile>(&input)? {
            ScaleFile::Single(input) => session.emit(&verify_scale(&input)?),
            ScaleFile::Series(input) => session.emit(&verify_scale_series(&input)?),
        },
        Command::WaterDensity { temperature, unit } => {
            let temperature_c = temperature
                .map(|t| conversion::temperature_to_celsius(t, &unit))
                .transpose()?;
            session.emit(&WaterDensityReport {
                temperature_c,
                water_density: water_density(temperature_c),
            })
        }
        Command::Interactive => run_interactive(session),
    }
}

/// 최대/최소 밀도를 구하고 현장 건조밀도가 있으면 상대다짐도까지 계산한다.
pub fn max_min_report(file: &MaxMinFile, config: &Config) -> Result<MaxMinReport, AppError> {
    let densities = compute_max_min(&file.max_min)?;
    let compaction = if file.has_in_situ() {
        let input = CompactionInput {
            max_dry_density: densities.max.average,
            min_dry_density: densities.min.average,
            dry_density_top: file.dry_density_top,
            dry_density_base: file.dry_density_base,
            grain_density: file.grain_density,
        };
        Some(compute_compaction(&input, &config.compaction)?)
    } else {
        None
    };
    Ok(MaxMinReport {
        densities,
        compaction,
    })
}

/// 대화형 메뉴 루프. 계산 오류는 메뉴를 끝내지 않고 출력만 한다.
/// 표준 입력이 닫히면 종료로 본다.
pub fn run_interactive(session: &mut Session<'_>) -> Result<(), AppError> {
    loop {
        let choice = match ui_cli::main_menu(&session.tr) {
            Ok(choice) => choice,
            Err(AppError::InputClosed) => {
                info!("표준 입력 종료");
                break;
            }
            Err(e) => return Err(e),
        };
        let outcome = match choice {
            MenuChoice::Moisture => ui_cli::handle_moisture(session),
            MenuChoice::InSitu => ui_cli::handle_in_situ(session),
            MenuChoice::RealDensity => ui_cli::handle_real_density(session),
            MenuChoice::MaxMin => ui_cli::handle_max_min(session),
            MenuChoice::Scale => ui_cli::handle_scale(session),
            MenuChoice::WaterDensity => ui_cli::handle_water_density(session),
            MenuChoice::Settings => {
                ui_cli::handle_settings(session).and_then(|_| {
                    session.config.save(session.config_path)?;
                    println!("{}", session.tr.t(i18n::keys::SETTINGS_SAVED));
                    Ok(())
                })
            }
            MenuChoice::Exit => {
                println!("{}", session.tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        match outcome {
            Ok(()) => {}
            Err(AppError::InputClosed) => {
                info!("표준 입력 종료");
                break;
            }
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => println!("{}: {e}", session.tr.t(i18n::keys::ERROR_PREFIX)),
        }
    }
    Ok(())
}

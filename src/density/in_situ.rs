use serde::{Deserialize, Serialize};
use tracing::debug;

use super::moisture::average_of_positions;
use super::{density_from_reading, DensityError, DensityResult, MassVolumeReading, SamplePosition};
use crate::rounding::{mean, round, DENSITY_DECIMALS};

/// 실린더(코어 커터) 한 회의 측정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderDetermination {
    /// 실린더가 대표하는 위치
    pub position: SamplePosition,
    #[serde(flatten)]
    pub reading: MassVolumeReading,
}

/// 현장밀도 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InSituInput {
    /// 보통 2회(상부/하부)
    pub determinations: Vec<CylinderDetermination>,
    /// 상부 평균 함수비(%)
    pub moisture_top_percent: f64,
    /// 하부 평균 함수비(%)
    pub moisture_base_percent: f64,
}

/// 실린더 한 회의 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderLine {
    pub position: SamplePosition,
    /// 흙 질량(g)
    pub soil_mass: f64,
    #[serde(flatten)]
    pub density: DensityResult,
}

/// 현장밀도 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InSituResult {
    /// 건조밀도 보정에 쓴 함수비(상부/하부 평균, %)
    pub moisture_percent: f64,
    pub determinations: Vec<CylinderLine>,
    /// 전체 평균 건조밀도(g/cm³)
    pub average_dry_density: f64,
    pub dry_density_top: Option<f64>,
    pub dry_density_base: Option<f64>,
}

impl InSituResult {
    pub fn dry_density_at(&self, position: SamplePosition) -> Option<f64> {
        match position {
            SamplePosition::Top => self.dry_density_top,
            SamplePosition::Base => self.dry_density_base,
        }
    }
}

/// 현장 건조밀도를 구한다.
///
/// 회차별 함수비가 아니라 상부/하부 평균 함수비 하나를 모든 실린더에 똑같이 적용한다.
pub fn compute_in_situ(input: &InSituInput) -> Result<InSituResult, DensityError> {
    let moisture = average_of_positions(input.moisture_top_percent, input.moisture_base_percent);

    let mut lines = Vec::with_capacity(input.determinations.len());
    for det in &input.determinations {
        det.reading.validate()?;
        lines.push(CylinderLine {
            position: det.position,
            soil_mass: det.reading.soil_mass(),
            density: density_from_reading(&det.reading, moisture),
        });
    }

    let dry: Vec<f64> = lines.iter().map(|l| l.density.dry_unit_weight).collect();
    let average_dry_density = round(mean(&dry), DENSITY_DECIMALS);
    let at = |position: SamplePosition| -> Option<f64> {
        let values: Vec<f64> = lines
            .iter()
            .filter(|l| l.position == position)
            .map(|l| l.density.dry_unit_weight)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(round(mean(&values), DENSITY_DECIMALS))
        }
    };
    let dry_density_top = at(SamplePosition::Top);
    let dry_density_base = at(SamplePosition::Base);

    debug!(moisture, average_dry_density, "현장밀도 계산 완료");
    Ok(InSituResult {
        moisture_percent: moisture,
        determinations: lines,
        average_dry_density,
        dry_density_top,
        dry_density_base,
    })
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{unit_weight, DensityError, MassVolumeReading};
use crate::rounding::{mean, round, DENSITY_DECIMALS};

/// 최대/최소 건조밀도 시험 입력. 시험 방식에 따라 극값별 2~3회 측정한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxMinInput {
    pub max_determinations: Vec<MassVolumeReading>,
    pub min_determinations: Vec<MassVolumeReading>,
}

/// 극값 하나(최대 또는 최소)의 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityExtremum {
    /// 회차별 건조밀도(g/cm³)
    pub dry_densities: Vec<f64>,
    /// 평균 건조밀도(g/cm³)
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxMinResult {
    pub max: DensityExtremum,
    pub min: DensityExtremum,
}

fn extremum(readings: &[MassVolumeReading]) -> Result<DensityExtremum, DensityError> {
    let mut dry_densities = Vec::with_capacity(readings.len());
    for reading in readings {
        reading.validate()?;
        dry_densities.push(unit_weight(reading));
    }
    let average = round(mean(&dry_densities), DENSITY_DECIMALS);
    Ok(DensityExtremum {
        dry_densities,
        average,
    })
}

/// 최대·최소 건조밀도를 구한다. 건조 시료를 쓰므로 함수비 보정은 없다.
pub fn compute_max_min(input: &MaxMinInput) -> Result<MaxMinResult, DensityError> {
    let max = extremum(&input.max_determinations)?;
    let min = extremum(&input.min_determinations)?;
    debug!(max = max.average, min = min.average, "최대/최소 건조밀도 계산 완료");
    Ok(MaxMinResult { max, min })
}

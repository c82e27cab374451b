use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_non_negative, DensityError};
use crate::rounding::{mean, round, MASS_DECIMALS, MOISTURE_DECIMALS};

/// 캡슐 한 개의 함수비 측정값(g).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureDetermination {
    /// 캡슐 번호
    #[serde(default)]
    pub capsule_id: String,
    /// 습윤토+캡슐 질량
    pub wet_soil_plus_tare_mass: f64,
    /// 건조토+캡슐 질량
    pub dry_soil_plus_tare_mass: f64,
    /// 캡슐 질량
    pub tare_mass: f64,
}

/// 캡슐 한 개의 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureLine {
    pub capsule_id: String,
    /// 건조토 질량(g)
    pub dry_soil_mass: f64,
    /// 물 질량(g)
    pub water_mass: f64,
    /// 함수비(%)
    pub moisture_percent: f64,
}

/// 함수비 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureResult {
    pub determinations: Vec<MoistureLine>,
    /// 캡슐별 함수비의 산술 평균(%)
    pub average_percent: f64,
}

impl MoistureDetermination {
    fn compute(&self) -> Result<MoistureLine, DensityError> {
        ensure_non_negative("wet_soil_plus_tare_mass", self.wet_soil_plus_tare_mass)?;
        ensure_non_negative("dry_soil_plus_tare_mass", self.dry_soil_plus_tare_mass)?;
        ensure_non_negative("tare_mass", self.tare_mass)?;

        let dry_soil = self.dry_soil_plus_tare_mass - self.tare_mass;
        let water = self.wet_soil_plus_tare_mass - self.dry_soil_plus_tare_mass;
        let moisture = if dry_soil > 0.0 {
            water / dry_soil * 100.0
        } else {
            0.0
        };
        Ok(MoistureLine {
            capsule_id: self.capsule_id.clone(),
            dry_soil_mass: round(dry_soil, MASS_DECIMALS),
            water_mass: round(water, MASS_DECIMALS),
            moisture_percent: round(moisture, MOISTURE_DECIMALS),
        })
    }
}

/// 캡슐별 함수비와 평균을 구한다.
///
/// 편차에 따른 이상치 제거는 하지 않으며 모든 캡슐이 같은 가중치로 평균에 들어간다.
pub fn compute_moisture(
    determinations: &[MoistureDetermination],
) -> Result<MoistureResult, DensityError> {
    let lines = determinations
        .iter()
        .map(MoistureDetermination::compute)
        .collect::<Result<Vec<_>, _>>()?;
    let percents: Vec<f64> = lines.iter().map(|l| l.moisture_percent).collect();
    let average_percent = round(mean(&percents), MOISTURE_DECIMALS);
    debug!(count = lines.len(), average_percent, "함수비 계산 완료");
    Ok(MoistureResult {
        determinations: lines,
        average_percent,
    })
}

/// 상부/하부 평균 함수비의 평균. 현장밀도 계산에서 단일 보정값으로 쓴다.
pub fn average_of_positions(top_percent: f64, base_percent: f64) -> f64 {
    round((top_percent + base_percent) / 2.0, MOISTURE_DECIMALS)
}

//! 흙의 밀도 관련 계산 모듈을 모아둔다.
//! 함수비, 현장밀도, 흙입자 밀도(피크노미터), 최대/최소 밀도와 상대다짐도로 구성한다.

pub mod compaction;
pub mod in_situ;
pub mod max_min;
pub mod moisture;
pub mod real_density;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::rounding::{round, DENSITY_DECIMALS, MASS_DECIMALS};

pub use compaction::{
    compute_compaction, CompactionCriteria, CompactionInput, CompactionResult, PositionCompaction,
};
pub use in_situ::{compute_in_situ, CylinderDetermination, InSituInput, InSituResult};
pub use max_min::{compute_max_min, DensityExtremum, MaxMinInput, MaxMinResult};
pub use moisture::{
    average_of_positions, compute_moisture, MoistureDetermination, MoistureResult,
};
pub use real_density::{
    compute_real_density, PicnometerDetermination, RealDensityInput, RealDensityResult,
    REAL_DENSITY_TOLERANCE,
};

/// 밀도 계산 중 발생 가능한 오류.
///
/// 분모가 0이 되는 단순 밀도·함수비 계산은 오류 대신 0을 돌려주고,
/// 피크노미터 질량 수지나 밀도 범위가 성립하지 않는 경우만 오류로 올린다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DensityError {
    /// 음수이거나 유한하지 않은 입력값
    #[error("입력값 `{field}`이(가) 올바르지 않음: {value}")]
    InvalidInput { field: &'static str, value: f64 },
    /// 몰드 질량이 몰드+흙 질량보다 큼
    #[error("몰드 질량({mold} g)이 몰드+흙 질량({total} g)보다 큼")]
    MoldExceedsTotal { total: f64, mold: f64 },
    /// 피크노미터 질량 수지의 분모가 0 이하
    #[error("피크노미터 {determination}회차의 질량 수지가 0 이하: {denominator}")]
    NonPositivePicnometerBalance { determination: usize, denominator: f64 },
    /// 최대/최소 건조밀도가 같아 상대다짐도를 정의할 수 없음
    #[error("최대 건조밀도({max})와 최소 건조밀도({min})가 같음")]
    DegenerateDensityEnvelope { max: f64, min: f64 },
    /// 현장 건조밀도가 0 이하
    #[error("{position} 현장 건조밀도가 0 이하: {value}")]
    NonPositiveInSituDensity { position: SamplePosition, value: f64 },
}

impl DensityError {
    /// 입력 검증 오류가 아니라 입력 조합 자체가 계산 불가능한 경우인지 여부.
    pub fn is_computation_error(&self) -> bool {
        matches!(
            self,
            DensityError::NonPositivePicnometerBalance { .. }
                | DensityError::DegenerateDensityEnvelope { .. }
                | DensityError::NonPositiveInSituDensity { .. }
        )
    }
}

/// 시료 채취 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePosition {
    Top,
    Base,
}

impl SamplePosition {
    pub fn label(&self) -> &'static str {
        match self {
            SamplePosition::Top => "topo",
            SamplePosition::Base => "base",
        }
    }
}

impl fmt::Display for SamplePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 몰드(실린더) 한 번의 측정값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassVolumeReading {
    /// 몰드+흙 질량(g)
    pub mold_plus_soil_mass: f64,
    /// 몰드 질량(g)
    pub mold_mass: f64,
    /// 몰드 체적(cm³)
    pub volume: f64,
}

impl MassVolumeReading {
    /// 음수·NaN 입력과 몰드가 전체보다 무거운 경우를 걸러낸다.
    pub fn validate(&self) -> Result<(), DensityError> {
        ensure_non_negative("mold_plus_soil_mass", self.mold_plus_soil_mass)?;
        ensure_non_negative("mold_mass", self.mold_mass)?;
        ensure_non_negative("volume", self.volume)?;
        if self.mold_mass > self.mold_plus_soil_mass {
            return Err(DensityError::MoldExceedsTotal {
                total: self.mold_plus_soil_mass,
                mold: self.mold_mass,
            });
        }
        Ok(())
    }

    /// 흙 질량(g), 소수 2자리.
    pub fn soil_mass(&self) -> f64 {
        round(self.mold_plus_soil_mass - self.mold_mass, MASS_DECIMALS)
    }
}

/// 습윤/건조 단위중량(g/cm³).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityResult {
    pub wet_unit_weight: f64,
    pub dry_unit_weight: f64,
}

/// 흙 질량 / 체적. 체적이 0 이하이면 0을 돌려준다.
pub fn unit_weight(reading: &MassVolumeReading) -> f64 {
    if reading.volume > 0.0 {
        round(reading.soil_mass() / reading.volume, DENSITY_DECIMALS)
    } else {
        0.0
    }
}

/// 함수비(%)로 보정해 습윤·건조 단위중량을 구한다.
pub fn density_from_reading(reading: &MassVolumeReading, moisture_percent: f64) -> DensityResult {
    let wet = unit_weight(reading);
    DensityResult {
        wet_unit_weight: wet,
        dry_unit_weight: dry_from_wet(wet, moisture_percent),
    }
}

/// γ_d = γ / (1 + w/100). 분모가 0 이하가 되는 함수비(-100% 이하)는 0으로 처리한다.
pub(crate) fn dry_from_wet(wet: f64, moisture_percent: f64) -> f64 {
    let divisor = 1.0 + moisture_percent / 100.0;
    if divisor > 0.0 {
        round(wet / divisor, DENSITY_DECIMALS)
    } else {
        0.0
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), DensityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DensityError::InvalidInput { field, value })
    }
}

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ensure_non_negative, DensityError, InSituResult, MaxMinResult, SamplePosition};
use crate::rounding::{mean, round, DENSITY_DECIMALS, PERCENT_DECIMALS};
use crate::status::TestStatus;

/// 상대다짐도 합격 범위(%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionCriteria {
    pub min_relative_compactness_percent: f64,
    pub max_relative_compactness_percent: f64,
}

impl Default for CompactionCriteria {
    fn default() -> Self {
        Self {
            min_relative_compactness_percent: 0.0,
            max_relative_compactness_percent: 100.0,
        }
    }
}

impl CompactionCriteria {
    fn accepts(&self, percent: f64) -> bool {
        percent >= self.min_relative_compactness_percent
            && percent <= self.max_relative_compactness_percent
    }
}

/// 상대다짐도 계산 입력(g/cm³).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompactionInput {
    pub max_dry_density: f64,
    pub min_dry_density: f64,
    /// 상부 현장 건조밀도. 아직 없으면 `None`.
    #[serde(default)]
    pub dry_density_top: Option<f64>,
    #[serde(default)]
    pub dry_density_base: Option<f64>,
    /// 흙입자 밀도. 있으면 간극비를 함께 계산한다.
    #[serde(default)]
    pub grain_density: Option<f64>,
}

impl CompactionInput {
    /// 앞 단계 계산 결과를 묶어 입력을 만든다.
    pub fn from_results(
        max_min: &MaxMinResult,
        in_situ: Option<&InSituResult>,
        grain_density: Option<f64>,
    ) -> Self {
        Self {
            max_dry_density: max_min.max.average,
            min_dry_density: max_min.min.average,
            dry_density_top: in_situ.and_then(|r| r.dry_density_at(SamplePosition::Top)),
            dry_density_base: in_situ.and_then(|r| r.dry_density_at(SamplePosition::Base)),
            grain_density,
        }
    }
}

/// 위치별(상부/하부) 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionCompaction {
    pub position: SamplePosition,
    /// 현장 건조밀도(g/cm³)
    pub dry_density: f64,
    /// 상대다짐도(%)
    pub relative_compactness_percent: f64,
    /// 현장 간극비. 흙입자 밀도가 없으면 `None`.
    pub void_index: Option<f64>,
    pub status: TestStatus,
}

/// 상대다짐도 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionResult {
    pub max_dry_density: f64,
    pub min_dry_density: f64,
    /// `e_max = (γdmax − γdmin) / (γdmin · γdmax)`, 소수 4자리.
    pub void_ratio_max: f64,
    /// 밀도만으로는 정해지지 않는다. 흙입자 밀도가 있을 때 `ρs/γdmax − 1`.
    pub void_ratio_min: Option<f64>,
    /// `ρs/γdmin − 1`. 흙입자 밀도가 없으면 `None`.
    pub grain_void_ratio_max: Option<f64>,
    /// `ρs/γdmax − 1`. 흙입자 밀도가 없으면 `None`.
    pub grain_void_ratio_min: Option<f64>,
    pub top: Option<PositionCompaction>,
    pub base: Option<PositionCompaction>,
    /// 계산된 위치들의 평균 상대다짐도(%)
    pub relative_compaction_percent: Option<f64>,
    pub status: TestStatus,
}

const VOID_RATIO_DECIMALS: u32 = 3;
const VOID_RATIO_MAX_DECIMALS: u32 = 4;

fn void_ratio(grain_density: f64, dry_density: f64) -> f64 {
    round(grain_density / dry_density - 1.0, VOID_RATIO_DECIMALS)
}

/// 최대/최소 건조밀도와 현장 건조밀도로 상대다짐도(CR)를 구한다.
///
/// `CR = (γd − γdmin)·γdmax / (γd·(γdmax − γdmin))`, 상부와 하부를 따로 계산한다.
pub fn compute_compaction(
    input: &CompactionInput,
    criteria: &CompactionCriteria,
) -> Result<CompactionResult, DensityError> {
    let max = input.max_dry_density;
    let min = input.min_dry_density;
    ensure_non_negative("max_dry_density", max)?;
    ensure_non_negative("min_dry_density", min)?;
    if max <= min || min <= 0.0 {
        warn!(max, min, "최대/최소 건조밀도 범위가 성립하지 않음");
        return Err(DensityError::DegenerateDensityEnvelope { max, min });
    }
    let grain_density = match input.grain_density {
        Some(g) if !(g.is_finite() && g > 0.0) => {
            return Err(DensityError::InvalidInput {
                field: "grain_density",
                value: g,
            })
        }
        other => other,
    };

    let evaluate = |position: SamplePosition,
                    dry_density: Option<f64>|
     -> Result<Option<PositionCompaction>, DensityError> {
        let Some(gd) = dry_density else {
            return Ok(None);
        };
        if !(gd.is_finite() && gd > 0.0) {
            warn!(%position, gd, "현장 건조밀도가 0 이하");
            return Err(DensityError::NonPositiveInSituDensity {
                position,
                value: gd,
            });
        }
        let cr = (gd - min) * max / (gd * (max - min));
        let percent = round(cr * 100.0, PERCENT_DECIMALS);
        Ok(Some(PositionCompaction {
            position,
            dry_density: round(gd, DENSITY_DECIMALS),
            relative_compactness_percent: percent,
            void_index: grain_density.map(|g| void_ratio(g, gd)),
            status: TestStatus::from_check(criteria.accepts(percent)),
        }))
    };
    let top = evaluate(SamplePosition::Top, input.dry_density_top)?;
    let base = evaluate(SamplePosition::Base, input.dry_density_base)?;

    let computed: Vec<PositionCompaction> = top.iter().chain(base.iter()).copied().collect();
    let percents: Vec<f64> = computed
        .iter()
        .map(|p| p.relative_compactness_percent)
        .collect();
    let relative_compaction_percent = if percents.is_empty() {
        None
    } else {
        Some(round(mean(&percents), PERCENT_DECIMALS))
    };
    let status = TestStatus::combine(computed.iter().map(|p| p.status));
    debug!(?relative_compaction_percent, %status, "상대다짐도 계산 완료");

    let grain_void_ratio_min = grain_density.map(|g| void_ratio(g, max));
    Ok(CompactionResult {
        max_dry_density: max,
        min_dry_density: min,
        void_ratio_max: round((max - min) / (min * max), VOID_RATIO_MAX_DECIMALS),
        void_ratio_min: grain_void_ratio_min,
        grain_void_ratio_max: grain_density.map(|g| void_ratio(g, min)),
        grain_void_ratio_min,
        top,
        base,
        relative_compaction_percent,
        status,
    })
}

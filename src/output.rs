//! 계산 결과를 텍스트(번역 포함) 또는 JSON으로 출력한다.

use serde::Serialize;

use crate::balance::{ScaleSeriesResult, ScaleVerificationResult};
use crate::config::OutputFormat;
use crate::density::{
    CompactionResult, InSituResult, MaxMinResult, MoistureResult, PositionCompaction,
    RealDensityResult, SamplePosition, REAL_DENSITY_TOLERANCE,
};
use crate::i18n::{keys, Translator};
use crate::status::TestStatus;

/// 사람이 읽는 텍스트 보고서로 바꿀 수 있는 결과.
pub trait TextReport {
    fn render(&self, tr: &Translator) -> String;
}

/// 출력 형식에 맞춰 결과를 문자열로 만든다.
pub fn render<T: Serialize + TextReport>(
    format: OutputFormat,
    tr: &Translator,
    value: &T,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(value.render(tr)),
        OutputFormat::Json => serde_json::to_string_pretty(value),
    }
}

fn opt(tr: &Translator, value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => tr.t(keys::NOT_AVAILABLE).to_string(),
    }
}

fn status_line(tr: &Translator, status: TestStatus) -> String {
    tr.format(keys::RESULT_STATUS, &[("status", status.to_string())])
}

impl TextReport for MoistureResult {
    fn render(&self, tr: &Translator) -> String {
        let mut lines: Vec<String> = self
            .determinations
            .iter()
            .map(|d| {
                tr.format(
                    keys::RESULT_MOISTURE_LINE,
                    &[
                        ("id", d.capsule_id.clone()),
                        ("dry", format!("{:.2}", d.dry_soil_mass)),
                        ("water", format!("{:.2}", d.water_mass)),
                        ("moisture", format!("{:.1}", d.moisture_percent)),
                    ],
                )
            })
            .collect();
        lines.push(tr.format(
            keys::RESULT_MOISTURE_AVERAGE,
            &[("moisture", format!("{:.1}", self.average_percent))],
        ));
        lines.join("\n")
    }
}

impl TextReport for InSituResult {
    fn render(&self, tr: &Translator) -> String {
        let mut lines = vec![tr.format(
            keys::RESULT_MOISTURE_USED,
            &[("moisture", format!("{:.1}", self.moisture_percent))],
        )];
        for det in &self.determinations {
            lines.push(tr.format(
                keys::RESULT_CYLINDER_LINE,
                &[
                    ("position", det.position.to_string()),
                    ("soil", format!("{:.2}", det.soil_mass)),
                    ("wet", format!("{:.3}", det.density.wet_unit_weight)),
                    ("dry", format!("{:.3}", det.density.dry_unit_weight)),
                ],
            ));
        }
        lines.push(tr.format(
            keys::RESULT_AVERAGE_DRY_DENSITY,
            &[("value", format!("{:.3}", self.average_dry_density))],
        ));
        lines.push(tr.format(
            keys::RESULT_DRY_DENSITY_TOP,
            &[("value", opt(tr, self.dry_density_top, 3))],
        ));
        lines.push(tr.format(
            keys::RESULT_DRY_DENSITY_BASE,
            &[("value", opt(tr, self.dry_density_base, 3))],
        ));
        lines.join("\n")
    }
}

impl TextReport for RealDensityResult {
    fn render(&self, tr: &Translator) -> String {
        let mut lines: Vec<String> = self
            .determinations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                tr.format(
                    keys::RESULT_PICNOMETER_LINE,
                    &[
                        ("n", (i + 1).to_string()),
                        ("dry", format!("{:.2}", d.dry_soil_mass)),
                        ("water", format!("{:.4}", d.water_density)),
                        ("real", format!("{:.3}", d.real_density)),
                    ],
                )
            })
            .collect();
        lines.push(tr.format(
            keys::RESULT_REAL_AVERAGE,
            &[("value", format!("{:.3}", self.average))],
        ));
        lines.push(tr.format(
            keys::RESULT_REAL_DIFFERENCE,
            &[
                ("value", opt(tr, self.difference, 3)),
                ("limit", format!("{REAL_DENSITY_TOLERANCE:.2}")),
            ],
        ));
        lines.push(status_line(tr, self.status));
        lines.join("\n")
    }
}

impl TextReport for MaxMinResult {
    fn render(&self, tr: &Translator) -> String {
        let line = |label: &str, values: &[f64], average: f64| {
            let values = values
                .iter()
                .map(|v| format!("{v:.3}"))
                .collect::<Vec<_>>()
                .join(", ");
            tr.format(
                keys::RESULT_EXTREMUM_LINE,
                &[
                    ("label", label.to_string()),
                    ("values", values),
                    ("average", format!("{average:.3}")),
                ],
            )
        };
        [
            line("γdmax", &self.max.dry_densities, self.max.average),
            line("γdmin", &self.min.dry_densities, self.min.average),
        ]
        .join("\n")
    }
}

fn compaction_line(tr: &Translator, p: &PositionCompaction) -> String {
    tr.format(
        keys::RESULT_COMPACTNESS_LINE,
        &[
            ("position", p.position.to_string()),
            ("dry", format!("{:.3}", p.dry_density)),
            ("percent", format!("{:.1}", p.relative_compactness_percent)),
            ("void", opt(tr, p.void_index, 3)),
            ("status", p.status.to_string()),
        ],
    )
}

impl TextReport for CompactionResult {
    fn render(&self, tr: &Translator) -> String {
        let mut lines = vec![
            tr.format(
                keys::RESULT_VOID_RATIO_MAX,
                &[("value", format!("{:.4}", self.void_ratio_max))],
            ),
            tr.format(
                keys::RESULT_GRAIN_VOID_EXTREMA,
                &[
                    ("max", opt(tr, self.grain_void_ratio_max, 3)),
                    ("min", opt(tr, self.grain_void_ratio_min, 3)),
                ],
            ),
        ];
        for position in [SamplePosition::Top, SamplePosition::Base] {
            let result = match position {
                SamplePosition::Top => self.top.as_ref(),
                SamplePosition::Base => self.base.as_ref(),
            };
            if let Some(p) = result {
                lines.push(compaction_line(tr, p));
            }
        }
        lines.push(tr.format(
            keys::RESULT_COMPACTNESS_AVERAGE,
            &[("value", opt(tr, self.relative_compaction_percent, 1))],
        ));
        lines.push(status_line(tr, self.status));
        lines.join("\n")
    }
}

impl TextReport for ScaleVerificationResult {
    fn render(&self, tr: &Translator) -> String {
        tr.format(
            keys::RESULT_SCALE_LINE,
            &[
                ("load", format!("{}", self.load_in_e)),
                ("error", format!("{}", self.error_grams)),
                ("ema", format!("{}", self.ema_grams)),
                ("multiplier", format!("{:.1}", self.ema_multiplier)),
                ("status", self.status.to_string()),
            ],
        )
    }
}

impl TextReport for ScaleSeriesResult {
    fn render(&self, tr: &Translator) -> String {
        let mut lines: Vec<String> = self.points.iter().map(|p| p.render(tr)).collect();
        lines.push(status_line(tr, self.status));
        lines.join("\n")
    }
}

/// 최대/최소 밀도와 상대다짐도를 함께 출력할 때 쓰는 묶음.
#[derive(Debug, Clone, Serialize)]
pub struct MaxMinReport {
    pub densities: MaxMinResult,
    pub compaction: Option<CompactionResult>,
}

impl TextReport for MaxMinReport {
    fn render(&self, tr: &Translator) -> String {
        match &self.compaction {
            Some(c) => format!("{}\n{}", self.densities.render(tr), c.render(tr)),
            None => self.densities.render(tr),
        }
    }
}

/// 물의 밀도 단독 출력.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WaterDensityReport {
    pub temperature_c: Option<f64>,
    pub water_density: f64,
}

impl TextReport for WaterDensityReport {
    fn render(&self, tr: &Translator) -> String {
        tr.format(
            keys::RESULT_WATER_DENSITY,
            &[("value", format!("{:.4}", self.water_density))],
        )
    }
}

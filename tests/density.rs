use proptest::prelude::*;
use soil_density_lab::density::{
    compute_compaction, compute_in_situ, compute_max_min, compute_moisture, compute_real_density,
    density_from_reading, CompactionCriteria, CompactionInput, CylinderDetermination,
    DensityError, InSituInput, MassVolumeReading, MaxMinInput, MoistureDetermination,
    PicnometerDetermination, RealDensityInput, SamplePosition,
};
use soil_density_lab::rounding::round;
use soil_density_lab::TestStatus;

fn capsule(id: &str, wet: f64, dry: f64, tare: f64) -> MoistureDetermination {
    MoistureDetermination {
        capsule_id: id.to_string(),
        wet_soil_plus_tare_mass: wet,
        dry_soil_plus_tare_mass: dry,
        tare_mass: tare,
    }
}

fn reading(total: f64, mold: f64, volume: f64) -> MassVolumeReading {
    MassVolumeReading {
        mold_plus_soil_mass: total,
        mold_mass: mold,
        volume,
    }
}

fn picnometer(pic_soil_water: f64) -> PicnometerDetermination {
    PicnometerDetermination {
        picnometer_mass: 150.0,
        picnometer_plus_soil_plus_water_mass: pic_soil_water,
        picnometer_plus_water_mass: 650.0,
        temperature_c: Some(4.0),
        wet_soil_mass: 50.0,
    }
}

#[test]
fn moisture_per_capsule_and_average() {
    let res = compute_moisture(&[
        capsule("1", 70.0, 60.0, 10.0),
        capsule("2", 65.5, 57.0, 12.0),
        capsule("3", 80.0, 69.0, 14.0),
    ])
    .expect("moisture calc");
    let percents: Vec<f64> = res.determinations.iter().map(|d| d.moisture_percent).collect();
    assert_eq!(percents, vec![20.0, 18.9, 20.0]);
    assert_eq!(res.determinations[1].dry_soil_mass, 45.0);
    assert_eq!(res.determinations[1].water_mass, 8.5);
    assert_eq!(res.average_percent, 19.6);
}

#[test]
fn moisture_zero_dry_mass_is_zero_not_nan() {
    let res = compute_moisture(&[capsule("x", 20.0, 10.0, 10.0)]).expect("moisture calc");
    assert_eq!(res.determinations[0].moisture_percent, 0.0);
    assert_eq!(res.average_percent, 0.0);
}

#[test]
fn moisture_empty_list_averages_to_zero() {
    let res = compute_moisture(&[]).expect("moisture calc");
    assert!(res.determinations.is_empty());
    assert_eq!(res.average_percent, 0.0);
}

#[test]
fn moisture_rejects_negative_mass() {
    let err = compute_moisture(&[capsule("1", 70.0, -1.0, 10.0)]).unwrap_err();
    assert!(matches!(
        err,
        DensityError::InvalidInput {
            field: "dry_soil_plus_tare_mass",
            ..
        }
    ));
    assert!(!err.is_computation_error());
}

#[test]
fn in_situ_uses_single_average_moisture() {
    let input = InSituInput {
        determinations: vec![
            CylinderDetermination {
                position: SamplePosition::Top,
                reading: reading(5800.0, 2000.0, 2000.0),
            },
            CylinderDetermination {
                position: SamplePosition::Base,
                reading: reading(5700.0, 2000.0, 2000.0),
            },
        ],
        moisture_top_percent: 12.0,
        moisture_base_percent: 14.0,
    };
    let res = compute_in_situ(&input).expect("in-situ calc");
    assert_eq!(res.moisture_percent, 13.0);
    assert_eq!(res.determinations[0].soil_mass, 3800.0);
    assert_eq!(res.determinations[0].density.wet_unit_weight, 1.9);
    assert_eq!(res.determinations[0].density.dry_unit_weight, 1.681);
    assert_eq!(res.determinations[1].density.dry_unit_weight, 1.637);
    assert_eq!(res.dry_density_top, Some(1.681));
    assert_eq!(res.dry_density_base, Some(1.637));
    assert!((res.average_dry_density - 1.659).abs() < 1e-9);
}

#[test]
fn in_situ_zero_volume_defaults_to_zero() {
    let input = InSituInput {
        determinations: vec![CylinderDetermination {
            position: SamplePosition::Top,
            reading: reading(5800.0, 2000.0, 0.0),
        }],
        moisture_top_percent: 10.0,
        moisture_base_percent: 10.0,
    };
    let res = compute_in_situ(&input).expect("in-situ calc");
    assert_eq!(res.determinations[0].density.wet_unit_weight, 0.0);
    assert_eq!(res.determinations[0].density.dry_unit_weight, 0.0);
    assert_eq!(res.dry_density_base, None);
}

#[test]
fn in_situ_rejects_mold_heavier_than_total() {
    let input = InSituInput {
        determinations: vec![CylinderDetermination {
            position: SamplePosition::Base,
            reading: reading(1000.0, 2000.0, 1000.0),
        }],
        moisture_top_percent: 0.0,
        moisture_base_percent: 0.0,
    };
    assert!(matches!(
        compute_in_situ(&input),
        Err(DensityError::MoldExceedsTotal { .. })
    ));
}

#[test]
fn real_density_within_tolerance_is_approved() {
    let input = RealDensityInput {
        determinations: vec![picnometer(681.13), picnometer(681.20)],
        moisture_percent: 0.0,
    };
    let res = compute_real_density(&input).expect("real density calc");
    assert_eq!(res.determinations[0].real_density, 2.65);
    assert_eq!(res.determinations[1].real_density, 2.66);
    assert_eq!(res.determinations[0].water_density, 1.0);
    assert_eq!(res.difference, Some(0.01));
    assert!((res.average - 2.655).abs() < 1e-3);
    assert_eq!(res.status, TestStatus::Aprovado);
}

#[test]
fn real_density_outside_tolerance_is_rejected() {
    let input = RealDensityInput {
        determinations: vec![picnometer(681.13), picnometer(681.41)],
        moisture_percent: 0.0,
    };
    let res = compute_real_density(&input).expect("real density calc");
    assert_eq!(res.determinations[1].real_density, 2.69);
    assert_eq!(res.difference, Some(0.04));
    assert_eq!(res.status, TestStatus::Reprovado);
}

#[test]
fn real_density_moisture_reduces_dry_mass() {
    let mut det = picnometer(681.13);
    det.wet_soil_mass = 55.0;
    det.temperature_c = None;
    let res = compute_real_density(&RealDensityInput {
        determinations: vec![det],
        moisture_percent: 10.0,
    })
    .expect("real density calc");
    assert_eq!(res.determinations[0].dry_soil_mass, 50.0);
    assert_eq!(res.determinations[0].water_density, 0.9982);
    assert_eq!(res.difference, None);
    assert_eq!(res.status, TestStatus::Aguardando);
}

#[test]
fn real_density_non_positive_balance_is_an_error() {
    // 650 + 50 - 700 = 0
    let input = RealDensityInput {
        determinations: vec![picnometer(681.13), picnometer(700.0)],
        moisture_percent: 0.0,
    };
    let err = compute_real_density(&input).unwrap_err();
    assert!(matches!(
        err,
        DensityError::NonPositivePicnometerBalance {
            determination: 2,
            ..
        }
    ));
    assert!(err.is_computation_error());
}

#[test]
fn max_min_averages_determinations() {
    let res = compute_max_min(&MaxMinInput {
        max_determinations: vec![reading(5750.0, 4000.0, 1000.0), reading(5752.0, 4000.0, 1000.0)],
        min_determinations: vec![
            reading(5450.0, 4000.0, 1000.0),
            reading(5452.0, 4000.0, 1000.0),
            reading(5451.0, 4000.0, 1000.0),
        ],
    })
    .expect("max/min calc");
    assert_eq!(res.max.dry_densities, vec![1.75, 1.752]);
    assert!((res.max.average - 1.751).abs() < 1e-9);
    assert!((res.min.average - 1.451).abs() < 1e-9);
}

fn envelope(top: Option<f64>, base: Option<f64>, grain: Option<f64>) -> CompactionInput {
    CompactionInput {
        max_dry_density: 1.75,
        min_dry_density: 1.45,
        dry_density_top: top,
        dry_density_base: base,
        grain_density: grain,
    }
}

#[test]
fn relative_compactness_reference_example() {
    let res = compute_compaction(&envelope(Some(1.6), None, None), &CompactionCriteria::default())
        .expect("compaction calc");
    let top = res.top.expect("top computed");
    assert_eq!(top.relative_compactness_percent, 54.7);
    assert_eq!(top.void_index, None);
    assert!(res.base.is_none());
    assert_eq!(res.relative_compaction_percent, Some(54.7));
    assert_eq!(res.status, TestStatus::Aprovado);
}

#[test]
fn void_ratio_max_comes_from_density_extrema_alone() {
    let res = compute_compaction(&envelope(Some(1.6), None, None), &CompactionCriteria::default())
        .expect("compaction calc");
    assert_eq!(res.void_ratio_max, 0.1182);
    assert_eq!(res.void_ratio_min, None);
    assert_eq!(res.grain_void_ratio_max, None);
    assert_eq!(res.grain_void_ratio_min, None);

    let json = serde_json::to_value(&res).expect("json");
    assert_eq!(json["void_ratio_max"], serde_json::json!(0.1182));
}

#[test]
fn void_ratios_with_grain_density_agree_with_compactness() {
    let res = compute_compaction(
        &envelope(Some(1.6), Some(1.5), Some(2.65)),
        &CompactionCriteria::default(),
    )
    .expect("compaction calc");
    assert_eq!(res.void_ratio_max, 0.1182);
    let e_max = res.grain_void_ratio_max.expect("e_max");
    let e_min = res.grain_void_ratio_min.expect("e_min");
    assert_eq!(e_max, 0.828);
    assert_eq!(e_min, 0.514);
    assert_eq!(res.void_ratio_min, Some(e_min));
    let top = res.top.expect("top computed");
    assert_eq!(top.void_index, Some(0.656));
    let dr = (e_max - 0.656) / (e_max - e_min) * 100.0;
    assert!((dr - top.relative_compactness_percent).abs() < 0.5);
}

#[test]
fn compactness_outside_criteria_is_rejected() {
    let criteria = CompactionCriteria {
        min_relative_compactness_percent: 60.0,
        max_relative_compactness_percent: 100.0,
    };
    let res = compute_compaction(&envelope(Some(1.7), Some(1.6), None), &criteria)
        .expect("compaction calc");
    assert_eq!(res.top.expect("top").status, TestStatus::Aprovado);
    assert_eq!(res.base.expect("base").status, TestStatus::Reprovado);
    assert_eq!(res.status, TestStatus::Reprovado);
}

#[test]
fn compaction_without_in_situ_is_pending() {
    let res = compute_compaction(&envelope(None, None, None), &CompactionCriteria::default())
        .expect("compaction calc");
    assert_eq!(res.relative_compaction_percent, None);
    assert_eq!(res.status, TestStatus::Aguardando);
}

#[test]
fn equal_extrema_is_an_error_not_zero() {
    let mut input = envelope(Some(1.6), None, None);
    input.min_dry_density = 1.75;
    let err = compute_compaction(&input, &CompactionCriteria::default()).unwrap_err();
    assert!(matches!(err, DensityError::DegenerateDensityEnvelope { .. }));
    assert!(err.is_computation_error());
}

#[test]
fn zero_in_situ_density_is_an_error() {
    let err = compute_compaction(&envelope(None, Some(0.0), None), &CompactionCriteria::default())
        .unwrap_err();
    assert!(matches!(
        err,
        DensityError::NonPositiveInSituDensity {
            position: SamplePosition::Base,
            ..
        }
    ));
}

#[test]
fn in_situ_output_feeds_compaction_without_drift() {
    let in_situ = compute_in_situ(&InSituInput {
        determinations: vec![CylinderDetermination {
            position: SamplePosition::Top,
            reading: reading(5800.0, 2000.0, 2000.0),
        }],
        moisture_top_percent: 12.0,
        moisture_base_percent: 14.0,
    })
    .expect("in-situ calc");
    let max_min = compute_max_min(&MaxMinInput {
        max_determinations: vec![reading(5750.0, 4000.0, 1000.0)],
        min_determinations: vec![reading(5450.0, 4000.0, 1000.0)],
    })
    .expect("max/min calc");
    let input = CompactionInput::from_results(&max_min, Some(&in_situ), None);
    assert_eq!(input.dry_density_top, in_situ.dry_density_top);
    let res = compute_compaction(&input, &CompactionCriteria::default()).expect("compaction");
    assert_eq!(res.top.expect("top").dry_density, 1.681);
    assert_eq!(res.max_dry_density, 1.75);
}

proptest! {
    #[test]
    fn dry_never_exceeds_wet(
        mold in 0.0f64..5000.0,
        soil in 0.0f64..5000.0,
        volume in 1.0f64..3000.0,
        moisture in 0.0f64..100.0,
    ) {
        let r = reading(mold + soil, mold, volume);
        let d = density_from_reading(&r, moisture);
        prop_assert!(d.dry_unit_weight <= d.wet_unit_weight);
    }

    #[test]
    fn moisture_outputs_are_already_rounded(
        tare in 0.0f64..50.0,
        dry in 1.0f64..200.0,
        water in 0.0f64..80.0,
    ) {
        let res = compute_moisture(&[capsule("p", tare + dry + water, tare + dry, tare)]).unwrap();
        let line = &res.determinations[0];
        prop_assert!(line.moisture_percent.is_finite());
        prop_assert_eq!(round(line.moisture_percent, 1), line.moisture_percent);
        prop_assert_eq!(round(res.average_percent, 1), res.average_percent);
    }
}

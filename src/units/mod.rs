//! 단위 정의 및 변환 모듈 모음.

pub mod mass;
pub mod temperature;
pub mod water;

pub use mass::{convert_mass, kg_to_g, MassUnit};
pub use temperature::{convert_temperature, TemperatureUnit};
pub use water::{water_density, DEFAULT_WATER_DENSITY};

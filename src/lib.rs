//! 흙 밀도 시험 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 성적서/API 계층에서도 그대로 쓴다.

pub mod app;
pub mod balance;
pub mod cli;
pub mod config;
pub mod conversion;
pub mod density;
pub mod i18n;
pub mod input;
pub mod output;
pub mod rounding;
pub mod status;
pub mod ui_cli;
pub mod units;

pub use status::TestStatus;

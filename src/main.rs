use clap::Parser;
use std::process::ExitCode;

use soil_density_lab::app::{self, Session};
use soil_density_lab::cli::{Cli, Command};
use soil_density_lab::config::{self, LogFormat, OutputFormat};
use soil_density_lab::i18n::{self, Translator};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err((prefix, err)) => {
            eprintln!("{prefix}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), (String, app::AppError)> {
    let mut cfg = config::load_or_default(&cli.config)
        .map_err(|e| (early_error_prefix(&cli.lang), app::AppError::from(e)))?;
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    init_logging(&level, cfg.log_format);

    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    let prefix = tr.t(i18n::keys::ERROR_PREFIX).to_string();
    let format = if cli.json { OutputFormat::Json } else { cfg.output };

    let mut session = Session {
        config: &mut cfg,
        config_path: &cli.config,
        tr,
        format,
    };
    let command = cli.command.unwrap_or(Command::Interactive);
    app::execute(command, &mut session).map_err(|e| {
        tracing::error!(error = %e, "명령 실패");
        (prefix, e)
    })
}

/// 설정을 읽기 전의 오류 접두어. 명령행 언어만으로 고른다.
fn early_error_prefix(cli_lang: &str) -> String {
    let tr = Translator::new(&i18n::resolve_language(cli_lang, None));
    tr.t(i18n::keys::ERROR_PREFIX).to_string()
}

/// 로그 레벨과 형식에 맞춰 tracing 구독자를 설치한다. `RUST_LOG`가 있으면 그 값을 따른다.
fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // 결과는 stdout으로 나가므로 로그는 stderr로 보낸다.
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

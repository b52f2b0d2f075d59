use std::process::ExitCode;

use horoscope_relay::config::LogFormat;
use horoscope_relay::{Config, Server, Upstream, app, logger};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init(LogFormat::default());
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logger::init(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), horoscope_relay::Error> {
    info!(
        port = config.port,
        upstream = %config.upstream_url,
        timeout_secs = ?config.upstream_timeout_secs,
        "starting"
    );

    let upstream = Upstream::new(&config.upstream_url, config.upstream_timeout())?;
    Server::bind(config.addr()).serve(app::service(upstream)).await
}

use jamsocket_launcher::backend::jamsocket::JamsocketClient;
use jamsocket_launcher::config::LaunchConfig;
use jamsocket_launcher::errors::Result;
use jamsocket_launcher::launcher;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Real variables always take precedence over .env entries.
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match dotenv {
        Ok(path) => log::debug!("Loaded {}", path.display()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("⚠️  Could not load .env file: {}", e),
    }

    match run().await {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_configuration() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run() -> Result<String> {
    let config = LaunchConfig::from_env()?;
    log::debug!("Loaded {:?}", config);

    let api = JamsocketClient::from_config(reqwest::Client::new(), &config);
    launcher::launch(&api, &config).await
}

use peerchat_relay::config::LoggingConfig;
use peerchat_relay::tls::{TlsError, load_tls_acceptor};
use peerchat_relay::{RelayConfig, RelayServer};

const DEFAULT_CONFIG_FILE: &str = "relay_config.json";

#[tokio::main]
async fn main() {
    println!("Peerchat Relay - Starting...");

    let config = load_config();
    let logger = initialize_logger(&config.logging);
    logger.info("Peerchat relay starting...");

    let server = match RelayServer::bind(&config.server, logger.clone()).await {
        Ok(server) => server,
        Err(e) => {
            logger.error(&format!(
                "Cannot bind {}: {}",
                config.server.bind_addr(),
                e
            ));
            eprintln!("Cannot bind {}: {}", config.server.bind_addr(), e);
            std::process::exit(1);
        }
    };

    let server = if config.server.enable_tls {
        let acceptor = match &config.server.pkcs12_path {
            Some(path) => {
                let password = config.server.pkcs12_password.as_deref().unwrap_or("");
                load_tls_acceptor(path, password)
            }
            None => Err(TlsError::MissingCertificate),
        };
        match acceptor {
            Ok(acceptor) => {
                logger.info("TLS enabled");
                server.with_tls(acceptor)
            }
            Err(e) => {
                logger.error(&format!("Relay will NOT start: {}", e));
                eprintln!("Relay will NOT start: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        logger.warn("TLS is DISABLED - clients must use ws:// or a TLS-terminating proxy");
        server
    };

    if let Err(e) = server.run().await {
        logger.error(&format!("Relay error: {}", e));
        std::process::exit(1);
    }
}

fn initialize_logger(config: &LoggingConfig) -> logging::Logger {
    let log_level = config.log_level.parse().unwrap_or(logging::LogLevel::Info);

    match logging::Logger::with_component(
        config.log_file_path.clone().into(),
        log_level,
        "Relay".to_string(),
        config.enable_console,
    ) {
        Ok(logger) => {
            println!(
                "Logging initialized: {} (level: {})",
                config.log_file_path, log_level
            );
            logger
        }
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            std::process::exit(1);
        }
    }
}

/// Configuration sources, first hit wins:
/// 1. JSON text in the `CONFIG` environment variable
/// 2. File named by the first command-line argument
/// 3. `relay_config.json`
/// 4. Built-in defaults
fn load_config() -> RelayConfig {
    if let Ok(json) = std::env::var("CONFIG") {
        match RelayConfig::from_json(&json) {
            Ok(config) => {
                println!("Configuration loaded from CONFIG env as JSON string");
                return config;
            }
            Err(e) => eprintln!("CONFIG env is not valid JSON: {}", e),
        }
    }

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    match RelayConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration loaded from: {}", config_path);
            config
        }
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", config_path, e);
            eprintln!("Using default values...");
            RelayConfig::default()
        }
    }
}

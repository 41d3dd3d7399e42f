use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
#[cfg(not(feature = "raspberry-pi"))]
use lorawan_mac::radio::mock::MockRadioDriver;
#[cfg(feature = "raspberry-pi")]
use lorawan_mac::radio::raspberry_pi::RaspberryPiHal;
#[cfg(feature = "raspberry-pi")]
use lorawan_mac::radio::sx126x::Sx126xDriver;
use lorawan_mac::{
    init_logger, log_info, log_warn, Callbacks, Config, EngineError, JsonFileStore, MacEngine,
};

#[derive(Parser)]
#[command(name = "lorawan-mac")]
#[command(about = "LoRaWAN 1.0.2 end-device MAC layer CLI")]
struct Cli {
    /// Path to the device's TOML configuration file.
    #[arg(short, long, default_value = "lorawan-mac.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join the network via OTAA, retrying per the configured budget.
    Join,
    /// Join if needed, then send one uplink and exit.
    Send {
        /// Hex-encoded application payload.
        payload: String,
        #[arg(short, long)]
        confirmed: bool,
    },
    /// Join, then stay resident sending a periodic heartbeat uplink.
    Run {
        #[arg(short, long, default_value_t = 60)]
        interval_secs: u64,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] lorawan_mac::ConfigError),
    #[error(transparent)]
    Persistence(#[from] lorawan_mac::error::PersistenceError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
    #[cfg(feature = "raspberry-pi")]
    #[error("radio HAL initialization failed: {0}")]
    Hal(String),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_logger();
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    log::set_max_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info));

    let store = Arc::new(JsonFileStore::open(&config.persistence_path)?);
    let dev_eui = config.dev_eui_bytes()?;
    let app_eui = config.app_eui_bytes()?;
    let app_key = config.app_key_bytes()?;

    #[cfg(feature = "raspberry-pi")]
    let engine = {
        use lorawan_mac::radio::raspberry_pi::GpioPins;
        let pins = GpioPins {
            reset: config.radio.reset_pin,
            busy: config.radio.busy_pin,
            irq: config.radio.irq_pin,
            tx_enable: config.radio.tx_enable_pin,
            rx_enable: config.radio.rx_enable_pin,
        };
        let hal = RaspberryPiHal::new(config.radio.spi_bus_id, config.radio.spi_cs_id, pins)
            .map_err(|e| CliError::Hal(e.to_string()))?;
        let radio = Sx126xDriver::new(hal);
        MacEngine::new(radio, store, &dev_eui, &app_eui, &app_key, config.region).await?
    };
    #[cfg(not(feature = "raspberry-pi"))]
    let engine = MacEngine::new(
        MockRadioDriver::new(),
        store,
        &dev_eui,
        &app_eui,
        &app_key,
        config.region,
    )
    .await?;

    engine
        .set_callbacks(Callbacks {
            on_join: Some(Box::new(|status| {
                log_info(&format!("join finished: {status:?}"));
            })),
            on_transmit: Some(Box::new(|status| {
                log_info(&format!("transmit finished: {status:?}"));
            })),
            on_receive: Some(Box::new(|status, f_port, payload| {
                if matches!(status, lorawan_mac::ReceiveStatus::RxOk) {
                    log_info(&format!(
                        "received {} bytes on FPort {:?}: {}",
                        payload.len(),
                        f_port,
                        hex::encode(&payload)
                    ));
                } else {
                    log_warn(&format!("receive finished: {status:?}"));
                }
            })),
        })
        .await;

    match cli.command {
        Commands::Join => {
            engine.join(config.join_max_tries, false).await;
        }
        Commands::Send { payload, confirmed } => {
            engine.join(config.join_max_tries, false).await;
            let bytes = hex::decode(&payload)?;
            engine.transmit(&bytes, confirmed || config.confirmed_uplink_default).await;
        }
        Commands::Run { interval_secs } => {
            engine.join(config.join_max_tries, false).await;
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                if !engine.is_joined().await {
                    engine.join(config.join_max_tries, false).await;
                    continue;
                }
                engine
                    .transmit(b"heartbeat", config.confirmed_uplink_default)
                    .await;
            }
        }
    }

    Ok(())
}

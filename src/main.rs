use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;
use strata_input::haptics::{HapticActuator, LoggingActuator};
use strata_input::{Capabilities, InputAggregator, InputSettings};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = match InputSettings::default_path() {
        Some(path) => InputSettings::load_or_default(&path)?,
        None => InputSettings::default(),
    };

    let cancel = CancellationToken::new();
    let haptics: Arc<dyn HapticActuator> = Arc::new(LoggingActuator);

    #[cfg(feature = "gilrs")]
    let (aggregator, collector) = {
        use strata_input::controller::event_collector::{CollectorHandle, ControllerRoster};

        let roster = Arc::new(ControllerRoster::default());
        let capabilities = Capabilities {
            controllers: roster.clone(),
            haptics,
            ..Default::default()
        };
        let aggregator = Arc::new(InputAggregator::new(Some(settings), capabilities));
        let collector = CollectorHandle::spawn(aggregator.clone(), roster, cancel.clone())?;
        (aggregator, collector)
    };

    #[cfg(not(feature = "gilrs"))]
    let aggregator = {
        let capabilities = Capabilities {
            haptics,
            ..Default::default()
        };
        Arc::new(InputAggregator::new(Some(settings), capabilities))
    };

    info!("Device profile: {:?}", aggregator.device_profile());
    info!("Controllers: {:?}", aggregator.list_controllers());

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = aggregator.query_snapshot();
                info!(
                    "L:({:.2},{:.2}) R:({:.2},{:.2}) LT:{:.2} RT:{:.2} Touches:{}",
                    snapshot.left_stick.x,
                    snapshot.left_stick.y,
                    snapshot.right_stick.x,
                    snapshot.right_stick.y,
                    snapshot.triggers.left,
                    snapshot.triggers.right,
                    snapshot.touches.len()
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    cancel.cancel();
    #[cfg(feature = "gilrs")]
    collector.join().await;
    aggregator.teardown();

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

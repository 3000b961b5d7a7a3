use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use robo_lt_extension::{
    blocks::descriptor::ExtensionDescriptor, config::Config, extension::Extension,
    externals::{console::task::task_console_host, device::HttpTransport},
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let lang = Arc::new(config.language());

    if config.describe {
        let descriptor = ExtensionDescriptor::build(&*lang);
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    let transport = Arc::new(HttpTransport::new(&config.device_url, config.timeout())?);
    tracing::info!("Talking to the ROBO LT at {}.", config.device_url);

    let extension = Extension::load(transport, lang, config.poll_period());

    tokio::select! {
        _ = task_console_host(&extension) => {},
        res = signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!("Failed to listen for ctrl_c. Error: {}", e);
            }
        },
    }

    extension.unload().await;

    Ok(())
}

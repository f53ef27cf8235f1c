// src/main.rs
use anyhow::Context;
use laf_os::probe::{self, ProbeArgs};
use laf_os::SystemConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = ProbeArgs::parse(std::env::args().skip(1))?;

    let system = laf_os::create_system(SystemConfig::default()).context("creating the OS system")?;
    tracing::info!("Probing the {} platform", system.platform_name());
    let report = probe::run(&*system, &args);
    laf_os::dispose_instance();
    tracing::debug!("System disposed: {}", system.is_disposed());

    println!("{}", report.context("probing the platform")?);
    Ok(())
}

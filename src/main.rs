use screen_overlay::{run_overlay, OverlayConfig, OverlayError};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(target_os = "nto")]
fn backend() -> screen_overlay::screen::QnxScreen {
    screen_overlay::screen::QnxScreen::new()
}

#[cfg(not(target_os = "nto"))]
fn backend() -> screen_overlay::HeadlessScreen {
    log::warn!("⚠️ libscreen is not available on this target, using the headless compositor");
    screen_overlay::HeadlessScreen::new()
        .with_display(0, 1920, 1080)
        .with_idle_wait(true)
}

fn run() -> Result<(), OverlayError> {
    let mut config = OverlayConfig::from_env()?;
    config.apply_args(std::env::args().skip(1));
    config.validate()?;

    // Ctrl+C, SIGTERM and SIGHUP all stop the loop
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let events = run_overlay(backend(), &config, &running, &mut out)?;
    log::info!("👋 Shut down cleanly after {} event(s)", events);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        log::error!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

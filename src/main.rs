#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() -> windows::core::Result<()> {
    kswitcher::utils::tracing::init_tracing();

    let Some(_guard) = kswitcher::single_instance_guard()? else {
        tracing::info!(msg = "already_running");
        return Ok(());
    };

    kswitcher::platform::win::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("kswitcher hooks the Windows keyboard and only runs on Windows");
    std::process::exit(1);
}

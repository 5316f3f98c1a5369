//! Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use installkit::config::LauncherConfig;
use installkit::error::TransferError;
use installkit::host::{
    BoxFuture, FullInstallItem, InstallState, Notifier, ProgressItem, ProgressSurface,
};
use installkit::registry::ActiveTasks;
use installkit::transfer::{TransferState, Transport};
use installkit::{ComponentKind, InstallerServices, Launcher, Platform};
use parking_lot::Mutex;

// ============================================================================
// Recording hosts
// ============================================================================

#[derive(Default)]
pub struct RecordingSurface {
    pub items: Mutex<Vec<ProgressItem>>,
    pub stopped: Mutex<Vec<String>>,
    pub full_install: Mutex<Vec<Option<FullInstallItem>>>,
}

impl RecordingSurface {
    pub fn last_item(&self) -> Option<ProgressItem> {
        self.items.lock().last().cloned()
    }

    pub fn messages(&self) -> Vec<String> {
        self.items.lock().iter().map(|i| i.message.clone()).collect()
    }

    pub fn milestones(&self) -> Vec<Option<u8>> {
        self.full_install
            .lock()
            .iter()
            .map(|item| item.as_ref().map(|i| i.percent))
            .collect()
    }
}

impl ProgressSurface for RecordingSurface {
    fn add_progress_item(&self, item: &ProgressItem) {
        self.items.lock().push(item.clone());
    }

    fn stop_progress_item(&self, id: &str) {
        self.stopped.lock().push(id.to_string());
    }

    fn full_install_progress_item(&self, item: Option<&FullInstallItem>) {
        self.full_install.lock().push(item.cloned());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub installed: Mutex<Vec<String>>,
    pub failed: Mutex<Vec<(String, String)>>,
    pub notifications: Mutex<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn show_installed(&self, name: &str) {
        self.installed.lock().push(name.to_string());
    }

    fn show_failed_install(&self, name: &str, reason: &str) {
        self.failed
            .lock()
            .push((name.to_string(), reason.to_string()));
    }

    fn send_notification(&self, title: &str, body: &str) {
        self.notifications
            .lock()
            .push((title.to_string(), body.to_string()));
    }
}

// ============================================================================
// In-memory transport
// ============================================================================

#[derive(Clone)]
enum Response {
    Body(Vec<u8>),
    /// Write these bytes, then report the host as unreachable.
    FailAfter(Vec<u8>),
}

/// Serves canned archives by URL and records every fetch.
#[derive(Default)]
pub struct MemoryTransport {
    responses: Mutex<HashMap<String, Response>>,
    fetched: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: &str, body: Vec<u8>) -> Self {
        self.responses
            .lock()
            .insert(url.to_string(), Response::Body(body));
        self
    }

    pub fn fail(self, url: &str, partial: Vec<u8>) -> Self {
        self.responses
            .lock()
            .insert(url.to_string(), Response::FailAfter(partial));
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }

    async fn serve_fetch(
        &self,
        url: &str,
        dest: &Path,
        state: &TransferState,
    ) -> Result<u64, TransferError> {
        self.fetched.lock().push(url.to_string());
        let response = self.responses.lock().get(url).cloned();

        let io_err = |source: std::io::Error| TransferError::Io {
            path: dest.to_path_buf(),
            source,
        };
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        match response {
            Some(Response::Body(body)) => {
                let len = body.len() as u64;
                state.set_total(len);
                tokio::fs::write(dest, &body).await.map_err(io_err)?;
                state.add_bytes(len);
                Ok(len)
            }
            Some(Response::FailAfter(partial)) => {
                state.set_total(partial.len() as u64 * 4);
                tokio::fs::write(dest, &partial).await.map_err(io_err)?;
                state.add_bytes(partial.len() as u64);
                Err(TransferError::Unreachable(url.to_string()))
            }
            None => Err(TransferError::Status(404)),
        }
    }
}

impl Transport for MemoryTransport {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        state: &'a TransferState,
    ) -> BoxFuture<'a, Result<u64, TransferError>> {
        Box::pin(self.serve_fetch(url, dest, state))
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub launcher: Launcher,
    pub surface: Arc<RecordingSurface>,
    pub notifier: Arc<RecordingNotifier>,
    pub registry: Arc<ActiveTasks>,
    pub transport: Arc<MemoryTransport>,
}

/// A launcher with fast timings and recording hosts.
pub fn harness(
    config: LauncherConfig,
    transport: MemoryTransport,
    install_state: Arc<dyn InstallState>,
) -> Harness {
    let surface = Arc::new(RecordingSurface::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let registry = Arc::new(ActiveTasks::new());
    let transport = Arc::new(transport);

    let services = InstallerServices::new(
        surface.clone(),
        notifier.clone(),
        registry.clone(),
        install_state,
        transport.clone(),
    );
    let config = config
        .with_progress_interval(Duration::from_millis(10))
        .with_settle_delay(Duration::ZERO)
        .with_platform(Platform::Windows);

    Harness {
        launcher: Launcher::new(config, services),
        surface,
        notifier,
        registry,
        transport,
    }
}

/// Config rooted in `root` with the given download locations.
pub fn config_in(root: &Path, sources: &[(ComponentKind, &str)]) -> LauncherConfig {
    sources.iter().fold(
        LauncherConfig::new(root.join("install")).with_temp_dir(root.join("tmp")),
        |config, (component, url)| config.with_source(*component, *url),
    )
}

/// Zip archive holding `files`.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Number of entries in `dir`; zero when it does not exist.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

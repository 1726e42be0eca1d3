use crate::address::{read_identity, NodeIdentity};
use crate::config::LauncherConfig;
use crate::docker::ContainerRuntime;
use crate::env_file::{read_env_file, write_env_file};
use crate::errors::Result;
use crate::history::{build_plots, load_history, HistoryRecord, HistoryTracker, MetricPlot};
use crate::logs::{LogBuffer, LogLevel};
use crate::theme::Theme;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};

pub const LAUNCH_CONTAINER_BUTTON_TEXT: &str = "Launch Edge Node";
pub const STOP_CONTAINER_BUTTON_TEXT: &str = "Stop Edge Node";
pub const ADDRESS_NOT_FOUND_TEXT: &str = "Address file not found.";

/// Text of the node info box
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub address: String,
    pub name: String,
    pub uptime: String,
    pub epoch: String,
    pub epoch_avail: String,
}

impl Default for NodeInfo {
    fn default() -> Self {
        Self {
            address: String::new(),
            name: String::new(),
            uptime: "Up Time:".to_string(),
            epoch: "Epoch:".to_string(),
            epoch_avail: "Epoch avail:".to_string(),
        }
    }
}

/// Launcher state behind the window: everything but drawing
pub struct Launcher<R: ContainerRuntime> {
    config: LauncherConfig,
    runtime: R,
    theme: Theme,
    logs: LogBuffer,
    tracker: HistoryTracker,
    last_plot_data: Option<HistoryRecord>,
    plots: Vec<MetricPlot>,
    node: Option<NodeIdentity>,
    info: NodeInfo,
    container_running: bool,
    env_editor: Option<String>,
    last_refresh: Instant,
}

impl<R: ContainerRuntime> Launcher<R> {
    pub fn new(config: LauncherConfig, runtime: R) -> Self {
        let plots = build_plots(None, config.plot_limit);
        let mut launcher = Self {
            config,
            runtime,
            theme: Theme::default(),
            logs: LogBuffer::new(),
            tracker: HistoryTracker::new(),
            last_plot_data: None,
            plots,
            node: None,
            info: NodeInfo::default(),
            container_running: false,
            env_editor: None,
            last_refresh: Instant::now(),
        };

        launcher.refresh_local_address();
        launcher.plot_data();
        launcher.update_container_state();
        launcher
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn plots(&self) -> &[MetricPlot] {
        &self.plots
    }

    pub fn node(&self) -> Option<&NodeIdentity> {
        self.node.as_ref()
    }

    pub fn info(&self) -> &NodeInfo {
        &self.info
    }

    pub fn is_container_running(&self) -> bool {
        self.container_running
    }

    pub fn toggle_button_text(&self) -> &'static str {
        if self.container_running {
            STOP_CONTAINER_BUTTON_TEXT
        } else {
            LAUNCH_CONTAINER_BUTTON_TEXT
        }
    }

    pub fn add_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(level, message);
    }

    /// True once per refresh interval, counted from construction
    pub fn refresh_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_refresh) < self.config.refresh_interval {
            return false;
        }
        self.last_refresh = now;
        true
    }

    /// Time left until the next refresh is due
    pub fn until_next_refresh(&self, now: Instant) -> Duration {
        self.config
            .refresh_interval
            .saturating_sub(now.saturating_duration_since(self.last_refresh))
    }

    pub fn refresh_all(&mut self) {
        let t0 = Instant::now();
        self.refresh_local_address();
        let t1 = Instant::now();
        self.plot_data();
        let t2 = Instant::now();
        self.update_container_state();
        let t3 = Instant::now();

        self.add_log(
            LogLevel::Info,
            format!(
                "Time taken: {:.2}s (refresh_local_address), {:.2}s (plot_data), {:.2}s (update_toggle_button_text)",
                (t1 - t0).as_secs_f64(),
                (t2 - t1).as_secs_f64(),
                (t3 - t2).as_secs_f64(),
            ),
        );
    }

    pub fn refresh_local_address(&mut self) {
        let identity = match read_identity(&self.config.address_path()) {
            Ok(identity) => identity,
            Err(e) => {
                self.add_log(LogLevel::Warning, format!("Could not read address file: {}", e));
                None
            }
        };

        let Some(identity) = identity else {
            self.info.address = ADDRESS_NOT_FOUND_TEXT.to_string();
            self.info.name.clear();
            // Rebuild the labels when the file shows up again, even unchanged
            self.node = None;
            return;
        };

        let changed = self
            .node
            .as_ref()
            .map_or(true, |current| current.address != identity.address);
        if !changed {
            return;
        }

        self.info.address = format!("Addr: {}", identity.short_address());
        self.info.name = if identity.name.is_empty() {
            String::new()
        } else {
            format!("Name: {}", identity.name)
        };
        // The address file carries no runtime counters yet
        self.info.uptime = "Up Time: 0".to_string();
        self.info.epoch = "Epoch: 0".to_string();
        self.info.epoch_avail = "Epoch avail: 0".to_string();

        let message = format!("Local address updated: {} : {}", identity.address, identity.name);
        self.node = Some(identity);
        self.add_log(LogLevel::Info, message);
    }

    pub fn plot_data(&mut self) {
        match load_history(&self.config.history_path()) {
            Ok(Some(mut record)) => {
                if self.check_data(&mut record) {
                    self.plot_graphs(Some(record));
                }
            }
            Ok(None) => self.plot_graphs(None),
            Err(e) => self.add_log(LogLevel::Warning, format!("Could not load history: {}", e)),
        }
    }

    /// Trim and log a history that differs from the last one seen
    fn check_data(&mut self, record: &mut HistoryRecord) -> bool {
        if !self.tracker.check(record) {
            return false;
        }
        record.trim(self.config.max_history);

        let message = format!(
            "Data loaded & cleaned: {} timestamps from {} to {}",
            record.len(),
            record.first_timestamp().unwrap_or_default(),
            record.last_timestamp().unwrap_or_default(),
        );
        self.add_log(LogLevel::Info, message);
        true
    }

    /// Rebuild the charts from `data`, or from the cached dataset when `None`
    pub fn plot_graphs(&mut self, data: Option<HistoryRecord>) {
        if let Some(data) = data {
            self.last_plot_data = Some(data);
        }
        self.plots = build_plots(self.last_plot_data.as_ref(), self.config.plot_limit);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.plot_graphs(None);
    }

    pub fn update_container_state(&mut self) {
        match self.runtime.is_running() {
            Ok(running) => self.container_running = running,
            Err(e) => {
                self.container_running = false;
                self.add_log(LogLevel::Error, format!("Could not query container state: {}", e));
            }
        }
    }

    pub fn toggle_container(&mut self) {
        let result = if self.runtime_is_running() {
            self.add_log(LogLevel::Info, format!("Stopping {}", self.config.container_name));
            self.runtime.stop()
        } else {
            self.add_log(LogLevel::Info, format!("Launching {}", self.config.container_name));
            self.runtime.launch()
        };

        if let Err(e) = result {
            self.add_log(LogLevel::Error, e.to_string());
        }
        self.update_container_state();
    }

    fn runtime_is_running(&mut self) -> bool {
        self.update_container_state();
        self.container_running
    }

    /// Stop the node, wipe its local history and identity, then launch it again
    pub fn delete_and_restart(&mut self) {
        if self.runtime_is_running() {
            if let Err(e) = self.runtime.stop() {
                self.add_log(LogLevel::Error, e.to_string());
                self.update_container_state();
                return;
            }
        }

        // `--rm` cleanup runs after `stop` returns; the name must be free before relaunching
        if let Err(e) = self.runtime.remove() {
            self.add_log(LogLevel::Error, e.to_string());
            self.update_container_state();
            return;
        }

        for path in [self.config.history_path(), self.config.address_path()] {
            if let Err(e) = remove_if_exists(&path) {
                self.add_log(LogLevel::Error, format!("Could not delete {}: {}", path.display(), e));
            }
        }
        self.tracker.reset();
        self.last_plot_data = None;
        self.node = None;
        self.info = NodeInfo::default();
        self.plot_graphs(None);
        self.add_log(LogLevel::Info, "Local node data deleted, restarting");

        if let Err(e) = self.runtime.launch() {
            self.add_log(LogLevel::Error, e.to_string());
        }
        self.update_container_state();
        self.refresh_local_address();
    }

    /// Open the `.env` editor with the current file content
    pub fn edit_env_file(&mut self) {
        match read_env_file(&self.config.env_file) {
            Ok(content) => self.env_editor = Some(content),
            Err(e) => self.add_log(LogLevel::Error, format!("Could not read .env file: {}", e)),
        }
    }

    pub fn env_editor_mut(&mut self) -> Option<&mut String> {
        self.env_editor.as_mut()
    }

    pub fn close_env_editor(&mut self) {
        self.env_editor = None;
    }

    /// Write the editor content back and close the editor
    pub fn save_env_file(&mut self) -> Result<()> {
        let Some(content) = self.env_editor.take() else {
            return Ok(());
        };
        if let Err(e) = write_env_file(&self.config.env_file, &content) {
            self.add_log(LogLevel::Error, format!("Could not save .env file: {}", e));
            self.env_editor = Some(content);
            return Err(e);
        }
        self.add_log(LogLevel::Info, format!("Saved {}", self.config.env_file.display()));
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

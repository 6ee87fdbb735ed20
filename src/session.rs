use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use strum_macros::Display;

use crate::cancel::CancelToken;
use crate::capture::{backup_existing_csvs, CaptureFilter, CaptureSession};
use crate::command::CommandRunner;
use crate::config::Config;
use crate::display::{render_details, render_list, DisplayLoop};
use crate::interface::MonitorController;
use crate::menu::{prompt_selection, wait_for_enter, Selection};
use crate::scraper::AccessPointRecord;
use crate::status::MessageLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Init,
    InterfaceSelection,
    MonitorEnable,
    Scanning,
    ApSelection,
    ChannelSet,
    Focused,
    MonitorDisable,
    Terminal,
}

/// Keeps an interface in monitor mode for as long as it lives.
pub struct MonitorGuard<'a> {
    controller: MonitorController<'a>,
    original: String,
    iface: String,
    active: bool,
}

impl<'a> MonitorGuard<'a> {
    pub fn enable(controller: MonitorController<'a>, original: &str) -> Self {
        let iface = controller.enable(original);
        MonitorGuard {
            controller,
            original: original.to_string(),
            iface,
            active: true,
        }
    }

    pub fn iface(&self) -> &str {
        &self.iface
    }

    pub fn controller(&self) -> &MonitorController<'a> {
        &self.controller
    }

    /// Re-enable monitor mode if the monitor interface has disappeared.
    /// Returns true when it had to.
    pub fn ensure_present(&mut self) -> bool {
        if self.controller.is_present(&self.iface) {
            return false;
        }
        self.iface = self.controller.enable(&self.original);
        self.active = true;
        true
    }

    /// Leave monitor mode. Only the first call does anything.
    pub fn disable(&mut self) -> bool {
        if !self.active {
            return true;
        }
        self.active = false;
        self.controller.disable(&self.iface)
    }
}

impl Drop for MonitorGuard<'_> {
    fn drop(&mut self) {
        self.disable();
    }
}

/// The interactive survey, phase by phase.
pub struct Session<'a> {
    config: Config,
    runner: &'a dyn CommandRunner,
    cancel: CancelToken,
    history: Vec<Phase>,
    pub log: MessageLog,
}

impl<'a> Session<'a> {
    pub fn new(config: Config, runner: &'a dyn CommandRunner, cancel: CancelToken) -> Self {
        let log = MessageLog::new(!config.quiet, Some(100));
        Session {
            config,
            runner,
            cancel,
            history: vec![Phase::Init],
            log,
        }
    }

    pub fn phase(&self) -> Phase {
        self.history.last().copied().unwrap_or(Phase::Init)
    }

    /// Every phase entered so far, oldest first.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    fn transition(&mut self, phase: Phase) {
        self.log.status(format!("{} -> {}", self.phase(), phase));
        self.history.push(phase);
    }

    fn controller(&self) -> MonitorController<'a> {
        MonitorController::new(self.runner, self.config.monitor_settle)
    }

    pub fn backup_csvs(&mut self) -> Result<usize> {
        let moved = backup_existing_csvs(&self.config.workdir, &self.config.backup_dir)?;
        if moved > 0 {
            self.log.info(format!(
                "Moved {} old CSV file(s) into {}",
                moved, self.config.backup_dir
            ));
        }
        Ok(moved)
    }

    pub fn interfaces(&self) -> Vec<String> {
        self.controller().interfaces()
    }

    /// Prompt, treating a Ctrl+C seen while waiting as quitting.
    fn select<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
        prompt: &str,
        len: usize,
        allow_quit: bool,
    ) -> Result<Selection> {
        self.cancel.reset();
        let selection = prompt_selection(input, output, prompt, len, allow_quit)?;
        if self.cancel.is_cancelled() {
            return Ok(Selection::Quit);
        }
        Ok(selection)
    }

    /// Wait for Enter. False when input ended or Ctrl+C was pressed.
    fn confirm<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
        prompt: &str,
    ) -> Result<bool> {
        self.cancel.reset();
        let pressed = wait_for_enter(input, output, prompt)?;
        Ok(pressed && !self.cancel.is_cancelled())
    }

    /// Run a capture and show it until interrupted.
    pub fn watch<W: Write>(
        &mut self,
        output: &mut W,
        iface: &str,
        filter: Option<&CaptureFilter>,
        title: &str,
    ) -> Result<Vec<AccessPointRecord>> {
        self.cancel.reset();
        let mut capture = CaptureSession::start_airodump(
            self.runner,
            &self.config.workdir,
            &self.config.prefix,
            iface,
            filter,
            self.config.stop_timeout,
        )?;

        let display = DisplayLoop {
            workdir: &self.config.workdir,
            prefix: &self.config.prefix,
            interval: self.config.refresh_interval,
            title: title.to_string(),
            bssid: filter.map(|f| f.bssid.clone()),
        };
        let records = display
            .run(output, &self.cancel)
            .context("Failed to draw capture table")?;

        capture.stop();
        self.cancel.reset();
        Ok(records)
    }

    pub fn run<R: BufRead, W: Write>(
        &mut self,
        interfaces: &[String],
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        self.transition(Phase::InterfaceSelection);
        writeln!(output, "Detected wireless interfaces:")?;
        for (i, name) in interfaces.iter().enumerate() {
            writeln!(output, "{}: {}", i, name)?;
        }

        let chosen = match self.select(
            input,
            output,
            "Select interface index for passive scanning: ",
            interfaces.len(),
            false,
        )? {
            Selection::Index(idx) => interfaces[idx].clone(),
            Selection::Quit => {
                self.transition(Phase::Terminal);
                return Ok(());
            }
        };
        self.log.info(format!("Selected: {}", chosen));

        self.transition(Phase::MonitorEnable);
        self.log.info("Enabling monitor mode (airmon-ng may create a new interface)...");
        let mut monitor = MonitorGuard::enable(self.controller(), &chosen);
        self.log.priority(format!("Monitor interface: {}", monitor.iface()));

        self.transition(Phase::Scanning);
        self.log.info(
            "Starting airodump-ng (passive capture). Press Ctrl+C to stop scanning and choose an AP.",
        );
        let aps = self.watch(
            output,
            monitor.iface(),
            None,
            "Passive Wi-Fi scan (display only). Press Ctrl+C to stop and select an AP.",
        )?;
        writeln!(output)?;
        self.log.info("Scan stopped by user (Ctrl+C). Proceeding to AP selection...");

        if aps.is_empty() {
            self.log.warning("No APs captured. Cleaning up monitor mode and exiting.");
            self.shutdown(&mut monitor);
            return Ok(());
        }

        self.transition(Phase::ApSelection);
        writeln!(output, "\nDetected APs:")?;
        write!(output, "{}", render_list(&aps))?;
        let target = match self.select(
            input,
            output,
            "Choose AP index to inspect (or 'q' to quit): ",
            aps.len(),
            true,
        )? {
            Selection::Index(idx) => aps[idx].clone(),
            Selection::Quit => {
                writeln!(output, "Exiting.")?;
                self.shutdown(&mut monitor);
                return Ok(());
            }
        };

        writeln!(output, "\nAP details (passive observation only):")?;
        write!(output, "{}", render_details(&target))?;
        if !self.confirm(input, output, "\nPress Enter to start a focused capture...")? {
            writeln!(output, "\nExiting.")?;
            self.shutdown(&mut monitor);
            return Ok(());
        }

        if monitor.ensure_present() {
            self.log.warning(format!(
                "Monitor interface went away, re-enabled as {}",
                monitor.iface()
            ));
        }

        self.transition(Phase::ChannelSet);
        self.log.info(format!("Switching to channel {}...", target.channel));
        if !monitor
            .controller()
            .set_channel(monitor.iface(), &target.channel)
        {
            self.log.warning(format!("Could not set channel {}", target.channel));
        }

        self.transition(Phase::Focused);
        let filter = CaptureFilter {
            bssid: target.bssid.clone(),
            channel: target.channel.clone(),
        };
        let title = format!(
            "Focused capture on {} ({}). Press Ctrl+C to stop.",
            target.essid, target.bssid
        );
        self.watch(output, monitor.iface(), Some(&filter), &title)?;
        writeln!(output)?;
        self.log.info("Focused capture stopped by user.");

        self.shutdown(&mut monitor);
        Ok(())
    }

    fn shutdown(&mut self, monitor: &mut MonitorGuard<'_>) {
        self.transition(Phase::MonitorDisable);
        self.log.info("Cleaning up monitor mode...");
        if !monitor.disable() {
            self.log.warning(format!("airmon-ng could not stop {}", monitor.iface()));
        }
        self.transition(Phase::Terminal);
    }
}

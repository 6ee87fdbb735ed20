use crossterm::{cursor::MoveTo, queue, terminal::Clear, terminal::ClearType};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::capture::find_latest_csv;
use crate::scraper::{parse_access_points, AccessPointRecord};

const SLEEP_SLICE: Duration = Duration::from_millis(50);

pub fn render_table(records: &[AccessPointRecord]) -> String {
    let mut output = String::new();
    writeln!(output, "No | BSSID              | Channel | Power | ESSID").ok();
    writeln!(
        output,
        "---|--------------------|---------|-------|--------------------------"
    )
    .ok();
    for (i, ap) in records.iter().enumerate() {
        writeln!(
            output,
            "{:2} | {:18} | {:7} | {:5} | {}",
            i, ap.bssid, ap.channel, ap.power, ap.essid
        )
        .ok();
    }
    output
}

/// One line per record, as shown in the selection menu.
pub fn render_list(records: &[AccessPointRecord]) -> String {
    let mut output = String::new();
    for (i, ap) in records.iter().enumerate() {
        writeln!(
            output,
            "{}: {} ({}) channel {} power {}",
            i, ap.essid, ap.bssid, ap.channel, ap.power
        )
        .ok();
    }
    output
}

pub fn render_details(ap: &AccessPointRecord) -> String {
    format!(
        "ESSID : {}\nBSSID : {}\nChannel : {}\nPower : {}\n",
        ap.essid, ap.bssid, ap.channel, ap.power
    )
}

pub fn draw<W: Write>(out: &mut W, title: &str, records: &[AccessPointRecord]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(out, "{}\n\n{}", title, render_table(records))?;
    out.flush()
}

/// Sleep for `interval`, waking early when the token fires.
fn sleep_cancellable(interval: Duration, cancel: &CancelToken) {
    let deadline = Instant::now() + interval;
    while !cancel.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

pub struct DisplayLoop<'a> {
    pub workdir: &'a Path,
    pub prefix: &'a str,
    pub interval: Duration,
    pub title: String,
    /// Only show this BSSID when set.
    pub bssid: Option<String>,
}

impl<'a> DisplayLoop<'a> {
    fn refresh(&self, records: &mut Vec<AccessPointRecord>) {
        if let Some(latest) = find_latest_csv(self.workdir, self.prefix) {
            let mut found = parse_access_points(&latest);
            if let Some(bssid) = &self.bssid {
                found.retain(|ap| ap.bssid.eq_ignore_ascii_case(bssid));
            }
            *records = found;
        }
    }

    /// Redraw until `cancel` fires, then return the last records shown.
    ///
    /// The table is always read and drawn at least once.
    pub fn run<W: Write>(
        &self,
        out: &mut W,
        cancel: &CancelToken,
    ) -> io::Result<Vec<AccessPointRecord>> {
        let mut records = Vec::new();
        loop {
            self.refresh(&mut records);
            draw(out, &self.title, &records)?;
            sleep_cancellable(self.interval, cancel);
            if cancel.is_cancelled() {
                return Ok(records);
            }
        }
    }
}

// Wireless interface discovery and monitor mode control through external tools

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use crate::command::CommandRunner;

fn iwconfig_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(wlan[0-9]+|wl[a-z0-9]+|wlp[0-9s]+)").expect("valid regex"))
}

fn ip_link_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+:\s*([^:]+):").expect("valid regex"))
}

/// Names listed by `iw dev` ("Interface wlan0").
pub fn parse_iw_dev(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Interface"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// Leading tokens of `iwconfig` output that look like wireless devices.
pub fn parse_iwconfig(output: &str) -> BTreeSet<String> {
    let re = iwconfig_name();
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|token| re.is_match(token))
        .map(str::to_string)
        .collect()
}

/// `ip link` entries whose name starts with "wl".
pub fn parse_ip_link(output: &str) -> BTreeSet<String> {
    let re = ip_link_name();
    output
        .lines()
        .filter_map(|line| re.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
        .filter(|name| name.starts_with("wl"))
        .map(str::to_string)
        .collect()
}

/// List candidate wireless interfaces, sorted.
///
/// Tries `iw dev`, then `iwconfig`, then `ip link`, stopping at the first
/// tool that yields a name. A tool that fails or is missing is skipped.
pub fn detect_wireless_interfaces(runner: &dyn CommandRunner) -> Vec<String> {
    let tools: [(&str, &[&str], fn(&str) -> BTreeSet<String>); 3] = [
        ("iw", &["dev"], parse_iw_dev),
        ("iwconfig", &[], parse_iwconfig),
        ("ip", &["link"], parse_ip_link),
    ];

    for (program, args, parse) in tools {
        let output = runner.run(program, args);
        if !output.has_output() {
            continue;
        }
        let found = parse(&output.stdout);
        if !found.is_empty() {
            return found.into_iter().collect();
        }
    }

    Vec::new()
}

/// Pick the interface airmon-ng most likely created.
///
/// First name containing "mon" wins; otherwise the first listed name, or the
/// original when nothing is listed.
pub fn pick_monitor_interface(current: &[String], original: &str) -> String {
    current
        .iter()
        .find(|name| name.ends_with("mon") || name.contains("mon"))
        .or_else(|| current.first())
        .cloned()
        .unwrap_or_else(|| original.to_string())
}

pub struct MonitorController<'a> {
    runner: &'a dyn CommandRunner,
    settle: Duration,
}

impl<'a> MonitorController<'a> {
    pub fn new(runner: &'a dyn CommandRunner, settle: Duration) -> Self {
        MonitorController { runner, settle }
    }

    pub fn interfaces(&self) -> Vec<String> {
        detect_wireless_interfaces(self.runner)
    }

    /// Put `iface` into monitor mode and return the resulting interface name.
    pub fn enable(&self, iface: &str) -> String {
        // airmon-ng's exit status is unreliable, the re-enumeration decides
        self.runner.run("sudo", &["airmon-ng", "start", iface]);
        thread::sleep(self.settle);
        pick_monitor_interface(&self.interfaces(), iface)
    }

    pub fn disable(&self, iface: &str) -> bool {
        self.runner
            .run("sudo", &["airmon-ng", "stop", iface])
            .success()
    }

    pub fn is_present(&self, iface: &str) -> bool {
        self.interfaces().iter().any(|name| name == iface)
    }

    pub fn set_channel(&self, iface: &str, channel: &str) -> bool {
        self.runner
            .run("iwconfig", &[iface, "channel", channel])
            .success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IW_DEV: &str = "phy#0
\tInterface wlan0
\t\tifindex 3
\t\twdev 0x1
\t\taddr 00:c0:ca:11:22:33
\t\ttype managed
phy#1
\tInterface wlan1mon
\t\ttype monitor
";

    const IWCONFIG: &str = "lo        no wireless extensions.

eth0      no wireless extensions.

wlp3s0    IEEE 802.11  ESSID:off/any
          Mode:Managed  Access Point: Not-Associated
wlan1     IEEE 802.11  Mode:Monitor
";

    #[test]
    fn test_parse_iw_dev() {
        let names: Vec<String> = parse_iw_dev(IW_DEV).into_iter().collect();
        assert_eq!(names, vec!["wlan0", "wlan1mon"]);
    }

    #[test]
    fn test_parse_iwconfig() {
        let names: Vec<String> = parse_iwconfig(IWCONFIG).into_iter().collect();
        assert_eq!(names, vec!["wlan1", "wlp3s0"]);
    }

    #[test]
    fn test_parse_ip_link() {
        let output = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue
    link/loopback 00:00:00:00:00:00 brd 00:00:00:00:00:00
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500
3: wlan0: <BROADCAST,MULTICAST> mtu 1500 qdisc noop
4: wlx00c0ca112233: <BROADCAST,MULTICAST> mtu 1500
";
        let names: Vec<String> = parse_ip_link(output).into_iter().collect();
        assert_eq!(names, vec!["wlan0", "wlx00c0ca112233"]);
    }

    #[test]
    fn test_pick_monitor_interface() {
        let current = vec!["wlan0".to_string(), "wlan0mon".to_string()];
        assert_eq!(pick_monitor_interface(&current, "wlan0"), "wlan0mon");

        let current = vec!["wlan0".to_string(), "wlan1".to_string()];
        assert_eq!(pick_monitor_interface(&current, "wlan1"), "wlan0");

        assert_eq!(pick_monitor_interface(&[], "wlan1"), "wlan1");
    }

    #[test]
    fn test_patterns_compiled_once() {
        assert!(std::ptr::eq(iwconfig_name(), iwconfig_name()));
        assert!(std::ptr::eq(ip_link_name(), ip_link_name()));
    }

    #[test]
    fn test_substring_match_counts() {
        let current = vec!["mon0".to_string(), "wlan0".to_string()];
        assert_eq!(pick_monitor_interface(&current, "wlan0"), "mon0");
    }
}

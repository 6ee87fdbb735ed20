use csv::{ByteRecord, ReaderBuilder};
use itertools::Itertools;
use std::fs;
use std::path::Path;
use std::str;

const HEADER: &str = "BSSID";
const STATION_SECTION: &str = "Station MAC";

const COL_BSSID: usize = 0;
const COL_CHANNEL: usize = 3;
const COL_POWER: usize = 8;
const COL_ESSID: usize = 13;

/// One access point row from an airodump-ng CSV snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessPointRecord {
    pub bssid: String,
    pub channel: String,
    pub power: String,
    pub essid: String,
}

/// Decode `raw`, dropping byte sequences that are not valid UTF-8.
fn decode_ignoring_invalid(raw: &[u8]) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    loop {
        match str::from_utf8(rest) {
            Ok(valid) => {
                decoded.push_str(valid);
                return decoded;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                decoded.push_str(str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(after.len());
                rest = &after[skip..];
            }
        }
    }
}

fn column(row: &ByteRecord, idx: usize) -> String {
    row.get(idx)
        .map(|raw| decode_ignoring_invalid(raw).trim().to_string())
        .unwrap_or_default()
}

impl AccessPointRecord {
    fn from_row(row: &ByteRecord) -> Self {
        let field = |idx: usize| column(row, idx);
        AccessPointRecord {
            bssid: field(COL_BSSID),
            channel: field(COL_CHANNEL),
            power: field(COL_POWER),
            essid: field(COL_ESSID),
        }
    }
}

/// Access points from CSV text, in first-seen order.
///
/// Reading ends at the station section. Rows without a BSSID or ESSID are
/// dropped, and only the first row for each (BSSID, ESSID) pair is kept.
pub fn parse_access_points_bytes(data: &[u8]) -> Vec<AccessPointRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut aps = Vec::new();
    for result in reader.byte_records() {
        let Ok(row) = result else {
            continue;
        };
        if row.is_empty() {
            continue;
        }
        let first = column(&row, COL_BSSID);
        if first == STATION_SECTION {
            break;
        }
        if first == HEADER {
            continue;
        }
        let ap = AccessPointRecord::from_row(&row);
        if !ap.bssid.is_empty() && !ap.essid.is_empty() {
            aps.push(ap);
        }
    }

    aps.into_iter()
        .unique_by(|ap| (ap.bssid.clone(), ap.essid.clone()))
        .collect()
}

pub fn parse_access_points_str(data: &str) -> Vec<AccessPointRecord> {
    parse_access_points_bytes(data.as_bytes())
}

/// Access points from a snapshot file. Missing or unreadable files yield
/// nothing.
pub fn parse_access_points(path: &Path) -> Vec<AccessPointRecord> {
    match fs::read(path) {
        Ok(data) => parse_access_points_bytes(&data),
        Err(_) => Vec::new(),
    }
}

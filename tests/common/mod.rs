#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).expect("write gz");
    encoder.finish().expect("finish gz")
}

/// Writes `text` as `{root}/{day}.jsonl.gz`, e.g. `day = "2016/01/01"`.
pub fn write_partition(root: &Path, day: &str, text: &str) -> PathBuf {
    let path = root.join(format!("{day}.jsonl.gz"));
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    let mut file = File::create(&path).expect("create partition");
    file.write_all(&gzip(text)).expect("write partition");
    path
}

/// The twelve-event thermostat day used throughout the tests.
pub const THERMOSTAT_DAY: &str = r#"
{"changeTime": "2016-01-01T00:30:00.001059", "after": {"ambientTemp": 79.0}, "before": {"ambientTemp": 77.0}}
{"changeTime": "2016-01-01T00:43:00.001064", "after": {"ambientTemp": 80.0}, "before": {"ambientTemp": 79.0}}
{"changeTime": "2016-01-01T01:32:00.009816", "after": {"ambientTemp": 81.0}, "before": {"ambientTemp": 80.0}}
{"changeTime": "2016-01-01T01:38:00.001038", "after": {"ambientTemp": 82.0}, "before": {"ambientTemp": 81.0}}
{"changeTime": "2016-01-01T01:44:00.001145", "after": {"ambientTemp": 81.0}, "before": {"ambientTemp": 82.0}}
{"changeTime": "2016-01-01T02:08:30.010956", "after": {"ambientTemp": 79.0}, "before": {"ambientTemp": 81.0}}
{"changeTime": "2016-01-01T02:47:30.002413", "after": {"ambientTemp": 77.0}, "before": {"ambientTemp": 79.0}}
{"changeTime": "2016-01-01T03:02:30.001424", "after": {"ambientTemp": 78.0}, "before": {"ambientTemp": 77.0}}
{"changeTime": "2016-01-01T03:08:00.007712", "after": {"ambientTemp": 80.0}, "before": {"ambientTemp": 78.0}}
{"changeTime": "2016-01-01T03:12:30.008936", "after": {"ambientTemp": 79.0}, "before": {"ambientTemp": 80.0}}
{"changeTime": "2016-01-01T03:18:30.001950", "after": {"schedule": true}, "before": {"schedule": false}}
{"changeTime": "2016-01-01T03:24:30.001180", "after": {"setpoint": {"heatTemp": 67.0}}, "before": {"setpoint": {"heatTemp": 69.0}}}
"#;

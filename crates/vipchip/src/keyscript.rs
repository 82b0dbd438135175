use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use vipchip_core::PadKeys;

/// Scripted keypad input for headless runs.
///
/// Written as comma separated `FRAME=KEYS` entries, `KEYS` being hex
/// digits that are held from that frame on. An empty `KEYS` releases
/// everything: `10=5,12=,40=AF`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyScript {
    events: BTreeMap<u64, PadKeys>,
}

impl KeyScript {
    pub fn parse(script: &str) -> Result<Self> {
        let mut events = BTreeMap::new();
        for entry in script.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (frame, keys) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("key script entry '{entry}' is missing '='"))?;
            let frame: u64 = frame
                .trim()
                .parse()
                .with_context(|| format!("invalid frame number in '{entry}'"))?;
            let keys = parse_keys(keys.trim()).with_context(|| format!("in '{entry}'"))?;
            if events.insert(frame, keys).is_some() {
                bail!("frame {frame} is scripted twice");
            }
        }
        Ok(Self { events })
    }

    /// Key state that takes effect at `frame`, if the script changes it there.
    pub fn keys_at(&self, frame: u64) -> Option<PadKeys> {
        self.events.get(&frame).copied()
    }

    /// Frame of the last scripted change.
    pub fn last_frame(&self) -> Option<u64> {
        self.events.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromStr for KeyScript {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_keys(keys: &str) -> Result<PadKeys> {
    keys.chars().try_fold(PadKeys::empty(), |held, c| {
        let key = c
            .to_digit(16)
            .and_then(|digit| PadKeys::key(digit as u8))
            .ok_or_else(|| anyhow!("'{c}' is not a hex key"))?;
        Ok(held | key)
    })
}

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Last slider position per section, kept in memory for the page UI.
#[derive(Debug, Default)]
pub struct SliderStore {
    states: Mutex<BTreeMap<String, i64>>,
}

impl SliderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, section_id: &str, level: i64) -> anyhow::Result<()> {
        let mut states = self
            .states
            .lock()
            .map_err(|_| anyhow::anyhow!("slider state lock is poisoned"))?;
        states.insert(section_id.to_owned(), level);
        Ok(())
    }

    pub fn snapshot(&self) -> anyhow::Result<BTreeMap<String, i64>> {
        let states = self
            .states
            .lock()
            .map_err(|_| anyhow::anyhow!("slider state lock is poisoned"))?;
        Ok(states.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_update_wins() -> anyhow::Result<()> {
        let store = SliderStore::new();
        store.update("section-1", 0)?;
        store.update("section-2", 1)?;
        store.update("section-1", 2)?;
        let snapshot = store.snapshot()?;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["section-1"], 2);
        assert_eq!(snapshot["section-2"], 1);
        Ok(())
    }
}

use std::future::Future;

use crate::{EngineEvent, ProgressSettings};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives `work` to completion while reporting an estimated percentage every
/// `settings.interval`. The estimate grows by `step` and never passes `cap`;
/// unchanged values are not reported again.
pub async fn with_simulated_progress<F, T>(
    work: F,
    settings: ProgressSettings,
    mut report: impl FnMut(u8),
) -> T
where
    F: Future<Output = T>,
{
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut work = std::pin::pin!(work);
    let mut percent = 0u8;
    loop {
        tokio::select! {
            output = &mut work => return output,
            _ = ticker.tick() => {
                let next = percent.saturating_add(settings.step).min(settings.cap);
                if next != percent {
                    percent = next;
                    report(percent);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn estimate_stops_at_cap() {
        let settings = ProgressSettings {
            interval: Duration::from_millis(500),
            step: 40,
            cap: 90,
        };
        let mut seen = Vec::new();
        let value = with_simulated_progress(
            async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                7
            },
            settings,
            |percent| seen.push(percent),
        )
        .await;
        assert_eq!(value, 7);
        assert_eq!(seen, vec![40, 80, 90]);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_work_reports_nothing() {
        let mut seen = Vec::new();
        with_simulated_progress(async {}, ProgressSettings::default(), |percent| {
            seen.push(percent)
        })
        .await;
        assert!(seen.is_empty());
    }
}

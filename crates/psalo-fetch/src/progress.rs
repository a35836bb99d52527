use kanal::{AsyncReceiver, AsyncSender};

/// Attempts to make room before giving up on a fraction
const MAX_EVICTIONS: usize = 8;

/// Sending half of a download progress channel.
///
/// Never waits on the consumer. When the buffer is full the oldest queued
/// fraction is evicted, so the most recent value, including the final one,
/// is always what a slow reader ends up with.
#[derive(Clone)]
pub struct ProgressSender {
    tx: AsyncSender<f64>,
    // Used only to evict stale fractions
    evict: AsyncReceiver<f64>,
}

/// Bounded progress channel holding at most `capacity` pending fractions
pub fn progress_channel(capacity: usize) -> (ProgressSender, AsyncReceiver<f64>) {
    let (tx, rx) = kanal::bounded_async(capacity.max(1));
    let sender = ProgressSender {
        tx,
        evict: rx.clone(),
    };
    (sender, rx)
}

impl ProgressSender {
    pub fn report(&self, fraction: f64) {
        for _ in 0..MAX_EVICTIONS {
            match self.tx.try_send(fraction) {
                Ok(true) => return,
                Ok(false) => {
                    // Full: drop the oldest and retry
                    if self.evict.try_recv().is_err() {
                        return;
                    }
                }
                Err(_) => return,
            }
        }

        tracing::trace!("Progress {} dropped", fraction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &AsyncReceiver<f64>) -> Vec<f64> {
        let mut values = Vec::new();
        while let Ok(Some(value)) = rx.try_recv() {
            values.push(value);
        }
        values
    }

    #[test]
    fn full_buffer_keeps_the_newest_values() {
        let (tx, rx) = progress_channel(3);
        for i in 1..=10 {
            tx.report(f64::from(i) / 10.0);
        }

        assert_eq!(drain(&rx), vec![0.8, 0.9, 1.0]);
    }

    #[test]
    fn values_pass_through_when_read_promptly() {
        let (tx, rx) = progress_channel(2);
        tx.report(0.25);
        assert_eq!(drain(&rx), vec![0.25]);
        tx.report(0.5);
        tx.report(1.0);
        assert_eq!(drain(&rx), vec![0.5, 1.0]);
    }
}

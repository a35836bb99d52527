/// Turns a stream of download fractions into sparse percentage reports.
#[derive(Debug)]
pub struct ProgressReporter {
    step: u32,
    last: Option<u32>,
}

impl ProgressReporter {
    /// `step` is in whole percent
    pub fn new(step: u32) -> Self {
        Self {
            step: step.clamp(1, 100),
            last: None,
        }
    }

    /// Percentage to report for `fraction`, if it reaches a new step
    pub fn update(&mut self, fraction: f64) -> Option<u32> {
        if !fraction.is_finite() {
            return None;
        }

        let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
        let bucket = percent - percent % self.step;

        match self.last {
            Some(last) if bucket <= last => None,
            _ => {
                self.last = Some(bucket);
                Some(bucket)
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_step_once() {
        let mut reporter = ProgressReporter::default();
        let reported: Vec<u32> = [0.0, 0.01, 0.049, 0.05, 0.07, 0.12, 0.5, 0.5, 1.0]
            .into_iter()
            .filter_map(|f| reporter.update(f))
            .collect();

        assert_eq!(reported, vec![0, 5, 10, 50, 100]);
    }

    #[test]
    fn out_of_range_and_backwards_values_are_ignored() {
        let mut reporter = ProgressReporter::new(10);
        assert_eq!(reporter.update(0.35), Some(30));
        assert_eq!(reporter.update(0.2), None);
        assert_eq!(reporter.update(f64::NAN), None);
        assert_eq!(reporter.update(7.0), Some(100));
        assert_eq!(reporter.update(1.0), None);
    }
}

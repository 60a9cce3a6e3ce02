use crate::loss::matrix_average_difference;
use crate::{Error, Example, Matrix, Network, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TrainConfig {
    pub learning_rate: f64,
    /// Training stops once the latest example's `|scalar error|` drops below this.
    pub margin: f64,
    pub max_iterations: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            margin: 1e-3,
            max_iterations: 1_000_000,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "margin must be finite and > 0, got {}",
                self.margin
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// False when `max_iterations` ran out first. True only says the latest
    /// example was inside the margin; other examples may still be far off.
    pub converged: bool,
    /// Training steps taken.
    pub iterations: usize,
    /// Scalar error of the most recent example, measured before its update.
    pub last_error: f64,
}

impl Network {
    /// Online gradient descent, one example per step, cycling through `examples`.
    ///
    /// After each step the example's scalar error (mean of `expected - actual`
    /// over the output nodes) is compared to `cfg.margin`. Running out of
    /// iterations is reported through [`TrainReport::converged`], not as an error.
    pub fn train(&mut self, examples: &[Example], cfg: &TrainConfig) -> Result<TrainReport> {
        cfg.validate()?;
        if examples.is_empty() {
            return Err(Error::InvalidData(
                "training set must not be empty".to_owned(),
            ));
        }

        let log_every = examples.len() + 1;
        let mut last_error = f64::INFINITY;
        let mut iterations = 0;

        for example in examples.iter().cycle() {
            let prediction = self.train_step(example, cfg.learning_rate)?;
            iterations += 1;

            last_error = matrix_average_difference(
                &Matrix::column_vector(&prediction.result),
                &Matrix::column_vector(&example.expected_outputs),
            )?;

            if iterations % log_every == 1 {
                log::debug!(
                    "iteration {iterations}: inputs={:?} output={:?} error={last_error}",
                    example.inputs,
                    prediction.result
                );
            }

            if last_error.abs() < cfg.margin {
                log::info!(
                    "error {last_error} < {} after {iterations} iterations",
                    cfg.margin
                );
                return Ok(TrainReport {
                    converged: true,
                    iterations,
                    last_error,
                });
            }
            if iterations == cfg.max_iterations {
                break;
            }
        }

        log::info!("max iterations reached, error {last_error} after {iterations} iterations");
        Ok(TrainReport {
            converged: false,
            iterations,
            last_error,
        })
    }
}

//! Per-example input and output records.
//!
//! The network consumes one [`Example`] at a time and answers with a
//! [`Prediction`]. Lengths are validated against the network at the API
//! boundary, not here.

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
/// One supervised example.
pub struct Example {
    /// One value per input node.
    pub inputs: Vec<f64>,
    /// One value per output node.
    pub expected_outputs: Vec<f64>,
}

impl Example {
    pub fn new(inputs: impl Into<Vec<f64>>, expected_outputs: impl Into<Vec<f64>>) -> Self {
        Self {
            inputs: inputs.into(),
            expected_outputs: expected_outputs.into(),
        }
    }

    /// Build examples from parallel `(inputs, expected)` rows.
    pub fn from_pairs<I, O>(pairs: impl IntoIterator<Item = (I, O)>) -> Vec<Self>
    where
        I: Into<Vec<f64>>,
        O: Into<Vec<f64>>,
    {
        pairs
            .into_iter()
            .map(|(inputs, expected)| Self::new(inputs, expected))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Output of a forward pass.
pub struct Prediction {
    /// Post-activation values of the output layer.
    pub result: Vec<f64>,
    /// Signed error per output node, from the network's error function.
    pub error: Vec<f64>,
}

impl Prediction {
    /// Mean signed error over all output nodes.
    pub fn mean_error(&self) -> f64 {
        if self.error.is_empty() {
            return 0.0;
        }
        self.error.iter().sum::<f64>() / self.error.len() as f64
    }
}

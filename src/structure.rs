//! Topology descriptors.
//!
//! A [`NetworkStructure`] is the declarative description of a network: node
//! counts, bias flags and activation/error function *names*. It is consumed
//! once by [`crate::Network::new`] to size every weight matrix.
//!
//! Descriptors can be assembled in code with [`StructureBuilder`]:
//!
//! ```rust
//! use rust_ffnet::NetworkStructure;
//!
//! # fn main() -> rust_ffnet::Result<()> {
//! let structure = NetworkStructure::builder(2, false)?
//!     .hidden(5, false, "sigmoid")?
//!     .output(1, "sigmoid")?
//!     .error_function("difference")
//!     .build()?;
//! assert_eq!(structure.hidden_layers.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! or, with the `serde` feature, loaded from JSON via
//! [`NetworkStructure::from_json_str`].

use crate::{Activation, Error, ErrorFunction, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InputStructure {
    pub count: usize,
    pub bias_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HiddenStructure {
    pub count: usize,
    pub bias_enabled: bool,
    pub activation_function_name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OutputStructure {
    pub count: usize,
    pub activation_function_name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NetworkStructure {
    pub input_layer: InputStructure,
    pub hidden_layers: Vec<HiddenStructure>,
    pub output_layer: OutputStructure,
    pub error_function_name: String,
}

impl InputStructure {
    pub fn new(count: usize, bias_enabled: bool) -> Self {
        Self {
            count,
            bias_enabled,
        }
    }
}

impl HiddenStructure {
    pub fn new(count: usize, bias_enabled: bool, activation: impl Into<String>) -> Self {
        Self {
            count,
            bias_enabled,
            activation_function_name: activation.into(),
        }
    }

    /// Resolves the activation name (permissive, see [`Activation::from_name`]).
    pub fn activation(&self) -> Activation {
        Activation::from_name(&self.activation_function_name)
    }
}

impl OutputStructure {
    pub fn new(count: usize, activation: impl Into<String>) -> Self {
        Self {
            count,
            activation_function_name: activation.into(),
        }
    }

    pub fn activation(&self) -> Activation {
        Activation::from_name(&self.activation_function_name)
    }
}

impl NetworkStructure {
    /// Assemble and validate a descriptor.
    pub fn new(
        input_layer: InputStructure,
        hidden_layers: Vec<HiddenStructure>,
        output_layer: OutputStructure,
        error_function_name: impl Into<String>,
    ) -> Result<Self> {
        let structure = Self {
            input_layer,
            hidden_layers,
            output_layer,
            error_function_name: error_function_name.into(),
        };
        structure.validate()?;
        Ok(structure)
    }

    pub fn builder(input_count: usize, bias_enabled: bool) -> Result<StructureBuilder> {
        StructureBuilder::new(input_count, bias_enabled)
    }

    /// Check the structural invariants: at least one hidden layer, every count > 0.
    ///
    /// Function names are not checked here; unknown names fall back to defaults
    /// when the network is built.
    pub fn validate(&self) -> Result<()> {
        if self.input_layer.count == 0 {
            return Err(Error::InvalidConfig(
                "input layer count must be > 0".to_owned(),
            ));
        }
        if self.hidden_layers.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one hidden layer".to_owned(),
            ));
        }
        for (i, hidden) in self.hidden_layers.iter().enumerate() {
            if hidden.count == 0 {
                return Err(Error::InvalidConfig(format!(
                    "hidden layer {i} count must be > 0"
                )));
            }
        }
        if self.output_layer.count == 0 {
            return Err(Error::InvalidConfig(
                "output layer count must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn error_function(&self) -> ErrorFunction {
        ErrorFunction::from_name(&self.error_function_name)
    }

    /// Node counts of every layer, input first.
    pub fn layer_counts(&self) -> Vec<usize> {
        let mut counts = Vec::with_capacity(self.hidden_layers.len() + 2);
        counts.push(self.input_layer.count);
        counts.extend(self.hidden_layers.iter().map(|h| h.count));
        counts.push(self.output_layer.count);
        counts
    }
}

#[cfg(feature = "serde")]
impl NetworkStructure {
    /// Parse and validate a descriptor from JSON.
    ///
    /// Keys are camelCase: `inputLayer`, `hiddenLayers`, `outputLayer`,
    /// `errorFunctionName`, `biasEnabled`, `activationFunctionName`.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let structure: NetworkStructure = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse structure json: {e}")))?;
        structure.validate()?;
        Ok(structure)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidData(format!("failed to serialize structure: {e}")))
    }
}

#[derive(Debug, Clone)]
/// Fluent builder for a [`NetworkStructure`].
pub struct StructureBuilder {
    input: InputStructure,
    hidden: Vec<HiddenStructure>,
    output: Option<OutputStructure>,
    error_function_name: String,
}

impl StructureBuilder {
    pub fn new(input_count: usize, bias_enabled: bool) -> Result<Self> {
        if input_count == 0 {
            return Err(Error::InvalidConfig(
                "input layer count must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            input: InputStructure::new(input_count, bias_enabled),
            hidden: Vec::new(),
            output: None,
            error_function_name: ErrorFunction::DIFFERENCE.to_owned(),
        })
    }

    /// Append a hidden layer.
    pub fn hidden(
        mut self,
        count: usize,
        bias_enabled: bool,
        activation: impl Into<String>,
    ) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidConfig(
                "hidden layer count must be > 0".to_owned(),
            ));
        }
        self.hidden
            .push(HiddenStructure::new(count, bias_enabled, activation));
        Ok(self)
    }

    pub fn output(mut self, count: usize, activation: impl Into<String>) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidConfig(
                "output layer count must be > 0".to_owned(),
            ));
        }
        self.output = Some(OutputStructure::new(count, activation));
        Ok(self)
    }

    /// Defaults to `"difference"`.
    pub fn error_function(mut self, name: impl Into<String>) -> Self {
        self.error_function_name = name.into();
        self
    }

    pub fn build(self) -> Result<NetworkStructure> {
        let output = self.output.ok_or_else(|| {
            Error::InvalidConfig("network must have an output layer".to_owned())
        })?;
        NetworkStructure::new(self.input, self.hidden, output, self.error_function_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_layers_in_order() {
        let s = NetworkStructure::builder(3, true)
            .unwrap()
            .hidden(4, true, "relu")
            .unwrap()
            .hidden(2, false, "sigmoid")
            .unwrap()
            .output(1, "identity")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(s.layer_counts(), vec![3, 4, 2, 1]);
        assert_eq!(s.hidden_layers[0].activation(), Activation::Relu);
        assert_eq!(s.hidden_layers[1].activation(), Activation::Sigmoid);
        assert!(!s.hidden_layers[1].bias_enabled);
        assert_eq!(s.error_function(), ErrorFunction::Difference);
    }

    #[test]
    fn rejects_missing_hidden_layers() {
        let err = NetworkStructure::builder(2, false)
            .unwrap()
            .output(1, "relu")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_missing_output_and_zero_counts() {
        assert!(NetworkStructure::builder(0, false).is_err());
        let b = NetworkStructure::builder(2, false).unwrap();
        assert!(b.clone().hidden(0, false, "relu").is_err());
        assert!(b.clone().output(0, "relu").is_err());
        assert!(b.hidden(1, false, "relu").unwrap().build().is_err());

        let bad = NetworkStructure::new(
            InputStructure::new(1, false),
            vec![HiddenStructure::new(0, false, "relu")],
            OutputStructure::new(1, "relu"),
            "difference",
        );
        assert!(matches!(bad, Err(Error::InvalidConfig(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_camel_case_json() {
        let json = r#"{
            "inputLayer": { "count": 1, "biasEnabled": true },
            "hiddenLayers": [
                { "count": 1, "biasEnabled": true, "activationFunctionName": "relu" }
            ],
            "outputLayer": { "count": 1, "activationFunctionName": "relu" },
            "errorFunctionName": "difference"
        }"#;

        let s = NetworkStructure::from_json_str(json).unwrap();
        assert_eq!(s.layer_counts(), vec![1, 1, 1]);
        assert!(s.input_layer.bias_enabled);
        assert_eq!(s.output_layer.activation(), Activation::Relu);

        let again = NetworkStructure::from_json_str(&s.to_json_string_pretty().unwrap()).unwrap();
        assert_eq!(again, s);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_is_validated() {
        let json = r#"{
            "inputLayer": { "count": 1, "biasEnabled": false },
            "hiddenLayers": [],
            "outputLayer": { "count": 1, "activationFunctionName": "relu" },
            "errorFunctionName": "difference"
        }"#;
        assert!(matches!(
            NetworkStructure::from_json_str(json),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            NetworkStructure::from_json_str("{"),
            Err(Error::InvalidData(_))
        ));
    }
}

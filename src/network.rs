use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::ScalarFn;
use crate::layer::{Connection, ConnectionGradient, HiddenLayer, InputLayer, OutputLayer};
use crate::{Error, ErrorFunction, Example, Init, Matrix, NetworkStructure, Prediction, Result};

#[derive(Debug, Clone)]
pub struct Network {
    input: InputLayer,
    hidden: Vec<HiddenLayer>,
    output: OutputLayer,
    error_function: ErrorFunction,
}

/// Values a layer produced during one forward pass.
///
/// For the input layer both rows hold the raw inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    /// `1 x count` weighted sums before activation.
    pub pre_activations: Matrix,
    /// `1 x count` values after activation.
    pub outputs: Matrix,
}

/// Every layer's [`LayerRecord`] from one forward pass, input layer first.
///
/// The backward pass consumes a trace instead of reading state off the layers, so
/// `forward` stays read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardTrace {
    records: Vec<LayerRecord>,
}

/// Weight deltas for every connection, input connection first.
///
/// Produced by [`Network::backward`]; nothing changes until [`Network::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    connections: Vec<ConnectionGradient>,
}

impl Network {
    /// Build a network with uniform `[0, 1)` weights from the thread-local RNG.
    pub fn new(structure: &NetworkStructure) -> Result<Self> {
        Self::new_with_rng(structure, &mut rand::thread_rng())
    }

    /// Build using a deterministic seed.
    pub fn new_with_seed(structure: &NetworkStructure, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(structure, &mut rng)
    }

    /// Build using the provided RNG.
    pub fn new_with_rng<R: Rng + ?Sized>(structure: &NetworkStructure, rng: &mut R) -> Result<Self> {
        Self::new_with_init(structure, Init::Uniform, rng)
    }

    /// Build with an explicit initializer.
    ///
    /// Layer `i` is sized against layer `i + 1`. The last hidden layer reuses its
    /// own descriptor's activation and connects to the output layer, which owns no
    /// outgoing weights.
    pub fn new_with_init<R: Rng + ?Sized>(
        structure: &NetworkStructure,
        init: Init,
        rng: &mut R,
    ) -> Result<Self> {
        structure.validate()?;

        let hidden_specs = &structure.hidden_layers;
        let input = InputLayer::new_with_rng(
            structure.input_layer.count,
            hidden_specs[0].count,
            structure.input_layer.bias_enabled,
            init,
            rng,
        );

        let mut hidden = Vec::with_capacity(hidden_specs.len());
        for (i, spec) in hidden_specs.iter().enumerate() {
            let next_count = hidden_specs
                .get(i + 1)
                .map_or(structure.output_layer.count, |next| next.count);
            hidden.push(HiddenLayer::new_with_rng(
                spec.count,
                next_count,
                spec.activation(),
                spec.bias_enabled,
                init,
                rng,
            ));
        }

        let output = OutputLayer::new(
            structure.output_layer.count,
            structure.output_layer.activation(),
        );

        log::debug!(
            "built network with layer counts {:?}",
            structure.layer_counts()
        );

        Ok(Self {
            input,
            hidden,
            output,
            error_function: structure.error_function(),
        })
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input.count()
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output.count()
    }

    #[inline]
    pub fn input_layer(&self) -> &InputLayer {
        &self.input
    }

    #[inline]
    pub fn hidden_layers(&self) -> &[HiddenLayer] {
        &self.hidden
    }

    #[inline]
    pub fn output_layer(&self) -> &OutputLayer {
        &self.output
    }

    #[inline]
    pub fn error_function(&self) -> ErrorFunction {
        self.error_function
    }

    /// Number of weighted connections (one per hidden layer, plus the input's).
    #[inline]
    pub fn num_connections(&self) -> usize {
        self.hidden.len() + 1
    }

    /// Connection `idx`: 0 leaves the input layer, `i + 1` leaves hidden layer `i`.
    pub fn connection(&self, idx: usize) -> Option<&Connection> {
        if idx == 0 {
            Some(&self.input.connection)
        } else {
            self.hidden.get(idx - 1).map(|h| &h.connection)
        }
    }

    fn connection_mut(&mut self, idx: usize) -> Option<&mut Connection> {
        if idx == 0 {
            Some(&mut self.input.connection)
        } else {
            self.hidden.get_mut(idx - 1).map(|h| &mut h.connection)
        }
    }

    /// Activation and derivative of the layer that connection `idx` feeds.
    fn downstream_functions(&self, idx: usize) -> (ScalarFn, ScalarFn) {
        match self.hidden.get(idx) {
            Some(h) => (h.f, h.df),
            None => (self.output.f, self.output.df),
        }
    }

    /// True if every weight and bias is finite.
    pub fn is_finite(&self) -> bool {
        (0..self.num_connections())
            .filter_map(|idx| self.connection(idx))
            .all(Connection::is_finite)
    }

    /// Run `inputs` through every layer and record each layer's values.
    pub fn forward_trace(&self, inputs: &[f64]) -> Result<ForwardTrace> {
        if inputs.len() != self.input_count() {
            return Err(Error::ShapeMismatch(format!(
                "input len {} does not match input layer count {}",
                inputs.len(),
                self.input_count()
            )));
        }

        let mut records = Vec::with_capacity(self.num_connections() + 1);
        let mut outputs = Matrix::row_vector(inputs);
        records.push(LayerRecord {
            pre_activations: outputs.clone(),
            outputs: outputs.clone(),
        });

        for idx in 0..self.num_connections() {
            let connection = self
                .connection(idx)
                .ok_or_else(|| Error::ShapeMismatch(format!("missing connection {idx}")))?;
            let (f, _) = self.downstream_functions(idx);

            let pre_activations = connection.propagate(&outputs)?;
            outputs = pre_activations.map(f);
            records.push(LayerRecord {
                pre_activations,
                outputs: outputs.clone(),
            });
        }

        Ok(ForwardTrace { records })
    }

    /// Output vector for `inputs`.
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward_trace(inputs)?.output().to_vec())
    }

    /// Forward pass for one example.
    ///
    /// Shape contract:
    /// - `example.inputs.len() == self.input_count()`
    /// - `example.expected_outputs.len() == self.output_count()`
    ///
    /// Read-only: calling it twice with unchanged weights gives identical results.
    pub fn forward(&self, example: &Example) -> Result<Prediction> {
        self.forward_with_trace(example).map(|(prediction, _)| prediction)
    }

    fn forward_with_trace(&self, example: &Example) -> Result<(Prediction, ForwardTrace)> {
        if example.expected_outputs.len() != self.output_count() {
            return Err(Error::ShapeMismatch(format!(
                "expected output len {} does not match output layer count {}",
                example.expected_outputs.len(),
                self.output_count()
            )));
        }

        let trace = self.forward_trace(&example.inputs)?;
        let result = trace.output().to_vec();
        let error = self
            .error_function
            .errors(&result, &example.expected_outputs)?;
        Ok((Prediction { result, error }, trace))
    }

    /// Forward pass over every example.
    pub fn evaluate(&self, examples: &[Example]) -> Result<Vec<Prediction>> {
        examples.iter().map(|e| self.forward(e)).collect()
    }

    /// Compute weight deltas for one example without touching the weights.
    ///
    /// With `e` the signed output error, `z_l` / `a_l` the pre-/post-activations of
    /// layer `l` and `W_l` the connection leaving it:
    /// - output: `δ = sign(e) ⊙ f'(z_out)`
    /// - hidden: `δ_l = (δ_{l+1} · W_lᵀ) ⊙ f'(z_l)`
    /// - weights: `∇W_l = a_lᵀ · δ_{l+1}`, biases: `∇b_l = δ_{l+1}`
    ///
    /// `sign(e)` is `+1` for a positive error and `-1` otherwise, so an exact
    /// output still pulls its weights down.
    pub fn backward(&self, trace: &ForwardTrace, error: &[f64]) -> Result<Gradients> {
        self.check_trace(trace)?;
        if error.len() != self.output_count() {
            return Err(Error::ShapeMismatch(format!(
                "error len {} does not match output layer count {}",
                error.len(),
                self.output_count()
            )));
        }

        let last = self.num_connections();
        let signs: Vec<f64> = error.iter().map(|&e| sign(e)).collect();
        let mut delta = Matrix::row_vector(&signs)
            .hadamard(&trace.records[last].pre_activations.map(self.output.df))?;

        let mut connections = Vec::with_capacity(last);
        for idx in (0..last).rev() {
            let record = &trace.records[idx];
            let connection = self
                .connection(idx)
                .ok_or_else(|| Error::ShapeMismatch(format!("missing connection {idx}")))?;

            let weights = record.outputs.transpose().multiply(&delta)?;
            let bias = connection.bias().map(|_| delta.clone());

            if idx > 0 {
                let (_, df) = self.downstream_functions(idx - 1);
                delta = delta
                    .multiply(&connection.weights().transpose())?
                    .hadamard(&record.pre_activations.map(df))?;
            }

            connections.push(ConnectionGradient { weights, bias });
        }
        connections.reverse();

        Ok(Gradients { connections })
    }

    /// `W <- W + learning_rate * ∇W` for every connection.
    ///
    /// All-or-nothing: shapes are checked before any weight changes.
    pub fn apply(&mut self, gradients: &Gradients, learning_rate: f64) -> Result<()> {
        if !learning_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite, got {learning_rate}"
            )));
        }
        if gradients.connections.len() != self.num_connections() {
            return Err(Error::ShapeMismatch(format!(
                "gradients cover {} connections, network has {}",
                gradients.connections.len(),
                self.num_connections()
            )));
        }
        for (idx, grad) in gradients.connections.iter().enumerate() {
            let connection = self
                .connection(idx)
                .ok_or_else(|| Error::ShapeMismatch(format!("missing connection {idx}")))?;
            let bias_shape = connection.bias().map(Matrix::shape);
            if grad.weights.shape() != connection.weights().shape()
                || grad.bias.as_ref().map(Matrix::shape) != bias_shape
            {
                return Err(Error::ShapeMismatch(format!(
                    "gradient for connection {idx} does not match its parameters"
                )));
            }
        }

        for (idx, grad) in gradients.connections.iter().enumerate() {
            if let Some(connection) = self.connection_mut(idx) {
                connection.apply(grad, learning_rate)?;
            }
        }
        Ok(())
    }

    /// One online training step: forward, backward, apply.
    ///
    /// Returns the prediction made *before* the update.
    pub fn train_step(&mut self, example: &Example, learning_rate: f64) -> Result<Prediction> {
        let (prediction, trace) = self.forward_with_trace(example)?;
        let gradients = self.backward(&trace, &prediction.error)?;
        self.apply(&gradients, learning_rate)?;
        Ok(prediction)
    }

    fn check_trace(&self, trace: &ForwardTrace) -> Result<()> {
        let expected = self.num_connections() + 1;
        if trace.records.len() != expected {
            return Err(Error::ShapeMismatch(format!(
                "trace has {} layer records, network has {expected} layers",
                trace.records.len()
            )));
        }

        let counts = std::iter::once(self.input_count())
            .chain(self.hidden.iter().map(HiddenLayer::count))
            .chain(std::iter::once(self.output_count()));
        for (i, (record, count)) in trace.records.iter().zip(counts).enumerate() {
            if record.outputs.shape() != (1, count) || record.pre_activations.shape() != (1, count)
            {
                return Err(Error::ShapeMismatch(format!(
                    "trace record {i} does not match layer count {count}"
                )));
            }
        }
        Ok(())
    }
}

impl ForwardTrace {
    #[inline]
    pub fn records(&self) -> &[LayerRecord] {
        &self.records
    }

    /// Post-activation values of the output layer.
    #[inline]
    pub fn output(&self) -> &[f64] {
        match self.records.last() {
            Some(record) => record.outputs.as_slice(),
            None => &[],
        }
    }
}

impl Gradients {
    #[inline]
    pub fn connections(&self) -> &[ConnectionGradient] {
        &self.connections
    }

    /// Gradient for connection `idx` (see [`Network::connection`]).
    #[inline]
    pub fn connection(&self, idx: usize) -> Option<&ConnectionGradient> {
        self.connections.get(idx)
    }
}

#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { -1.0 }
}

//! A small feed-forward neural network, built from scratch.
//!
//! `rust-ffnet` has three layers of its own:
//!
//! - [`Matrix`]: a dense, immutable, row-major `f64` matrix.
//! - Function registries: [`Activation`] and [`ErrorFunction`], looked up by name
//!   once when a network is built.
//! - [`Network`]: layers built from a declarative [`NetworkStructure`], with
//!   forward propagation and manual backpropagation.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - The connection leaving a layer with `count` nodes toward one with
//!   `next_count` nodes is a `(count, next_count)` matrix, plus an optional
//!   `(1, next_count)` bias row.
//! - Activations travel between layers as `1 x count` row vectors.
//!
//! # Training
//!
//! Training is online: one [`Example`] per step. [`Network::backward`] computes
//! the deltas from a [`ForwardTrace`] and [`Network::apply`] adds
//! `learning_rate * delta` to the weights. The two are separate calls.
//! [`Network::train_step`] chains forward, backward and apply, and
//! [`Network::train`] cycles a training set until the latest example's error is
//! inside a margin or an iteration cap is hit.
//!
//! The output error is signed (`expected - actual`) and only its sign enters the
//! backward pass. Updates move each output toward its target; they do not
//! minimise a squared loss.
//!
//! Convergence is judged on one example at a time: [`TrainReport::converged`]
//! means the latest example landed inside the margin, not that the whole set
//! did. Check the set with [`Network::evaluate`].
//!
//! # Quick start
//!
//! ```rust
//! use rust_ffnet::{Example, Network, NetworkStructure, TrainConfig};
//!
//! # fn main() -> rust_ffnet::Result<()> {
//! let structure = NetworkStructure::builder(2, false)?
//!     .hidden(5, false, "sigmoid")?
//!     .output(1, "sigmoid")?
//!     .build()?;
//! let mut net = Network::new_with_seed(&structure, 0)?;
//!
//! let and = Example::from_pairs([
//!     ([0.0, 0.0], [0.0]),
//!     ([0.0, 1.0], [0.0]),
//!     ([1.0, 0.0], [0.0]),
//!     ([1.0, 1.0], [1.0]),
//! ]);
//!
//! // `train` stops on the most recent example's error, so a run can report
//! // `converged` while another example (here `[1, 1]`) is still far off.
//! let report = net.train(
//!     &and,
//!     &TrainConfig {
//!         learning_rate: 0.05,
//!         margin: 0.05,
//!         max_iterations: 20_000,
//!     },
//! )?;
//! assert!(report.iterations <= 20_000);
//!
//! let prediction = net.forward(&and[3])?;
//! assert_eq!(prediction.result.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for descriptors, examples and
//!   [`TrainConfig`], plus [`NetworkStructure::from_json_str`].
//! - `matrixmultiply`: route [`Matrix::multiply`] through `matrixmultiply::dgemm`.

pub mod activation;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub(crate) mod matmul;
pub mod matrix;
pub mod network;
pub mod structure;
pub mod train;

pub use activation::Activation;
pub use data::{Example, Prediction};
pub use error::{Error, Result};
pub use layer::{Connection, ConnectionGradient, HiddenLayer, Init, InputLayer, OutputLayer};
pub use loss::{ErrorFunction, matrix_average_difference};
pub use matrix::Matrix;
pub use network::{ForwardTrace, Gradients, LayerRecord, Network};
pub use structure::{
    HiddenStructure, InputStructure, NetworkStructure, OutputStructure, StructureBuilder,
};
pub use train::{TrainConfig, TrainReport};

use rust_ffnet::{Example, Network, NetworkStructure, TrainConfig};

// 2 -> 5 -> 1, sigmoid throughout, no biases.
const STRUCTURE: &str = r#"{
    "inputLayer": { "count": 2, "biasEnabled": false },
    "hiddenLayers": [
        { "count": 5, "biasEnabled": false, "activationFunctionName": "sigmoid" }
    ],
    "outputLayer": { "count": 1, "activationFunctionName": "sigmoid" },
    "errorFunctionName": "difference"
}"#;

fn main() -> rust_ffnet::Result<()> {
    // RUST_LOG=debug shows progress every few iterations.
    env_logger::init();

    let structure = NetworkStructure::from_json_str(STRUCTURE)?;
    let mut net = Network::new_with_seed(&structure, 0)?;

    let train = Example::from_pairs([
        ([0.0, 0.0], [0.0]),
        ([0.0, 1.0], [0.0]),
        ([1.0, 0.0], [0.0]),
        ([1.0, 1.0], [1.0]),
    ]);

    let report = net.train(
        &train,
        &TrainConfig {
            learning_rate: 0.01,
            margin: 0.01,
            max_iterations: 200_000,
        },
    )?;
    // `converged` only covers the last example seen. With three 0 targets
    // the net often settles low everywhere, [1, 1] included.
    println!(
        "converged={} iterations={} last_error={}",
        report.converged, report.iterations, report.last_error
    );

    for (example, prediction) in train.iter().zip(net.evaluate(&train)?) {
        println!(
            "x={:?} y={:?} expected={:?}",
            example.inputs, prediction.result, example.expected_outputs
        );
    }

    Ok(())
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rust_ffnet::{Example, Network, NetworkStructure};

fn structure() -> NetworkStructure {
    NetworkStructure::builder(64, true)
        .and_then(|b| b.hidden(128, true, "relu"))
        .and_then(|b| b.hidden(128, true, "relu"))
        .and_then(|b| b.output(10, "sigmoid"))
        .and_then(|b| b.build())
        .unwrap()
}

fn network_forward_bench(c: &mut Criterion) {
    let net = Network::new_with_seed(&structure(), 0).unwrap();
    let example = Example::new(vec![0.1; net.input_count()], vec![0.0; net.output_count()]);

    c.bench_function("network_forward_64_128_128_10", |b| {
        b.iter(|| {
            let out = net.forward(black_box(&example)).unwrap();
            black_box(out);
        })
    });
}

fn network_backward_bench(c: &mut Criterion) {
    let net = Network::new_with_seed(&structure(), 0).unwrap();
    let example = Example::new(vec![0.1; net.input_count()], vec![0.0; net.output_count()]);
    let trace = net.forward_trace(&example.inputs).unwrap();
    let prediction = net.forward(&example).unwrap();

    c.bench_function("network_backward_64_128_128_10", |b| {
        b.iter(|| {
            let grads = net
                .backward(black_box(&trace), black_box(&prediction.error))
                .unwrap();
            black_box(grads);
        })
    });
}

fn network_train_step_bench(c: &mut Criterion) {
    let mut net = Network::new_with_seed(&structure(), 0).unwrap();
    let example = Example::new(vec![0.1; net.input_count()], vec![0.5; net.output_count()]);

    c.bench_function("network_train_step_64_128_128_10", |b| {
        b.iter(|| {
            let out = net.train_step(black_box(&example), 1e-4).unwrap();
            black_box(out);
        })
    });
}

criterion_group!(
    benches,
    network_forward_bench,
    network_backward_bench,
    network_train_step_bench
);
criterion_main!(benches);

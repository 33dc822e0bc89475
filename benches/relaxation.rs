use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use glam::DVec2;
use rand::Rng;
use spatial_layout::layout::{Layout, LayoutConfig, STIFF_L};
use spatial_layout::{ConstraintKind, Mass};

fn build_chain(num_masses: usize) -> Layout {
    let mut rng = rand::thread_rng();
    let mut layout = Layout::new(LayoutConfig::default(), false);
    let pos_limit = 5.0;

    let names: Vec<String> = (0..num_masses).map(|i| format!("m{i}")).collect();
    for name in &names {
        layout
            .add_mass(Mass::with_state(
                name.clone(),
                DVec2::new(
                    rng.gen_range(-pos_limit..pos_limit),
                    rng.gen_range(-pos_limit..pos_limit),
                ),
                DVec2::ZERO,
                1.0,
            ))
            .expect("names are unique");
    }
    for pair in names.windows(2) {
        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: pair[0].clone(),
                    b: pair[1].clone(),
                    l0: 1.0,
                    k: STIFF_L,
                    tag_id: -1,
                },
                vec![],
            )
            .expect("both masses already registered");
    }
    layout
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation");
    for num_masses in [8, 16, 32, 64, 128] {
        group.bench_with_input(
            BenchmarkId::new("step chain of masses", num_masses),
            &num_masses,
            |b, &num_masses| {
                b.iter_batched(
                    || build_chain(num_masses),
                    |mut layout| {
                        layout.step().unwrap();
                        black_box(layout);
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

//! Parser and validator throughput on a long outline.
//! Run: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cinebrief::{auto_structure, validate_project, Project};

fn outline(scenes: usize) -> String {
    let mut text = String::from("Title: Bench Reel\nCharacter: Aya\nLocation: Night market\n");
    for scene in 0..scenes {
        text.push_str(&format!("Scene {scene}: chase\nAya weaves through the crowd\n"));
        for shot in 0..4 {
            text.push_str(&format!(
                "Shot {shot}: lanterns overhead\nhandheld follow\nClose-up on the courier\nDialogue: Keep up!\nAction: vaults a crate\nMusic: synth pulse\ncut to black\n"
            ));
        }
    }
    text
}

fn bench_auto_structure(c: &mut Criterion) {
    let text = outline(200);
    let base = Project::default();

    let mut group = c.benchmark_group("auto_structure");
    group.sample_size(50);

    group.bench_function("outline_200_scenes", |b| {
        b.iter(|| black_box(auto_structure(&base, black_box(&text))));
    });

    let project = auto_structure(&base, &text);
    group.bench_function("validate_200_scenes", |b| {
        b.iter(|| black_box(validate_project(black_box(&project))));
    });

    group.finish();
}

criterion_group!(benches, bench_auto_structure);
criterion_main!(benches);

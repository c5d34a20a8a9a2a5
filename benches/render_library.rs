//! This bench loads a generated library of talks and papers and renders every
//! record with all link groups enabled.

#![allow(missing_docs)]

use std::{hint::black_box, path::Path};

use bibkeeper::{
    Config, Corpus, Record,
    domain::{Rendered, Targets, ValidationMode},
    storage::ArtifactTree,
};
use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;

/// Writes `count` records spread over a handful of directories.
fn preseed_library(root: &Path, count: usize) {
    for i in 0..count {
        let directory = format!("talks/{}", 2000 + i % 20);
        let key = format!("{directory}/talk-{i:04}");
        let yaml = format!(
            "{key}:\n  title: Talk number {i}\n  type: presentation\n  year: {}\n  presenters:\n    - Doe, Jane\n    - Roe, Rick\n  urls:\n    video: https://video.example/{i}\n  bibtex: \"@misc{{talk{i}}}\"\n",
            2000 + i % 20
        );
        let dir = root.join(&directory);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("talk-{i:04}.yaml")), yaml).unwrap();
        std::fs::write(dir.join(format!("talk-{i:04}.pdf")), "").unwrap();
    }
}

fn render_library(c: &mut Criterion) {
    let library = TempDir::new().unwrap();
    preseed_library(library.path(), 500);
    let config = Config {
        targets: Targets::ALL,
        base_url: Some("https://library.example".to_string()),
        local_links: true,
        artifacts_root: Some(library.path().to_path_buf()),
        ..Config::default()
    };

    c.bench_function("load library", |b| {
        b.iter(|| {
            Corpus::<Record>::load(black_box(library.path()), ValidationMode::FailFast).unwrap()
        });
    });

    let corpus = Corpus::<Record>::load(library.path(), ValidationMode::FailFast).unwrap();
    c.bench_function("render library", |b| {
        b.iter(|| {
            corpus
                .iter()
                .map(|record| Rendered::new(black_box(record), &config, &ArtifactTree))
                .collect::<Vec<_>>()
        });
    });
}

criterion_group!(benches, render_library);
criterion_main!(benches);

//! Benchmark for project object encoding and decoding.
//!
//! Synthesizes a project with N source files (default 10k) spread over a
//! copy-files phase and a sources phase, then times each stage of a full
//! text round trip.

use std::time::Instant;

use pbx_graph::codec::{decode_project_root, encode_objects, parse, write_project};
use pbx_graph::{
    validate_objects, BuildFile, BuildPhase, BuildPhaseKind, CopyFilesBuildPhase, DecodeOptions,
    FileReference, ObjectId, PlistDict, PlistValue, ProjectObjects, SubFolder, WriteOptions,
};

const DEFAULT_FILES: usize = 10_000;

/// Builds a project with `count` files; every fourth one is a copied resource.
fn synthesize(count: usize) -> ProjectObjects {
    let mut objects = ProjectObjects::new();
    let mut sources = Vec::new();
    let mut resources = Vec::new();

    for i in 0..count {
        let is_resource = i % 4 == 0;
        let (path, file_type) = if is_resource {
            (format!("Assets/image_{i}.png"), "image.png")
        } else {
            (format!("Sources/File{i}.swift"), "sourcecode.swift")
        };

        let file_id = ObjectId::derived(format!("file:{i}").as_bytes());
        let build_id = ObjectId::derived(format!("build:{i}").as_bytes());
        objects.insert(FileReference::new(file_id, path).with_last_known_file_type(file_type));
        objects.insert(BuildFile::new(build_id, file_id));

        if is_resource {
            resources.push(build_id);
        } else {
            sources.push(build_id);
        }
    }

    objects.insert(
        BuildPhase::new(ObjectId::derived(b"phase:sources"), BuildPhaseKind::Sources)
            .with_files(sources),
    );
    objects.insert(
        CopyFilesBuildPhase::new(ObjectId::derived(b"phase:copy"), "", SubFolder::Resources)
            .with_files(resources),
    );
    objects
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let count = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("usage: bench-project [FILE_COUNT]");
                std::process::exit(2);
            }
        },
        None => DEFAULT_FILES,
    };

    println!("=== Project Object Benchmark ===");
    println!();

    let start = Instant::now();
    let objects = synthesize(count);
    println!("Synthesized {} objects in {:?}", objects.len(), start.elapsed());

    let start = Instant::now();
    let findings = validate_objects(&objects);
    println!("Validated in {:?} ({} findings)", start.elapsed(), findings.len());

    let start = Instant::now();
    let table = encode_objects(&objects);
    let encode_time = start.elapsed();

    let mut root = PlistDict::new();
    root.insert("archiveVersion", PlistValue::string("1"));
    root.insert("objectVersion", PlistValue::string("56"));
    root.insert("objects", PlistValue::Dictionary(table));

    let start = Instant::now();
    let text = write_project(&root, WriteOptions::new());
    let write_time = start.elapsed();

    let start = Instant::now();
    let parsed = match parse(&text) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("parse failed: {err}");
            std::process::exit(1);
        }
    };
    let parse_time = start.elapsed();

    let start = Instant::now();
    let decoded = match decode_project_root(&parsed, DecodeOptions::new()) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("decode failed: {err}");
            std::process::exit(1);
        }
    };
    let decode_time = start.elapsed();

    println!();
    println!("Encode objects:  {:?}", encode_time);
    println!("Write text:      {:?} ({} bytes)", write_time, text.len());
    println!("Parse text:      {:?}", parse_time);
    println!("Decode objects:  {:?}", decode_time);
    println!();

    if decoded.is_complete() && decoded.objects == objects {
        println!("Round trip: OK");
    } else {
        println!(
            "Round trip: MISMATCH ({} failures, {} of {} objects)",
            decoded.failures.len(),
            decoded.objects.len(),
            objects.len()
        );
        std::process::exit(1);
    }
}

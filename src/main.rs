use std::{env, fs, path::PathBuf, process, time::Instant};

use cobalt::{compile_source, display_diagnostic};
use inkwell::context::Context;
use log::info;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: cobalt <file>");
        process::exit(2);
    }

    let file_path = &args[1];
    let source = fs::read_to_string(file_path).expect("Failed to read file!");

    let start = Instant::now();
    let context = Context::create();
    let (module, diagnostics) = compile_source(&source, &context, file_path);
    info!("compiled {} in {:?}", file_path, start.elapsed());

    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            display_diagnostic(diagnostic, &source, file_path);
        }
        process::exit(1);
    }

    let module = module.expect("a clean run produces a module");

    if !PathBuf::from("build").exists() {
        fs::create_dir("build").unwrap();
    }

    module.print_to_file("build/out.ll").unwrap();
    info!("wrote build/out.ll");
}

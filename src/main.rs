use std::{env, path::Path, process};

use curve_fit_orchestration::{JsonRenderer, LogRenderer, RunConfig, ScatterRenderer, run};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.json]", args[0]);
        process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => match RunConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {path}: {e}");
                process::exit(1);
            }
        },
        None => RunConfig::default(),
    };

    let mut renderer: Box<dyn ScatterRenderer> = match &config.output {
        Some(path) => Box::new(JsonRenderer::new(path.clone())),
        None => Box::new(LogRenderer),
    };

    if let Err(e) = run(&config, renderer.as_mut()).await {
        eprintln!("Error running fit cycles: {e}");
        process::exit(1);
    }
}
